use anyhow::Result;
use clap::{Parser, Subcommand};
use section_core::{IdfMode, SearchConfig, SearchContext};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "sections")]
#[command(about = "Query a legal-section corpus from the command line", long_about = None)]
struct Cli {
    /// Corpus file (.csv, .json or .jsonl)
    #[arg(long, global = true, default_value = "./data/sections.csv")]
    corpus: String,
    /// Use smoothed IDF = ln((1 + N) / (1 + df)) + 1 instead of ln(N/df)
    #[arg(long, global = true, default_value_t = false)]
    smoothed_idf: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print corpus and vocabulary sizes
    Stats,
    /// Rank sections against a free-text query
    Search {
        query: String,
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// Print one section by exact id
    Show { id: String },
    /// Suggest sections by id prefix or title substring
    Complete {
        prefix: String,
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Serialize)]
struct Row<'a> {
    id: &'a str,
    title: &'a str,
    group: &'a str,
    score: f32,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();
    let config = SearchConfig {
        idf: if cli.smoothed_idf { IdfMode::Smoothed } else { IdfMode::Plain },
        ..SearchConfig::default()
    };
    let ctx = SearchContext::load(&cli.corpus, config)?;

    let out = match cli.command {
        Commands::Stats => serde_json::to_string_pretty(&ctx.stats())?,
        Commands::Search { query, top_k } => {
            let k = top_k.unwrap_or(ctx.config().default_top_k);
            let rows: Vec<Row> = ctx
                .search(&query, k)
                .into_iter()
                .map(|h| Row { id: &h.record.id, title: &h.record.title, group: &h.record.group, score: h.score })
                .collect();
            serde_json::to_string_pretty(&rows)?
        }
        Commands::Show { id } => match ctx.get_by_id(&id) {
            Some(record) => serde_json::to_string_pretty(record)?,
            None => {
                tracing::warn!(id = %id, "section not found");
                "null".to_string()
            }
        },
        Commands::Complete { prefix, limit } => {
            let limit = limit.unwrap_or(ctx.config().default_autocomplete_limit);
            serde_json::to_string_pretty(&ctx.autocomplete(&prefix, limit))?
        }
    };
    println!("{out}");
    Ok(())
}
