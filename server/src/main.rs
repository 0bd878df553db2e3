use anyhow::Result;
use axum::Router;
use clap::Parser;
use section_core::{IdfMode, SearchConfig};
use section_server::build_app;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Corpus file (.csv, .json or .jsonl)
    #[arg(long, default_value = "./data/sections.csv")]
    corpus: String,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Use smoothed IDF = ln((1 + N) / (1 + df)) + 1 instead of ln(N/df)
    #[arg(long, default_value_t = false)]
    smoothed_idf: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let config = SearchConfig {
        idf: if args.smoothed_idf { IdfMode::Smoothed } else { IdfMode::Plain },
        ..SearchConfig::default()
    };
    let app: Router = build_app(&args.corpus, config)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
