//! Ranking over the immutable corpus snapshot.

use serde::Serialize;
use std::path::Path;
use std::time::Instant;

use crate::config::SearchConfig;
use crate::corpus::{CorpusLoadError, CorpusStore, DocumentRecord};
use crate::index::InvertedIndex;
use crate::lookup::{self, Suggestion};
use crate::model::WeightingModel;
use crate::DocId;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Hit<'a> {
    pub record: &'a DocumentRecord,
    pub score: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub num_docs: usize,
    pub num_terms: usize,
    pub num_postings: usize,
}

/// Everything a request needs: corpus, weighting model and inverted index.
/// Built once, never mutated; share it behind an `Arc`.
pub struct SearchContext {
    store: CorpusStore,
    model: WeightingModel,
    index: InvertedIndex,
    config: SearchConfig,
}

impl SearchContext {
    pub fn load<P: AsRef<Path>>(path: P, config: SearchConfig) -> Result<Self, CorpusLoadError> {
        Ok(Self::new(CorpusStore::load(path)?, config))
    }

    pub fn new(store: CorpusStore, config: SearchConfig) -> Self {
        let start = Instant::now();
        let model = WeightingModel::build(store.search_texts(), config.max_features, config.idf);
        let index = InvertedIndex::build(&model);
        tracing::info!(
            num_docs = store.len(),
            num_postings = index.num_postings(),
            took_s = start.elapsed().as_secs_f64(),
            "search context ready"
        );
        Self { store, model, index, config }
    }

    pub fn config(&self) -> &SearchConfig { &self.config }

    pub fn store(&self) -> &CorpusStore { &self.store }

    pub fn model(&self) -> &WeightingModel { &self.model }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            num_docs: self.store.len(),
            num_terms: self.model.vocabulary().len(),
            num_postings: self.index.num_postings(),
        }
    }

    /// Best-first hits for a free-text query. A bare digit string returns the
    /// first section whose id starts with it, if any.
    pub fn search(&self, query: &str, top_k: usize) -> Vec<Hit<'_>> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        if query.chars().all(|c| c.is_ascii_digit()) {
            if let Some((_, record)) = lookup::first_with_id_prefix(&self.store, query) {
                tracing::debug!(query, id = %record.id, "section number match");
                return vec![Hit { record, score: 1.0 }];
            }
        }

        let start = Instant::now();
        let q_vec = self.model.transform(query);
        if q_vec.is_empty() {
            tracing::debug!(query, "no query terms in vocabulary");
            return Vec::new();
        }
        let scores = self.index.score(&q_vec);
        let mut ranked: Vec<(DocId, f32)> = scores.into_iter().enumerate().map(|(d, s)| (d as DocId, s)).collect();
        // stable: equal scores keep corpus order
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(top_k.max(1));

        let best = ranked.first().map(|&(_, s)| s).unwrap_or(0.0);
        if best < self.config.relevance_floor {
            tracing::debug!(query, best, "best score below relevance floor");
            return Vec::new();
        }
        tracing::debug!(query, hits = ranked.len(), best, took_s = start.elapsed().as_secs_f64(), "ranked query");
        ranked
            .into_iter()
            .filter_map(|(d, score)| self.store.get(d).map(|record| Hit { record, score }))
            .collect()
    }

    pub fn get_by_id(&self, id: &str) -> Option<&DocumentRecord> { self.store.get_by_id(id) }

    pub fn autocomplete(&self, input: &str, limit: usize) -> Vec<Suggestion<'_>> {
        lookup::autocomplete(&self.store, input, self.config.autocomplete_min_chars, limit)
    }
}
