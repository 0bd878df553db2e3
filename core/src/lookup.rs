use serde::Serialize;

use crate::corpus::CorpusStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Suggestion<'a> {
    pub id: &'a str,
    pub title: &'a str,
}

/// Ids starting with the input or titles containing it, case-insensitive, in corpus order.
pub fn autocomplete<'a>(store: &'a CorpusStore, input: &str, min_chars: usize, limit: usize) -> Vec<Suggestion<'a>> {
    let q = input.trim().to_lowercase();
    if q.chars().count() < min_chars {
        return Vec::new();
    }
    store
        .all()
        .iter()
        .filter(|d| d.id.to_lowercase().starts_with(&q) || d.title.to_lowercase().contains(&q))
        .take(limit)
        .map(|d| Suggestion { id: &d.id, title: &d.title })
        .collect()
}

/// First document, in corpus order, whose id starts with `prefix`.
pub fn first_with_id_prefix<'a>(store: &'a CorpusStore, prefix: &str) -> Option<(u32, &'a crate::DocumentRecord)> {
    store
        .all()
        .iter()
        .enumerate()
        .find(|(_, d)| d.id.starts_with(prefix))
        .map(|(i, d)| (i as u32, d))
}
