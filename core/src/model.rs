//! Vocabulary and tf-idf weighting over the corpus search text.

use std::collections::HashMap;

use crate::tokenizer::terms;
use crate::TermId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdfMode {
    /// ln(N / df)
    #[default]
    Plain,
    /// ln((1 + N) / (1 + df)) + 1
    Smoothed,
}

impl IdfMode {
    fn idf(self, n: u32, df: u32) -> f32 {
        let (n, df) = (n as f32, df.max(1) as f32);
        match self {
            IdfMode::Plain => (n / df).ln(),
            IdfMode::Smoothed => ((1.0 + n) / (1.0 + df)).ln() + 1.0,
        }
    }
}

/// Sparse weight vector, entries sorted by term id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(TermId, f32)>,
}

impl SparseVector {
    fn from_weights(mut entries: Vec<(TermId, f32)>) -> Self {
        entries.retain(|&(_, w)| w != 0.0);
        entries.sort_by_key(|&(t, _)| t);
        let norm = entries.iter().map(|&(_, w)| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, w) in entries.iter_mut() { *w /= norm; }
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[(TermId, f32)] { &self.entries }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn norm(&self) -> f32 { self.entries.iter().map(|&(_, w)| w * w).sum::<f32>().sqrt() }

    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j, mut acc) = (0, 0, 0.0f32);
        while i < self.entries.len() && j < other.entries.len() {
            let (a, b) = (self.entries[i], other.entries[j]);
            match a.0.cmp(&b.0) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    acc += a.1 * b.1;
                    i += 1;
                    j += 1;
                }
            }
        }
        acc
    }
}

#[derive(Debug, Default)]
pub struct Vocabulary {
    dictionary: HashMap<String, TermId>,
    df: Vec<u32>,
    idf: Vec<f32>,
}

impl Vocabulary {
    pub fn get(&self, term: &str) -> Option<TermId> { self.dictionary.get(term).copied() }
    pub fn df(&self, term: TermId) -> u32 { self.df[term as usize] }
    pub fn idf(&self, term: TermId) -> f32 { self.idf[term as usize] }
    pub fn len(&self) -> usize { self.df.len() }
    pub fn is_empty(&self) -> bool { self.df.is_empty() }
}

#[derive(Debug, Default)]
pub struct WeightingModel {
    vocabulary: Vocabulary,
    vectors: Vec<SparseVector>,
}

fn sublinear_tf(count: u32) -> f32 {
    if count > 0 { 1.0 + (count as f32).ln() } else { 0.0 }
}

fn count_terms(text: &str) -> HashMap<String, u32> {
    let mut counts = HashMap::new();
    for term in terms(text) {
        *counts.entry(term).or_insert(0) += 1;
    }
    counts
}

impl WeightingModel {
    pub fn build<S: AsRef<str>>(texts: &[S], max_features: usize, idf_mode: IdfMode) -> Self {
        let num_docs = texts.len() as u32;
        let doc_counts: Vec<HashMap<String, u32>> = texts.iter().map(|t| count_terms(t.as_ref())).collect();

        let mut df: HashMap<&str, u32> = HashMap::new();
        let mut totals: HashMap<&str, u64> = HashMap::new();
        for counts in &doc_counts {
            for (term, &c) in counts {
                *df.entry(term.as_str()).or_insert(0) += 1;
                *totals.entry(term.as_str()).or_insert(0) += c as u64;
            }
        }

        let mut kept: Vec<&str> = totals.keys().copied().collect();
        if kept.len() > max_features {
            kept.sort_by(|a, b| totals[b].cmp(&totals[a]).then_with(|| a.cmp(b)));
            kept.truncate(max_features);
            tracing::debug!(raw = totals.len(), kept = max_features, "vocabulary capped");
        }
        kept.sort_unstable();

        let mut vocabulary = Vocabulary::default();
        for (tid, term) in kept.iter().enumerate() {
            let d = df[term];
            vocabulary.dictionary.insert(term.to_string(), tid as TermId);
            vocabulary.df.push(d);
            vocabulary.idf.push(idf_mode.idf(num_docs, d));
        }

        let vectors = doc_counts
            .iter()
            .map(|counts| {
                let weights = counts
                    .iter()
                    .filter_map(|(term, &c)| {
                        let tid = vocabulary.get(term)?;
                        Some((tid, sublinear_tf(c) * vocabulary.idf(tid)))
                    })
                    .collect();
                SparseVector::from_weights(weights)
            })
            .collect();

        tracing::info!(num_docs, num_terms = vocabulary.len(), ?idf_mode, "built weighting model");
        Self { vocabulary, vectors }
    }

    /// Project free text into the model's space. Unknown terms are ignored and
    /// document frequencies are never updated.
    pub fn transform(&self, text: &str) -> SparseVector {
        let weights = count_terms(text)
            .into_iter()
            .filter_map(|(term, c)| {
                let tid = self.vocabulary.get(&term)?;
                Some((tid, sublinear_tf(c) * self.vocabulary.idf(tid)))
            })
            .collect();
        SparseVector::from_weights(weights)
    }

    pub fn vocabulary(&self) -> &Vocabulary { &self.vocabulary }

    pub fn vectors(&self) -> &[SparseVector] { &self.vectors }
}
