use crate::model::{SparseVector, WeightingModel};
use crate::{DocId, TermId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Posting {
    pub doc_id: DocId,
    pub weight: f32, // normalized tf-idf weight
}

/// Term -> postings view over the document vectors, postings sorted by doc_id.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: Vec<Vec<Posting>>,
    num_docs: u32,
}

impl InvertedIndex {
    pub fn build(model: &WeightingModel) -> Self {
        let mut postings: Vec<Vec<Posting>> = vec![Vec::new(); model.vocabulary().len()];
        for (doc_id, vector) in model.vectors().iter().enumerate() {
            for &(tid, weight) in vector.entries() {
                postings[tid as usize].push(Posting { doc_id: doc_id as DocId, weight });
            }
        }
        Self { postings, num_docs: model.vectors().len() as u32 }
    }

    pub fn postings(&self, term: TermId) -> &[Posting] {
        self.postings.get(term as usize).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn num_postings(&self) -> usize { self.postings.iter().map(Vec::len).sum() }

    /// Cosine similarity of the query against every document. Both sides are
    /// L2-normalized, so the accumulated dot product is the cosine.
    pub fn score(&self, query: &SparseVector) -> Vec<f32> {
        let mut scores = vec![0.0f32; self.num_docs as usize];
        for &(tid, q_w) in query.entries() {
            for p in self.postings(tid) {
                scores[p.doc_id as usize] += p.weight * q_w;
            }
        }
        scores
    }
}
