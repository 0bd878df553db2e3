pub mod config;
pub mod corpus;
pub mod index;
pub mod lookup;
pub mod model;
pub mod search;
pub mod tokenizer;

pub type TermId = u32;
pub type DocId = u32;

pub use config::SearchConfig;
pub use corpus::{CorpusLoadError, CorpusStore, DocumentRecord};
pub use index::{InvertedIndex, Posting};
pub use lookup::Suggestion;
pub use model::{IdfMode, SparseVector, WeightingModel};
pub use search::{Hit, IndexStats, SearchContext};
