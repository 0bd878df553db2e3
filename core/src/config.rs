use crate::model::IdfMode;

#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Vocabulary cap, most frequent terms win.
    pub max_features: usize,
    /// Best-hit cosine below this returns no results.
    pub relevance_floor: f32,
    pub default_top_k: usize,
    pub autocomplete_min_chars: usize,
    pub default_autocomplete_limit: usize,
    pub idf: IdfMode,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_features: 20_000,
            relevance_floor: 0.02,
            default_top_k: 6,
            autocomplete_min_chars: 2,
            default_autocomplete_limit: 5,
            idf: IdfMode::Plain,
        }
    }
}
