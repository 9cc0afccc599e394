// Re-export model modules
mod categories;
mod videos;

pub use categories::*;
pub use videos::*;

/// The enriched dataset every chart is computed from
#[derive(Debug, Clone, PartialEq)]
pub struct TrendTable {
    pub records: Vec<VideoRecord>,
    pub categories: CategoryMap,
}
