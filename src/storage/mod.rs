//! Embedding cache and record I/O

pub mod cache;
pub mod records;

pub use cache::CachedEmbedder;
pub use records::{load_articles, load_tags, write_json};
