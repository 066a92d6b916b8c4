//! Text normalization, similarity scoring, matching and clustering
//!
//! Nothing in here loads a model: matching and clustering run on
//! embeddings produced by an injected `Embedder`.

pub mod cluster;
pub mod matcher;
pub mod normalize;
pub mod similarity;

pub use cluster::{average_linkage, coherence, Clusterer};
pub use matcher::{rank_matches, Match, Matcher};
pub use normalize::{article_text, tag_text};
pub use similarity::{cosine_similarity, cosine_similarity_batch, distance_matrix, similarity_matrix};
