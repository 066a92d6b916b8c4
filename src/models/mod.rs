//! # Embedding Models
//!
//! The `Embedder` trait and its ONNX sentence-transformer implementation.

pub mod embedder;
pub mod text;

pub use embedder::Embedder;
pub use text::TextModel;
