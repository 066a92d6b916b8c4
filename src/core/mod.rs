//! Core domain types

pub mod article;
pub mod cluster;
pub mod embedding;
pub mod error;
pub mod tag;

pub use article::{Article, EmbeddedArticle};
pub use cluster::{Cluster, ClusterParams, ClusterSummary, Embedded};
pub use embedding::Embedding;
pub use error::{CoreError, Result};
pub use tag::Tag;
