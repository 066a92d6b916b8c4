//! # Cognos Library
//!
//! Semantic tag matching and story clustering for news articles using
//! all-MiniLM-L6-v2 sentence embeddings on ONNX Runtime.

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod models;
pub mod processing;
pub mod runtime;
pub mod storage;
pub mod ui;
