use thiserror::Error;

pub type Result<T> = std::result::Result<T, RecError>;

#[derive(Error, Debug)]
pub enum RecError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Embedding model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Catalog index has not been built")]
    IndexNotBuilt,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub mod catalog;
pub mod commands;
pub mod config;
pub mod embeddings;
pub mod index;
pub mod ranker;
pub mod service;
