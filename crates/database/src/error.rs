use core_types::CoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to read dataset file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("An error occurred during JSON deserialization of the dataset: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("The dataset failed validation: {0}")]
    Validation(#[from] CoreError),
}
