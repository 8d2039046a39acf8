use crate::repository::{DataRepository, Dataset};
use crate::seed::seed_dataset;
use crate::DbError;
use std::path::Path;

/// Builds the repository from a JSON dataset file, or from the built-in seed
/// data when no path is configured.
pub fn load_dataset(path: Option<&Path>) -> Result<DataRepository, DbError> {
    let dataset = match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Reading dataset file.");
            let raw = std::fs::read_to_string(path).map_err(|source| DbError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            serde_json::from_str::<Dataset>(&raw)?
        }
        None => {
            tracing::info!("No dataset file configured, using seed data.");
            seed_dataset()?
        }
    };

    DataRepository::new(dataset)
}
