use crate::errors::{MetricsError, Result};
use crate::models::InputDocument;
use std::path::Path;
use tokio::fs;
use tracing::error;

pub async fn load_document(path: &Path) -> Result<InputDocument> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(source) => {
            error!("failed to read metrics file {}: {source}", path.display());
            return Err(MetricsError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    InputDocument::from_slice(&bytes).map_err(|source| {
        error!("failed to parse metrics file {}: {source}", path.display());
        MetricsError::Decode {
            path: path.to_path_buf(),
            source,
        }
    })
}
