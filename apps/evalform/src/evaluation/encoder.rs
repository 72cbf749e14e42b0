use std::path::{Path, PathBuf};

use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
#[error("failed to read file {path}: {source}")]
pub struct EncodeError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Reads the whole file and returns its standard Base64 text, with no
/// data-URI prefix.
pub async fn encode_file(path: &Path) -> Result<String, EncodeError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| EncodeError {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Encoding {} bytes from {}", bytes.len(), path.display());
    Ok(encode_bytes(&bytes))
}

pub fn encode_bytes(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}
