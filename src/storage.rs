use std::path::Path;
use tracing::{debug, warn};

use crate::error::{DashboardError, Result};

/// Read one lead export as text
///
/// Invalid UTF-8 sequences are replaced rather than rejected, so a stray
/// byte in a vendor export does not block the whole dashboard.
pub async fn read_lead_file(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| DashboardError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(path = %path.display(), bytes = bytes.len(), "read lead file");
    Ok(decode_text(path, bytes))
}

fn decode_text(path: &Path, bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            warn!(path = %path.display(), "lead file is not valid UTF-8, replacing invalid bytes");
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    }
}

/// Read both exports concurrently
///
/// Both reads are issued together; the first failure aborts the pair.
pub async fn read_input_pair(first: &Path, second: &Path) -> Result<(String, String)> {
    tokio::try_join!(read_lead_file(first), read_lead_file(second))
}
