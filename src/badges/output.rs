//! Badge file serialization.

use std::io;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::debug;

use super::BadgeRecord;
use crate::scraper::ScrapeError;

const INDENT: &[u8] = b"    ";

/// Render records as a 4-space indented JSON array.
///
/// Non-ASCII text is written as-is rather than `\u` escaped. An empty slice
/// renders as `[]`.
pub fn to_json_bytes(records: &[BadgeRecord]) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(records.len() * 128 + 2);
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    records.serialize(&mut ser)?;
    Ok(buf)
}

/// Write the badge file, replacing whatever was there before.
///
/// Missing parent directories are created.
pub async fn write_records(path: &Path, records: &[BadgeRecord]) -> Result<(), ScrapeError> {
    let output_err = |source: io::Error| ScrapeError::Output {
        path: path.to_path_buf(),
        source,
    };

    let bytes = to_json_bytes(records).map_err(|e| output_err(e.into()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(output_err)?;
    }
    tokio::fs::write(path, &bytes).await.map_err(output_err)?;

    debug!(
        path = %path.display(),
        records = records.len(),
        bytes = bytes.len(),
        "badge file written"
    );
    Ok(())
}
