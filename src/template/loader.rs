use crate::error::{InventoryError, Result};
use serde_json::Value;
use std::path::Path;

/// Read and parse an ARM template from disk
pub fn load_template<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    let mut content = std::fs::read(path).map_err(|source| InventoryError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "read template");
    parse_template(&mut content, &path.display().to_string())
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parse template bytes. `origin` names the source in error messages.
///
/// A leading UTF-8 byte order mark is skipped. simd-json parses in place,
/// so the buffer is clobbered.
pub fn parse_template(content: &mut [u8], origin: &str) -> Result<Value> {
    let content = if content.starts_with(UTF8_BOM) {
        &mut content[UTF8_BOM.len()..]
    } else {
        content
    };

    let value: Value = simd_json::serde::from_slice(content).map_err(|e| InventoryError::Parse {
        origin: origin.to_string(),
        message: e.to_string(),
    })?;

    // Fail fast rather than emit five empty inventories
    resources(&value)?;
    Ok(value)
}

/// The template's top-level `resources` array
pub fn resources(template: &Value) -> Result<&[Value]> {
    template
        .get("resources")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or(InventoryError::MissingResources)
}
