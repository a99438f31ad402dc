use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or flattening an ARM template
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("failed to read template {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed template JSON in {origin}: {message}")]
    Parse { origin: String, message: String },

    #[error("template has no top-level `resources` array")]
    MissingResources,

    #[error("resource name `{raw}` is not an ARM name expression")]
    MalformedName { raw: String },

    #[error("cleansed name `{name}` still carries ARM expression syntax")]
    ResidualExpression { name: String },
}

pub type Result<T> = std::result::Result<T, InventoryError>;
