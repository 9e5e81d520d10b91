use std::path::PathBuf;

/// Errors produced by core `scour` operations.
#[derive(Debug, thiserror::Error)]
pub enum ScourError {
    #[error("failed to read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("catalog has no categories")]
    EmptyCatalog,

    #[error("empty label in category {0:?}")]
    EmptyLabel(String),

    #[error("duplicate label {label:?} in {scope}")]
    DuplicateLabel { scope: String, label: String },

    #[error("could not determine home directory")]
    NoHomeDir,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
