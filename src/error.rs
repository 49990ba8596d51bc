use std::path::PathBuf;

/// Errors surfaced by the enrichment layer.
///
/// Collaborator failures keep their own variants so callers can tell a
/// broken recall backend apart from a turn that simply had no context.
#[derive(Debug, thiserror::Error)]
pub enum EnricherError {
    #[error("reading config file {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing TOML config from {origin}: {source}")]
    ConfigToml {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("parsing JSON settings: {0}")]
    ConfigJson(#[from] serde_json::Error),

    #[error("invalid setting `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// The host failed to recall context for the current turn.
    #[error("context recall failed: {0:#}")]
    Recall(#[source] anyhow::Error),

    /// The double-pass re-embedding or re-recall failed.
    #[error("second-pass recall failed: {0:#}")]
    SecondPass(#[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, EnricherError>;
