use std::path::PathBuf;

/// Errors that can occur while reading, writing or watching settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialize error for settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to watch {path:?}: {source}")]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    #[error("no settings directory available on this platform")]
    NoConfigDir,
}
