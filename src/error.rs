use std::path::PathBuf;

/// Errors at the crate's outer edges. The media pipeline and view state
/// machines never fail.
#[derive(Debug, thiserror::Error)]
pub enum GalleryError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid fixture {}", path.display())]
    Fixture {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("fixture {} has no [primary] table", path.display())]
    MissingPrimary { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, GalleryError>;
