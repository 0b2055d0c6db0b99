use std::path::PathBuf;

/// Errors raised by the dataset preparation library
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A source file could not be decoded as an image
    #[error("Failed to read image {}: {reason}", path.display())]
    UnreadableImage { path: PathBuf, reason: String },

    /// A transform or preprocessing step received a degenerate image
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// A transform was configured with parameters it cannot work with
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// No images were found for a requested display category
    #[error("No images found for {0}")]
    MissingCategory(String),

    /// The catalogue has no transform with this identifier
    #[error("Unknown transform: {0}")]
    UnknownTransform(String),

    /// Filesystem failure while walking or writing a dataset tree
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failure while encoding an image to disk
    #[error("Failed to save image to {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
