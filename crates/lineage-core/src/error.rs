pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Resource not found: {name}")]
    ResourceNotFound { name: String },

    #[error("I/O error reading {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid dataset JSON ({name}): {source}")]
    Dataset {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid table resource ({name}): {message}")]
    TableSyntax { name: String, message: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl Error {
    /// True for failures that mean "the resource is not there" rather than "the resource is broken".
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::ResourceNotFound { .. } => true,
            Error::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
