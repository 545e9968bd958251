use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Connection unavailable: {0}")]
    ConnectionUnavailable(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store closed")]
    Closed,
}

impl StorageError {
    /// True when the failure says something about the link itself rather than the request.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::ConnectionUnavailable(_))
    }
}

impl From<redis::RedisError> for StorageError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_connection_dropped()
            || err.is_connection_refusal()
            || err.is_io_error()
            || err.is_timeout()
        {
            Self::ConnectionUnavailable(err.to_string())
        } else {
            Self::OperationFailed(err.to_string())
        }
    }
}

impl From<mongodb::error::Error> for StorageError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind;

        match *err.kind {
            ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) => {
                Self::ConnectionUnavailable(err.to_string())
            }
            ErrorKind::InvalidArgument { .. } => Self::Config(err.to_string()),
            _ => Self::OperationFailed(err.to_string()),
        }
    }
}
