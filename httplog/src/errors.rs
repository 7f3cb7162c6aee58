use std::{net::SocketAddr, path::PathBuf};

use thiserror::Error;

/// Failures that stop the process before it starts serving.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Failed to create log directory {}: {source}", path.display())]
    CreateLogDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Logging(#[from] shared::LoggingError),
}
