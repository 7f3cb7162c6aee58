use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(#[from] tracing_subscriber::filter::ParseError),

    #[error("Subscriber initialisation failed: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}
