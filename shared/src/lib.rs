mod errors;
mod executor;
mod logging;

pub use errors::LoggingError;
pub use executor::SmolExecutor;
pub use logging::{init_logging, init_test_logging};
