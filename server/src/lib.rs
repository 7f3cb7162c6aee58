pub mod app;
#[cfg(test)]
mod client;
pub mod errors;
pub mod handler;
pub mod listener;
pub mod record;
pub mod storage;

pub use app::{AppState, CaptureResponse, get_app};
pub use errors::CaptureError;
pub use handler::{ConnectionError, handle_connection};
pub use listener::serve;
pub use record::CapturedRequest;
pub use storage::{DATA_FILE, DirAllocator, LOG_FILE, LogDirAllocator};
