use std::future::Future;

/// hyper `Executor` backed by smol's global executor. HTTP/2 connections use
/// it for their per-stream background tasks.
#[derive(Clone, Copy, Debug, Default)]
pub struct SmolExecutor;

impl SmolExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl<F> hyper::rt::Executor<F> for SmolExecutor
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    fn execute(&self, fut: F) {
        smol::spawn(fut).detach();
    }
}
