use async_compat::CompatExt;
use axum::Router;
use futures::{AsyncRead, AsyncWrite};
use hyper::{Request, body::Incoming};
use hyper_util::rt::TokioIo;
use shared::SmolExecutor;
use thiserror::Error;
use tower::Service;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("Failed to serve connection: {0}")]
    ServeConnection(Box<dyn std::error::Error + Send + Sync>),
}

/// Serves every request arriving on `cnx` with `tower_service`. HTTP/1.1 and
/// HTTP/2 (prior knowledge) are both accepted.
pub async fn handle_connection<IO>(
    tower_service: Router,
    executor: SmolExecutor,
    cnx: IO,
) -> Result<(), ConnectionError>
where
    IO: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let stream = TokioIo::new(cnx.compat());

    let hyper_service = hyper::service::service_fn(move |request: Request<Incoming>| {
        tower_service.clone().call(request)
    });

    hyper_util::server::conn::auto::Builder::new(executor)
        .serve_connection(stream, hyper_service)
        .await
        .map_err(ConnectionError::ServeConnection)?;

    debug!("Connection closed");
    Ok(())
}
