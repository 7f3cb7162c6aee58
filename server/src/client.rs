use async_compat::CompatExt;
use axum::body::Bytes;
use futures::{AsyncRead, AsyncWrite};
use http_body_util::{BodyExt, Full};
use hyper::{
    HeaderMap, Request, StatusCode,
    body::Incoming,
    client::conn::{http1, http2},
};
use hyper_util::rt::TokioIo;
use shared::SmolExecutor;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Handshake failed: {0}")]
    Handshake(hyper::Error),

    #[error("Request failed: {0}")]
    RequestFailed(hyper::Error),

    #[error("Response body collection failed: {0}")]
    BodyCollection(hyper::Error),

    #[error("Connection task failed: {0}")]
    ConnectionTask(hyper::Error),
}

pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Sends a single HTTP/1.1 request over `cnx` and closes the connection once
/// the response body has been read.
pub async fn send_request<IO>(
    request: Request<Full<Bytes>>,
    cnx: IO,
) -> Result<Response, ClientError>
where
    IO: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let (mut sender, conn) = http1::handshake(TokioIo::new(cnx.compat()))
        .await
        .map_err(ClientError::Handshake)?;

    let request_task = async move {
        let res = sender
            .send_request(request)
            .await
            .map_err(ClientError::RequestFailed)?;
        collect(res).await
    };

    let (conn_result, response) = futures::join!(conn, request_task);
    conn_result.map_err(ClientError::ConnectionTask)?;
    let response = response?;

    debug!("HTTP/1.1 request sent, status: {}", response.status);
    Ok(response)
}

/// Same as [`send_request`] but speaks HTTP/2 with prior knowledge.
pub async fn send_h2_request<IO>(
    request: Request<Full<Bytes>>,
    cnx: IO,
) -> Result<Response, ClientError>
where
    IO: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let (mut sender, conn) = http2::handshake(SmolExecutor::new(), TokioIo::new(cnx.compat()))
        .await
        .map_err(ClientError::Handshake)?;

    let request_task = async move {
        let res = sender
            .send_request(request)
            .await
            .map_err(ClientError::RequestFailed)?;
        collect(res).await
    };

    let (conn_result, response) = futures::join!(conn, request_task);
    conn_result.map_err(ClientError::ConnectionTask)?;
    let response = response?;

    debug!("HTTP/2 request sent, status: {}", response.status);
    Ok(response)
}

async fn collect(res: hyper::Response<Incoming>) -> Result<Response, ClientError> {
    let status = res.status();
    let headers = res.headers().clone();
    let body = res
        .into_body()
        .collect()
        .await
        .map_err(ClientError::BodyCollection)?
        .to_bytes()
        .to_vec();

    Ok(Response {
        status,
        headers,
        body,
    })
}
