use std::sync::Arc;

use axum::{
    Router,
    body::{Body, Bytes},
    extract::{Request, State},
    http::{
        HeaderMap, HeaderValue, Method, StatusCode,
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, CONTENT_TYPE,
        },
    },
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    errors::CaptureError,
    record::CapturedRequest,
    storage::{DATA_FILE, DirAllocator, LOG_FILE},
};

pub const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization, X-Requested-With";
pub const MAX_AGE_SECS: &str = "86400";

const JSON_UTF8: &str = "application/json; charset=utf-8";
const SUCCESS_MESSAGE: &str = "request logged";

#[derive(Clone)]
pub struct AppState {
    allocator: Arc<dyn DirAllocator>,
}

impl AppState {
    pub fn new(allocator: impl DirAllocator + 'static) -> Self {
        Self {
            allocator: Arc::new(allocator),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureResponse {
    pub status: String,
    pub message: String,
    pub log_dir: String,
}

/// Every method on every path lands in [`capture`].
pub fn get_app(allocator: impl DirAllocator + 'static) -> Router {
    let state = AppState::new(allocator);
    Router::new().fallback(capture).with_state(state)
}

async fn capture(State(state): State<AppState>, request: Request) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        debug!(uri = %request.uri(), "answering pre-flight request");
        StatusCode::OK.into_response()
    } else {
        match persist(&state, request).await {
            Ok(response) => response,
            Err(error) => error.into_response(),
        }
    };

    set_cors_headers(response.headers_mut());
    response
}

async fn persist(state: &AppState, request: Request) -> Result<Response, CaptureError> {
    let allocator = Arc::clone(&state.allocator);
    let dir = smol::unblock(move || allocator.allocate()).await?;

    let (parts, body) = request.into_parts();
    let body = read_body(body).await?;

    let record = CapturedRequest::from_request(&parts, &body);
    let log = record.to_json_pretty()?;

    smol::fs::write(dir.join(LOG_FILE), &log)
        .await
        .map_err(|source| CaptureError::Persistence {
            file: LOG_FILE,
            source,
        })?;

    if !body.is_empty() {
        smol::fs::write(dir.join(DATA_FILE), &body)
            .await
            .map_err(|source| CaptureError::Persistence {
                file: DATA_FILE,
                source,
            })?;
    }

    info!(
        method = %record.method,
        url = %record.url,
        dir = %dir.display(),
        body_len = body.len(),
        "captured request"
    );

    let ack = serde_json::to_vec(&CaptureResponse {
        status: "success".to_string(),
        message: SUCCESS_MESSAGE.to_string(),
        log_dir: dir.display().to_string(),
    })?;

    Ok((
        StatusCode::OK,
        [(CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8))],
        ack,
    )
        .into_response())
}

async fn read_body(body: Body) -> Result<Bytes, CaptureError> {
    axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(CaptureError::BodyRead)
}

fn set_cors_headers(headers: &mut HeaderMap) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(MAX_AGE_SECS));
}
