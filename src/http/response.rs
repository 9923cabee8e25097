//! HTTP response building module
//!
//! Every response produced by the service carries `Content-Type: application/json`,
//! including the plain-text error bodies.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::error::ApiError;

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Build a response with the service-wide content type
pub fn build_response(status: StatusCode, body: impl Into<Bytes>) -> Response<Full<Bytes>> {
    let body = body.into();
    Response::builder()
        .status(status)
        .header("Content-Type", CONTENT_TYPE_JSON)
        .body(Full::new(body.clone()))
        .unwrap_or_else(|e| {
            log_build_error(status, &e);
            Response::new(Full::new(body))
        })
}

/// Encode `value` and build a 200 OK response from it
pub fn build_json_response<T: Serialize + ?Sized>(
    value: &T,
) -> Result<Response<Full<Bytes>>, ApiError> {
    let json = serde_json::to_vec(value)?;
    Ok(build_response(StatusCode::OK, json))
}

/// Build the response for a failed request
pub fn build_error_response(err: &ApiError) -> Response<Full<Bytes>> {
    build_response(err.status(), err.body())
}

/// Log response build error
fn log_build_error(status: StatusCode, error: &hyper::http::Error) {
    crate::logger::log_error(&format!(
        "Failed to build {} response: {error}",
        status.as_u16()
    ));
}
