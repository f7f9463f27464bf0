use axum::{
    body::{Body, HttpBody},
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use super::api::{error_body, ApiError};

/// Reject bodies that are not JSON or are larger than `max_request_size`
pub async fn request_validation_middleware(
    State(max_request_size): State<usize>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    validate_content_type(&request)?;
    validate_request_size(&request, max_request_size)?;

    Ok(next.run(request).await)
}

fn has_body(request: &Request<Body>) -> bool {
    request.body().size_hint().exact() != Some(0)
}

/// Only writes that carry a body are checked
fn validate_content_type(request: &Request<Body>) -> Result<(), ApiError> {
    let method = request.method();
    if !(method == Method::POST || method == Method::PUT || method == Method::PATCH)
        || !has_body(request)
    {
        return Ok(());
    }

    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|value| value.to_str().unwrap_or(""));

    match content_type {
        Some(value) if value.starts_with("application/json") => Ok(()),
        Some(value) => {
            warn!(content_type = value, "Rejected non-JSON body");
            Err(error_body(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Content-Type must be application/json",
            ))
        }
        None => {
            warn!("Body sent without Content-Type");
            Err(error_body(
                StatusCode::BAD_REQUEST,
                "Content-Type header is required for requests with a body",
            ))
        }
    }
}

fn validate_request_size(request: &Request<Body>, max_request_size: usize) -> Result<(), ApiError> {
    let length = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok())
        .or_else(|| request.body().size_hint().exact());

    match length {
        Some(length) if length > max_request_size as u64 => {
            warn!(length, limit = max_request_size, "Rejected oversized body");
            Err(error_body(
                StatusCode::PAYLOAD_TOO_LARGE,
                format!(
                    "Request body of {} bytes exceeds the {} byte limit",
                    length, max_request_size
                ),
            ))
        }
        _ => Ok(()),
    }
}

/// CORS middleware for handling cross-origin requests
pub async fn cors_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization"),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static("86400"),
    );

    response
}

/// Security headers middleware
pub async fn security_headers_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::X_XSS_PROTECTION,
        HeaderValue::from_static("1; mode=block"),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'self'"),
    );

    response
}
