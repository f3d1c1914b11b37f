use crate::tracing::RequestId;
use axum::{
    extract::Request,
    http::{header::HeaderName, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Caller-supplied id when present and non-blank, otherwise a fresh one
fn incoming_request_id(headers: &HeaderMap) -> RequestId {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .map(RequestId::new)
        .unwrap_or_default()
}

fn stamp(headers: &mut HeaderMap, value: &Option<HeaderValue>) {
    if let Some(value) = value {
        headers.insert(HeaderName::from_static(REQUEST_ID_HEADER), value.clone());
    }
}

/// Scopes a request id around the handler so error bodies and log lines
/// carry it, and echoes it on the response.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = incoming_request_id(request.headers());
    let echoed = HeaderValue::from_str(request_id.as_str()).ok();

    stamp(request.headers_mut(), &echoed);
    request.extensions_mut().insert(request_id.clone());

    let span = tracing::info_span!(
        "request",
        request_id = %request_id.as_str(),
        method = %request.method(),
        uri = %request.uri(),
    );
    let mut response = crate::tracing::scope_request_id(request_id, next.run(request))
        .instrument(span)
        .await;

    stamp(response.headers_mut(), &echoed);
    response
}
