use axum::{
    extract::{MatchedPath, Request},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tracing::Level;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request id made available to handlers as a request extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    fn from_request(request: &Request) -> Self {
        let id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map_or_else(|| uuid::Uuid::new_v4().to_string(), ToString::to_string);
        Self(id)
    }
}

/// Route template for logging, e.g. `/cases/:id`, so case ids do not
/// fragment the access log. Unmatched requests fall back to the raw path.
fn route_label(request: &Request) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str)
        .to_string()
}

/// Tags each request with an id, echoes it on the response and logs one
/// `request_completed` event per request.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = RequestId::from_request(&request);
    let method = request.method().clone();
    let route = route_label(&request);
    let header_value = HeaderValue::from_str(&request_id.0).ok();

    request.extensions_mut().insert(request_id.clone());

    let start = std::time::Instant::now();
    let mut response = next.run(request).await;
    let latency = start.elapsed();

    if let Some(hv) = header_value {
        response.headers_mut().insert(REQUEST_ID_HEADER, hv);
    }

    tracing::event!(
        Level::INFO,
        req_id = %request_id.0,
        method = %method,
        route = %route,
        status = response.status().as_u16(),
        latency_ms = latency.as_millis(),
        "request_completed"
    );

    response
}
