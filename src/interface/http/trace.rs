use axum::http::{HeaderValue, Method, Request, header};
use axum::middleware::Next;
use axum::response::Response;
use metrics::{counter, histogram};
use tracing::info;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Identifier attached to every request and echoed back to the caller.
#[derive(Debug, Clone)]
pub struct TraceId(pub String);

/// Reuses a caller-supplied `x-request-id` or generates one, and echoes it back.
pub async fn trace_id_middleware(mut req: Request<axum::body::Body>, next: Next) -> Response {
    // Step 1: Pick the id.
    let trace_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let trace_id = TraceId(trace_id);

    // Step 2: Expose it to downstream handlers.
    req.extensions_mut().insert(trace_id.clone());

    // Step 3: Run the request and stamp the response.
    let mut response = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&trace_id.0) {
        response
            .headers_mut()
            .insert(header::HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    response
}

/// Logs one `http_request` event per request and records request metrics.
pub async fn request_log_middleware(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let trace_id = req.extensions().get::<TraceId>().map(|t| t.0.clone());
    let start = std::time::Instant::now();

    let response = next.run(req).await;

    let latency_ms = start.elapsed().as_millis() as u64;
    let status = response.status().as_u16();
    let method_label = method_label(&method);
    let status_label = status_class(status);
    counter!("http_requests_total", "method" => method_label, "status" => status_label)
        .increment(1);
    histogram!(
        "http_request_duration_ms",
        "method" => method_label,
        "status" => status_label
    )
    .record(latency_ms as f64);
    info!(
        trace_id = trace_id.as_deref().unwrap_or(""),
        method = %method,
        path = %path,
        status,
        latency_ms,
        "http_request"
    );

    response
}

// Bounded label values keep metric cardinality fixed.
fn method_label(method: &Method) -> &'static str {
    match method.as_str() {
        "GET" => "GET",
        "HEAD" => "HEAD",
        "POST" => "POST",
        "OPTIONS" => "OPTIONS",
        _ => "OTHER",
    }
}

fn status_class(status: u16) -> &'static str {
    match status {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}
