use axum::{
    body::Body,
    extract::Request,
    http::Method,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("gallery_api=info,tower_http=warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

const MAX_LOGGED_PAYLOAD: usize = 512;

pub async fn request_logger(mut request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let payload = extract_compact_payload(&mut request)
        .await
        .map(|p| truncate_payload(&p))
        .unwrap_or_else(|| "{}".to_string());

    let start = Instant::now();
    let response = next.run(request).await;
    let elapsed_ms = format!("{:.2}", start.elapsed().as_secs_f64() * 1000.0);
    let status = response.status().as_u16();

    match status {
        500..=599 => error!(%method, %path, status, %elapsed_ms, %payload, "request failed"),
        400..=499 => warn!(%method, %path, status, %elapsed_ms, %payload, "request rejected"),
        _ => info!(%method, %path, status, %elapsed_ms, %payload, "request"),
    }

    response
}

/// Cuts long bodies (large id or tag lists) on a char boundary.
fn truncate_payload(payload: &str) -> String {
    if payload.len() <= MAX_LOGGED_PAYLOAD {
        return payload.to_string();
    }
    let mut cut = MAX_LOGGED_PAYLOAD;
    while !payload.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &payload[..cut])
}

/// Reads a JSON body for logging and puts the bytes back for the handler.
async fn extract_compact_payload(request: &mut Request<Body>) -> Option<String> {
    if request.method() != Method::POST && request.method() != Method::PUT {
        return None;
    }

    let body = std::mem::replace(request.body_mut(), Body::empty());
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(_) => return None,
    };

    let compact = match serde_json::from_slice::<serde_json::Value>(&bytes) {
        Ok(value) => value.to_string(),
        Err(_) => String::from_utf8_lossy(&bytes).trim().to_string(),
    };

    *request.body_mut() = Body::from(bytes);

    Some(compact)
}

pub fn log_panic(info: &std::panic::PanicHookInfo) {
    let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic payload".to_string()
    };

    let location = if let Some(loc) = info.location() {
        format!("{}:{}:{}", loc.file(), loc.line(), loc.column())
    } else {
        "unknown location".to_string()
    };

    error!("PANIC at {}: {}", location, payload);
}

pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        log_panic(info);
        default_hook(info);
    }));
}
