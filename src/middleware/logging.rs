use axum::{
    extract::{MatchedPath, Request},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Logs one structured line per request and tags the response with a request id
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4().to_string();

    let method = req.method().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    tracing::debug!(request_id = %request_id, method = %method, path = %path, "incoming request");

    let mut response = next.run(req).await;

    let duration_ms = start.elapsed().as_millis();
    let status = response.status().as_u16();

    match status {
        500..=599 => tracing::error!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status,
            duration_ms = %duration_ms,
            "request failed"
        ),
        400..=499 => tracing::warn!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status,
            duration_ms = %duration_ms,
            "request rejected"
        ),
        _ => tracing::info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status,
            duration_ms = %duration_ms,
            "request completed"
        ),
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Router};

    #[tokio::test]
    async fn test_response_carries_request_id() {
        let app = Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(axum::middleware::from_fn(request_logging_middleware));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let first = reqwest::get(format!("http://{}/ping", addr)).await.unwrap();
        let second = reqwest::get(format!("http://{}/missing", addr)).await.unwrap();

        let first_id = first.headers()[REQUEST_ID_HEADER].to_str().unwrap().to_string();
        assert!(Uuid::parse_str(&first_id).is_ok());
        assert_eq!(second.status(), reqwest::StatusCode::NOT_FOUND);
        assert_ne!(second.headers()[REQUEST_ID_HEADER].to_str().unwrap(), first_id);
    }
}
