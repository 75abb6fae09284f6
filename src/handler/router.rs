//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: matches the route table and
//! dispatches to the fixture or echo handlers.

use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper::http::uri::PathAndQuery;
use hyper::{HeaderMap, Method, Request, Response};
use std::convert::Infallible;
use std::fmt::Display;
use std::sync::Arc;

use super::{echo, fixtures};
use crate::config::AppState;
use crate::http::QueryParams;
use crate::logger;
use crate::routing::{self, Endpoint};

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub method: &'a Method,
    /// Path plus query string, as received
    pub url: &'a str,
    pub headers: &'a HeaderMap,
    pub query: QueryParams,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Display,
{
    let (parts, body) = req.into_parts();
    let ctx = RequestContext {
        method: &parts.method,
        url: parts
            .uri
            .path_and_query()
            .map_or("/", PathAndQuery::as_str),
        headers: &parts.headers,
        query: QueryParams::from_uri(&parts.uri),
    };

    let endpoint = routing::match_route(ctx.method, parts.uri.path(), &state.routes)
        .map_or(Endpoint::Echo, |route| route.endpoint);

    let response = match endpoint {
        Endpoint::Contact => fixtures::serve_contact(&ctx, &state).await,
        Endpoint::Contacts => fixtures::serve_contacts(&ctx, &state).await,
        Endpoint::Echo => {
            let payload = read_body(body).await;
            echo::serve_echo(&ctx, &payload, &state).await
        }
    };
    Ok(response)
}

/// Collect the whole request body; a failed read counts as no body
async fn read_body<B>(body: B) -> Bytes
where
    B: Body,
    B::Error: Display,
{
    match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            Bytes::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::logger::RecordingRequestLog;
    use hyper::StatusCode;
    use serde_json::{json, Value};
    use std::time::Duration;
    use tokio::time::Instant;

    fn test_state() -> (Arc<AppState>, Arc<RecordingRequestLog>) {
        let log = Arc::new(RecordingRequestLog::default());
        let state = AppState::with_request_log(&Config::default(), log.clone());
        (Arc::new(state), log)
    }

    fn request(method: Method, uri: &str, body: &'static str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Full::new(Bytes::from_static(body.as_bytes())))
            .unwrap()
    }

    async fn send(
        state: &Arc<AppState>,
        req: Request<Full<Bytes>>,
    ) -> (StatusCode, Bytes, Duration) {
        let started = Instant::now();
        let response = handle_request(req, Arc::clone(state)).await.unwrap();
        let elapsed = started.elapsed();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body, elapsed)
    }

    #[tokio::test(start_paused = true)]
    async fn test_contact_default_delay() {
        let (state, log) = test_state();
        let (status, body, elapsed) = send(&state, request(Method::GET, "/contact", "")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(elapsed >= Duration::from_millis(2000));
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["firstName"], "Алексей");
        assert_eq!(json["lastName"], "Петров");
        assert_eq!(json["email"], "alexey.petrov@example.com");

        let entries = log.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].method, "GET");
        assert_eq!(entries[0].url, "/contact");
        assert_eq!(entries[0].delay_ms, 2000);
        assert_eq!(entries[0].status, 200);
    }

    #[tokio::test(start_paused = true)]
    async fn test_contacts_default_delay() {
        let (state, _log) = test_state();
        let (status, body, elapsed) = send(&state, request(Method::GET, "/contacts", "")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(elapsed >= Duration::from_millis(1000));
        assert!(elapsed < Duration::from_millis(2000));
        let json: Value = serde_json::from_slice(&body).unwrap();
        let items = json.as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|c| c.get("position").is_none()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixture_delay_override_and_fallback() {
        let (state, log) = test_state();

        let (_, _, elapsed) = send(&state, request(Method::GET, "/contact?delay=50", "")).await;
        assert!(elapsed >= Duration::from_millis(50));
        assert!(elapsed < Duration::from_millis(2000));

        let (_, _, elapsed) = send(&state, request(Method::GET, "/contact?delay=soon", "")).await;
        assert!(elapsed >= Duration::from_millis(2000));

        let (_, _, elapsed) = send(&state, request(Method::GET, "/contacts?delay=0", "")).await;
        assert!(elapsed < Duration::from_millis(1000));

        let delays: Vec<u64> = log.entries().iter().map(|e| e.delay_ms).collect();
        assert_eq!(delays, vec![50, 2000, 0]);
    }

    #[tokio::test]
    async fn test_fixture_log_uses_route_path() {
        let (state, log) = test_state();
        send(&state, request(Method::GET, "/contact?delay=0&x=1", "")).await;
        send(&state, request(Method::GET, "/contacts?delay=0", "")).await;
        send(&state, request(Method::GET, "/other?delay=0", "")).await;

        let urls: Vec<String> = log.entries().into_iter().map(|e| e.url).collect();
        assert_eq!(urls, vec!["/contact", "/contacts", "/other?delay=0"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_echo_post_with_status() {
        let (state, log) = test_state();
        let (status, body, elapsed) = send(
            &state,
            request(Method::POST, "/anything?status=500&delay=0", ""),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(elapsed < Duration::from_millis(1000));
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["method"], "POST");
        assert_eq!(json["url"], "/anything?status=500&delay=0");
        assert_eq!(json["body"], Value::Null);
        assert_eq!(json["query"], json!({"status": "500", "delay": "0"}));
        assert!(json.get("delay").is_none());
        assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));

        let entries = log.entries();
        assert_eq!(entries[0].method, "POST");
        assert_eq!(entries[0].status, 500);
        assert_eq!(entries[0].delay_ms, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_echo_delay_is_reported() {
        let (state, _log) = test_state();
        let (_, body, elapsed) =
            send(&state, request(Method::PUT, "/slow?delay=750", "")).await;

        assert!(elapsed >= Duration::from_millis(750));
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["delay"], 750);
    }

    #[tokio::test]
    async fn test_echo_body_override() {
        let (state, _log) = test_state();
        let (status, body, _) = send(
            &state,
            request(Method::GET, "/foo?body=%7B%22a%22%3A1%7D", ""),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], br#"{"a":1}"#);

        let (_, body, _) = send(&state, request(Method::GET, "/foo?body=not-json", "")).await;
        assert_eq!(&body[..], br#"{"message":"not-json"}"#);
    }

    #[tokio::test]
    async fn test_echo_empty_body_directive_echoes_request() {
        let (state, _log) = test_state();
        let (status, body, _) = send(&state, request(Method::GET, "/x?body=", "")).await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["url"], "/x?body=");
        assert_eq!(json["query"], json!({"body": ""}));
        assert!(json.get("message").is_none());
    }

    #[tokio::test]
    async fn test_echo_nonstandard_status() {
        let (state, _log) = test_state();
        let (status, _, _) = send(&state, request(Method::GET, "/x?status=999", "")).await;
        assert_eq!(status.as_u16(), 999);
    }

    #[tokio::test]
    async fn test_echo_request_payload_and_headers() {
        let (state, _log) = test_state();
        let req = Request::builder()
            .method(Method::PATCH)
            .uri("/items/7")
            .header("content-type", "application/json")
            .header("x-trace", "abc")
            .body(Full::new(Bytes::from_static(br#"{"name":"widget"}"#)))
            .unwrap();
        let (_, body, _) = send(&state, req).await;

        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["method"], "PATCH");
        assert_eq!(json["url"], "/items/7");
        assert_eq!(json["body"], json!({"name": "widget"}));
        assert_eq!(json["headers"]["x-trace"], "abc");
        assert_eq!(json["query"], json!({}));
    }

    #[tokio::test]
    async fn test_echo_text_payload() {
        let (state, _log) = test_state();
        let (_, body, _) = send(&state, request(Method::POST, "/notes", "hello")).await;
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["body"], "hello");
    }

    #[tokio::test]
    async fn test_non_get_on_fixture_path_is_echoed() {
        let (state, _log) = test_state();
        let (status, body, _) = send(&state, request(Method::POST, "/contact", "")).await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["method"], "POST");
        assert_eq!(json["url"], "/contact");
    }

    #[tokio::test]
    async fn test_head_on_fixture_path() {
        let (state, log) = test_state();
        let (status, _, _) = send(&state, request(Method::HEAD, "/contact?delay=0", "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(log.entries()[0].method, "HEAD");
    }
}
