//! Catch-all echo endpoint
//!
//! Any method on any path not claimed by a fixture route. The caller steers
//! the answer with query directives:
//! - `delay`: milliseconds to wait before answering (default 0)
//! - `status`: response status code (default 200)
//! - `body`: response body, parsed as JSON or wrapped as `{"message": ...}`
//!
//! Without `body` the request itself is echoed back.

use chrono::{SecondsFormat, Utc};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::CONTENT_TYPE;
use hyper::{HeaderMap, Response, StatusCode};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::time::Duration;

use super::router::RequestContext;
use crate::config::AppState;
use crate::http::{self, QueryParams};
use crate::logger::{self, RequestLogEntry};

/// Request echo returned when no `body` directive is given
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Envelope {
    pub ok: bool,
    pub method: String,
    pub url: String,
    pub headers: Map<String, Value>,
    pub body: Value,
    pub query: Map<String, Value>,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<u64>,
}

impl Envelope {
    fn from_request(ctx: &RequestContext<'_>, payload: &Bytes, delay_ms: u64) -> Self {
        Self {
            ok: true,
            method: ctx.method.to_string(),
            url: ctx.url.to_string(),
            headers: headers_to_json(ctx.headers),
            body: parse_payload(ctx.headers, payload),
            query: ctx.query.to_json(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            delay: (delay_ms > 0).then_some(delay_ms),
        }
    }
}

/// What the response body will be, decided once per request
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Echo of the request
    Default(Box<Envelope>),
    /// `body` directive that parsed as JSON
    Override(Value),
    /// `body` directive that did not parse, sent as `{"message": raw}`
    OverrideText(String),
}

impl ResponseBody {
    /// Pick the body: a non-empty directive wins, the envelope otherwise
    pub fn resolve(directive: Option<&str>, envelope: impl FnOnce() -> Envelope) -> Self {
        match directive.filter(|raw| !raw.is_empty()) {
            None => Self::Default(Box::new(envelope())),
            Some(raw) => match serde_json::from_str::<Value>(raw) {
                Ok(value) => Self::Override(value),
                Err(_) => Self::OverrideText(raw.to_string()),
            },
        }
    }
}

impl Serialize for ResponseBody {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Default(envelope) => envelope.serialize(serializer),
            Self::Override(value) => value.serialize(serializer),
            Self::OverrideText(raw) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("message", raw)?;
                map.end()
            }
        }
    }
}

pub async fn serve_echo(
    ctx: &RequestContext<'_>,
    payload: &Bytes,
    state: &AppState,
) -> Response<Full<Bytes>> {
    let delay_ms = ctx.query.delay_ms(0);
    let status = resolve_status(&ctx.query);

    if delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    let body = ResponseBody::resolve(ctx.query.get("body"), || {
        Envelope::from_request(ctx, payload, delay_ms)
    });

    state.request_log.record(&RequestLogEntry::new(
        ctx.method.as_str(),
        ctx.url,
        delay_ms,
        status.as_u16(),
    ));
    http::json_response(status, &body)
}

/// `status` directive, or 200 when absent or not a representable status code
fn resolve_status(query: &QueryParams) -> StatusCode {
    let Some(code) = query.get_int("status") else {
        return StatusCode::OK;
    };

    u16::try_from(code)
        .ok()
        .and_then(|c| StatusCode::from_u16(c).ok())
        .unwrap_or_else(|| {
            logger::log_warning(&format!(
                "Status code {code} is outside 100-999, answering 200"
            ));
            StatusCode::OK
        })
}

/// Header name to value; repeated headers are joined with ", "
fn headers_to_json(headers: &HeaderMap) -> Map<String, Value> {
    headers
        .keys()
        .map(|name| {
            let joined = headers
                .get_all(name)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                .collect::<Vec<_>>()
                .join(", ");
            (name.as_str().to_string(), Value::String(joined))
        })
        .collect()
}

/// Request payload as JSON: parsed for JSON content types, text otherwise
fn parse_payload(headers: &HeaderMap, payload: &Bytes) -> Value {
    if payload.is_empty() {
        return Value::Null;
    }

    if is_json_content_type(headers) {
        if let Ok(value) = serde_json::from_slice(payload) {
            return value;
        }
    }

    Value::String(String::from_utf8_lossy(payload).into_owned())
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| mime.trim().to_ascii_lowercase())
        .is_some_and(|mime| mime == "application/json" || mime.ends_with("+json"))
}
