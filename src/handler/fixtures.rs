//! Fixture endpoints
//!
//! `/contact` and `/contacts` answer with hardcoded contacts after an
//! artificial delay, imitating a slow upstream API.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;
use std::time::Duration;

use super::router::RequestContext;
use crate::config::AppState;
use crate::http;
use crate::logger::RequestLogEntry;

/// Contact record returned by the fixture endpoints
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Contact {
    fn new(first_name: &str, last_name: &str, email: &str, phone: &str, company: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            company: company.to_string(),
            position: None,
            source: None,
        }
    }
}

/// The contact served by `/contact`
pub fn single_contact() -> Contact {
    Contact {
        position: Some("Директор по развитию".to_string()),
        source: Some("mock-server".to_string()),
        ..Contact::new(
            "Алексей",
            "Петров",
            "alexey.petrov@example.com",
            "+7 912 345-67-89",
            "ООО Технологии",
        )
    }
}

/// The contacts served by `/contacts`, in order
pub fn contact_list() -> Vec<Contact> {
    vec![
        Contact::new(
            "Алексей",
            "Петров",
            "alexey.petrov@example.com",
            "+7 912 345-67-89",
            "ООО Технологии",
        ),
        Contact::new(
            "Мария",
            "Иванова",
            "maria.ivanova@example.com",
            "+7 903 111-22-33",
            "ЗАО Инновации",
        ),
        Contact::new(
            "Дмитрий",
            "Сидоров",
            "dmitry.sidorov@example.com",
            "+7 916 444-55-66",
            "ИП Сидоров",
        ),
    ]
}

pub async fn serve_contact(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let delay_ms = ctx.query.delay_ms(state.config.fixtures.contact_delay_ms);
    respond_after(ctx, state, "/contact", delay_ms, &single_contact()).await
}

pub async fn serve_contacts(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let delay_ms = ctx.query.delay_ms(state.config.fixtures.contacts_delay_ms);
    respond_after(ctx, state, "/contacts", delay_ms, &contact_list()).await
}

/// Logged under the route path; the query string is left out
async fn respond_after<T: Serialize>(
    ctx: &RequestContext<'_>,
    state: &AppState,
    route_path: &str,
    delay_ms: u64,
    body: &T,
) -> Response<Full<Bytes>> {
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;

    state.request_log.record(&RequestLogEntry::new(
        ctx.method.as_str(),
        route_path,
        delay_ms,
        StatusCode::OK.as_u16(),
    ));
    http::json_response(StatusCode::OK, body)
}
