use super::{StatusResponse, StatusSource};
use crate::error::{PollError, RequestDiagnostics};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use std::time::Duration;

pub const PRAKTIKUM_API_URL: &str = "https://praktikum.yandex.ru/api/user_api/homework_statuses/";

/// Keys the API uses to report a failure inside an otherwise normal JSON body.
const IN_BAND_ERROR_KEYS: [&str; 2] = ["error", "code"];

pub struct PraktikumClient {
    token: String,
    api_url: String,
    client: reqwest::Client,
}

impl PraktikumClient {
    pub fn new(token: String, api_url: String, timeout: Option<Duration>) -> Self {
        let mut builder = reqwest::Client::builder().user_agent("homework-bot");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().unwrap_or_else(|_| reqwest::Client::new());

        Self {
            token,
            api_url,
            client,
        }
    }

    fn diagnostics(&self, from_date: i64) -> RequestDiagnostics {
        RequestDiagnostics {
            url: self.api_url.clone(),
            params: vec![("from_date".to_string(), from_date.to_string())],
            headers: vec![(AUTHORIZATION.to_string(), "OAuth ***".to_string())],
        }
    }
}

#[async_trait]
impl StatusSource for PraktikumClient {
    async fn fetch(&self, from_date: i64) -> Result<StatusResponse, PollError> {
        tracing::debug!(from_date, url = %self.api_url, "Requesting homework statuses");

        let transport = |source: reqwest::Error| PollError::Transport {
            source: source.without_url(),
            diagnostics: Box::new(self.diagnostics(from_date)),
        };

        let response = self
            .client
            .get(&self.api_url)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(transport)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport)?;

        interpret_response(status, &body, self.diagnostics(from_date))
    }
}

/// Turn a raw API reply into a [`StatusResponse`], refusing bodies that carry an
/// in-band `error` or `code` field and any non-2xx status.
fn interpret_response(
    status: u16,
    body: &str,
    diagnostics: RequestDiagnostics,
) -> Result<StatusResponse, PollError> {
    let value: Value = serde_json::from_str(body).map_err(|source| PollError::Schema {
        url: diagnostics.url.clone(),
        source,
    })?;

    if let Some(object) = value.as_object() {
        for key in IN_BAND_ERROR_KEYS {
            if let Some(reported) = object.get(key) {
                let value = match reported {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                return Err(PollError::Api {
                    key,
                    value,
                    status,
                    diagnostics: Box::new(diagnostics),
                });
            }
        }
    }

    if !(200..300).contains(&status) {
        return Err(PollError::Http {
            status,
            diagnostics: Box::new(diagnostics),
        });
    }

    serde_json::from_value(value).map_err(|source| PollError::Schema {
        url: diagnostics.url,
        source,
    })
}
