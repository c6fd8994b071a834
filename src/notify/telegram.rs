use super::Notifier;
use crate::error::{PollError, RequestDiagnostics};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Longest slice of a non-JSON reply body kept in an error.
const MAX_BODY_IN_ERROR: usize = 200;

pub struct TelegramNotifier {
    token: String,
    chat_id: String,
    api_base: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct TelegramReply {
    ok: bool,
    description: Option<String>,
}

impl TelegramNotifier {
    pub fn new(token: String, chat_id: String, api_base: String, timeout: Option<Duration>) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().unwrap_or_else(|_| reqwest::Client::new());

        Self {
            token,
            chat_id,
            api_base,
            client,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_base.trim_end_matches('/'),
            self.token
        )
    }

    fn diagnostics(&self) -> RequestDiagnostics {
        RequestDiagnostics {
            url: format!("{}/bot***/sendMessage", self.api_base.trim_end_matches('/')),
            params: vec![("chat_id".to_string(), self.chat_id.clone())],
            headers: Vec::new(),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), PollError> {
        tracing::info!(chat_id = %self.chat_id, message = text, "Sending Telegram message");

        let transport = |source: reqwest::Error| PollError::Transport {
            source: source.without_url(),
            diagnostics: Box::new(self.diagnostics()),
        };

        let response = self
            .client
            .post(self.endpoint())
            .json(&SendMessageRequest {
                chat_id: &self.chat_id,
                text,
            })
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        check_reply(status.is_success(), status.as_u16(), &body)?;
        tracing::info!("Message sent");
        Ok(())
    }
}

fn check_reply(success: bool, status: u16, body: &str) -> Result<(), PollError> {
    match serde_json::from_str::<TelegramReply>(body) {
        Ok(reply) if reply.ok && success => Ok(()),
        Ok(reply) => Err(PollError::Send {
            description: reply
                .description
                .unwrap_or_else(|| format!("HTTP {}", status)),
        }),
        Err(_) => Err(PollError::Send {
            description: format!("HTTP {}: {}", status, body_excerpt(body)),
        }),
    }
}

fn body_excerpt(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(MAX_BODY_IN_ERROR) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_includes_token() {
        let notifier = TelegramNotifier::new(
            "123:abc".to_string(),
            "42".to_string(),
            format!("{}/", TELEGRAM_API_BASE),
            None,
        );
        assert_eq!(
            notifier.endpoint(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
        assert!(!notifier.diagnostics().to_string().contains("123:abc"));
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(SendMessageRequest {
            chat_id: "42",
            text: "привет",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"chat_id": "42", "text": "привет"}));
    }

    #[test]
    fn test_check_reply_ok() {
        assert!(check_reply(true, 200, r#"{"ok":true,"result":{"message_id":1}}"#).is_ok());
    }

    #[test]
    fn test_check_reply_refused() {
        let err = check_reply(
            false,
            400,
            r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "telegram rejected message: Bad Request: chat not found"
        );
    }

    #[test]
    fn test_check_reply_garbage() {
        let err = check_reply(false, 502, "Bad Gateway\n").unwrap_err();
        assert_eq!(err.to_string(), "telegram rejected message: HTTP 502: Bad Gateway");
    }

    #[test]
    fn test_check_reply_long_html_is_cut() {
        let page = format!("<html>{}</html>", "ошибка ".repeat(500));
        let err = check_reply(false, 500, &page).unwrap_err();
        let PollError::Send { description } = err else {
            panic!("expected a send error");
        };
        assert!(description.starts_with("HTTP 500: <html>"));
        assert!(description.ends_with("..."));
        assert!(description.chars().count() < MAX_BODY_IN_ERROR + 20);
    }

    #[tokio::test]
    async fn test_unreachable_server_error_hides_token() {
        let notifier = TelegramNotifier::new(
            "123456:SECRET-BOT-TOKEN".to_string(),
            "42".to_string(),
            "http://127.0.0.1:9".to_string(),
            None,
        );

        let err = notifier.send("hi").await.unwrap_err();

        assert_eq!(err.kind(), "transport");
        let rendered = err.to_string();
        assert!(rendered.contains("bot***/sendMessage"));
        assert!(!rendered.contains("SECRET-BOT-TOKEN"));
        assert!(!format!("{:?}", err).contains("SECRET-BOT-TOKEN"));
    }
}
