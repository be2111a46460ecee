//! Implementation for delivering notifications through a Telegram bot.

use super::{Error, Notification, Notifier};
use crate::client;
use crate::error::{BoxError, Error as ErrorCommon, ExternalService};

use async_trait::async_trait;
use serde::Deserialize;

/// The Telegram bot which sends the notifications to a chat.
pub struct Bot {
    /// The bot API token.
    token: String,
    /// The chat where the messages are sent.
    chat_id: String,
    /// The API base URL to use.
    base_url: String,
    /// The HTTP client that the instance use for making the requests.
    http_cli: isahc::HttpClient,
}

impl Bot {
    pub fn new(token: &str, chat_id: &str) -> Self {
        Self::with_base_url(token, chat_id, "https://api.telegram.org")
    }

    /// This constructor is mainly useful for testing purposes.
    fn with_base_url(token: &str, chat_id: &str, base_url: &str) -> Self {
        Self {
            token: String::from(token),
            chat_id: String::from(chat_id),
            base_url: String::from(base_url.trim_end_matches('/')),
            http_cli: client::build(),
        }
    }
}

#[derive(Deserialize)]
struct Reply {
    ok: bool,
    #[serde(default)]
    description: String,
}

#[async_trait]
impl Notifier for Bot {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn deliver(&self, notification: &Notification) -> Result<(), Error> {
        let body = serde_json::json!({
            "chat_id": self.chat_id,
            "text": notification.to_html(),
            "parse_mode": "HTML",
        });

        let request = http::Request::post(format!("{}/bot{}/sendMessage", self.base_url, self.token))
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .map_err(|e| {
                Error::Common(ErrorCommon::internal(
                    "error while building the Telegram request",
                    BoxError::from(e),
                ))
            })?;

        let mut response = self
            .http_cli
            .send_async(request)
            .await
            .map_err(crate::error::from_isahc::<Error>)?;

        let status = response.status();
        let body = client::body_text::<Error>(&mut response).await?;

        // Telegram explains the client errors in the body.
        if status.is_client_error() {
            if let Ok(reply) = serde_json::from_str::<Reply>(&body) {
                return Err(Error::Refused {
                    description: reply.description,
                });
            }
        }

        client::check_status::<Error>("Telegram", status)?;
        let reply: Reply = client::parse_json::<_, Error>("Telegram", &body)?;
        if !reply.ok {
            if reply.description.is_empty() {
                return Err(Error::Notifier(ExternalService::Unspecified));
            }
            return Err(Error::Refused {
                description: reply.description,
            });
        }

        Ok(())
    }
}
