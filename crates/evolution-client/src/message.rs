//! Text message sending
//!
//! Sending to groups carries a high ban rate on the remote side. In loops,
//! pace sends with [`SendDelay`](crate::delay::SendDelay).

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::error::{EvolutionError, Result};
use crate::identifier::{is_group, validate_number};
use crate::session::InstanceSession;

/// Server-side typing delay in milliseconds applied to every send
pub const PRESENCE_DELAY_MS: u32 = 1000;

/// Default pause after each text send
pub const DEFAULT_TEXT_PAUSE: Duration = Duration::from_secs(5);

/// `sendText` payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextMessage {
    pub number: String,
    pub text: String,
    pub delay: u32,
    pub link_preview: bool,
}

impl TextMessage {
    /// Build a payload for a validated recipient
    pub fn new(number: &str, text: &str, link_preview: bool) -> Result<Self> {
        let number = validate_number(number)
            .ok_or_else(|| EvolutionError::InvalidNumber(number.to_string()))?;
        Ok(Self {
            number,
            text: text.to_string(),
            delay: PRESENCE_DELAY_MS,
            link_preview,
        })
    }
}

/// Text sender for one instance
#[derive(Debug, Clone)]
pub struct SendMessage {
    session: InstanceSession,
}

impl SendMessage {
    pub fn new(session: InstanceSession) -> Self {
        Self { session }
    }

    /// Send a plain text message, then wait `pause`.
    ///
    /// On success the server echoes the message record (`key.remoteJid`,
    /// `key.id`, `status`, `messageTimestamp`, ...).
    pub async fn send_text(&self, number: &str, text: &str, pause: Duration) -> Result<Value> {
        let message = TextMessage::new(number, text, false)?;
        self.send(&message, pause).await
    }

    /// Send a text message that renders a preview of its first link
    pub async fn send_text_with_link(
        &self,
        number: &str,
        text: &str,
        link_preview: bool,
        pause: Duration,
    ) -> Result<Value> {
        let message = TextMessage::new(number, text, link_preview)?;
        self.send(&message, pause).await
    }

    /// Send a prepared payload
    pub async fn send(&self, message: &TextMessage, pause: Duration) -> Result<Value> {
        let url = self.session.url("message/sendText");
        let body = serde_json::to_value(message)?;
        let result = self
            .session
            .connection()
            .post_paced(&url, &body, pause)
            .await?;

        if is_group(&message.number) {
            info!("Text message sent to group {}", message.number);
        } else {
            info!("Text message sent to {}", message.number);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_payload() {
        let message = TextMessage::new("11952735931", "Olá", false).unwrap();
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "number": "5511952735931",
                "text": "Olá",
                "delay": 1000,
                "link_preview": false
            })
        );
    }

    #[test]
    fn test_text_payload_group() {
        let message = TextMessage::new("12345@g.us", "Olá", true).unwrap();
        assert_eq!(message.number, "12345@g.us");
        assert!(message.link_preview);
    }

    #[test]
    fn test_text_payload_invalid_number() {
        let result = TextMessage::new("123", "Olá", false);
        assert!(matches!(result, Err(EvolutionError::InvalidNumber(n)) if n == "123"));
    }
}
