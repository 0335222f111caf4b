//! Webhook configuration
//!
//! The server pushes instance events to a caller-supplied URL. Events are
//! chosen by numeric code; `APPLICATION_STARTUP` is always subscribed.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use crate::error::{EvolutionError, Result};
use crate::session::InstanceSession;

/// Events the server can push
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum WebhookEvent {
    ApplicationStartup = 1,
    QrcodeUpdated = 2,
    MessagesSet = 3,
    MessagesUpsert = 4,
    MessagesUpdate = 5,
    MessagesDelete = 6,
    SendMessage = 7,
    ContactsSet = 8,
    ContactsUpsert = 9,
    ContactsUpdate = 10,
    PresenceUpdate = 11,
    ChatsSet = 12,
    ChatsUpsert = 13,
    ChatsUpdate = 14,
    ChatsDelete = 15,
    GroupsUpsert = 16,
    GroupUpdate = 17,
    GroupParticipantsUpdate = 18,
    ConnectionUpdate = 19,
    Call = 20,
    NewJwtToken = 21,
    TypebotStart = 22,
    TypebotChangeStatus = 23,
}

impl WebhookEvent {
    pub const ALL: [WebhookEvent; 23] = [
        Self::ApplicationStartup,
        Self::QrcodeUpdated,
        Self::MessagesSet,
        Self::MessagesUpsert,
        Self::MessagesUpdate,
        Self::MessagesDelete,
        Self::SendMessage,
        Self::ContactsSet,
        Self::ContactsUpsert,
        Self::ContactsUpdate,
        Self::PresenceUpdate,
        Self::ChatsSet,
        Self::ChatsUpsert,
        Self::ChatsUpdate,
        Self::ChatsDelete,
        Self::GroupsUpsert,
        Self::GroupUpdate,
        Self::GroupParticipantsUpdate,
        Self::ConnectionUpdate,
        Self::Call,
        Self::NewJwtToken,
        Self::TypebotStart,
        Self::TypebotChangeStatus,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Look up an event by its numeric code
    pub fn from_code(code: u32) -> Option<Self> {
        let index = usize::try_from(code).ok()?.checked_sub(1)?;
        Self::ALL.get(index).copied()
    }

    /// Name the server expects in the `events` list
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ApplicationStartup => "APPLICATION_STARTUP",
            Self::QrcodeUpdated => "QRCODE_UPDATED",
            Self::MessagesSet => "MESSAGES_SET",
            Self::MessagesUpsert => "MESSAGES_UPSERT",
            Self::MessagesUpdate => "MESSAGES_UPDATE",
            Self::MessagesDelete => "MESSAGES_DELETE",
            Self::SendMessage => "SEND_MESSAGE",
            Self::ContactsSet => "CONTACTS_SET",
            Self::ContactsUpsert => "CONTACTS_UPSERT",
            Self::ContactsUpdate => "CONTACTS_UPDATE",
            Self::PresenceUpdate => "PRESENCE_UPDATE",
            Self::ChatsSet => "CHATS_SET",
            Self::ChatsUpsert => "CHATS_UPSERT",
            Self::ChatsUpdate => "CHATS_UPDATE",
            Self::ChatsDelete => "CHATS_DELETE",
            Self::GroupsUpsert => "GROUPS_UPSERT",
            Self::GroupUpdate => "GROUP_UPDATE",
            Self::GroupParticipantsUpdate => "GROUP_PARTICIPANTS_UPDATE",
            Self::ConnectionUpdate => "CONNECTION_UPDATE",
            Self::Call => "CALL",
            Self::NewJwtToken => "NEW_JWT_TOKEN",
            Self::TypebotStart => "TYPEBOT_START",
            Self::TypebotChangeStatus => "TYPEBOT_CHANGE_STATUS",
        }
    }
}

impl TryFrom<u32> for WebhookEvent {
    type Error = EvolutionError;

    fn try_from(code: u32) -> Result<Self> {
        Self::from_code(code).ok_or(EvolutionError::InvalidEventCode(code))
    }
}

impl fmt::Display for WebhookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Webhook settings as sent to `/webhook/set`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSettings {
    pub enabled: bool,
    pub url: String,
    pub webhook_by_events: bool,
    pub webhook_base64: bool,
    pub events: Vec<WebhookEvent>,
}

impl WebhookSettings {
    /// Settings for the given event codes.
    ///
    /// Fails on the first unknown code; duplicates collapse and events are
    /// ordered by code.
    pub fn from_codes(url: &str, event_codes: &[u32]) -> Result<Self> {
        let mut selected = BTreeSet::from([WebhookEvent::ApplicationStartup]);
        for &code in event_codes {
            selected.insert(WebhookEvent::try_from(code)?);
        }

        Ok(Self {
            enabled: true,
            url: url.to_string(),
            webhook_by_events: true,
            webhook_base64: true,
            events: selected.into_iter().collect(),
        })
    }

    /// Request body wrapping the settings under `webhook`
    pub fn payload(&self) -> Value {
        json!({ "webhook": self })
    }
}

/// Webhook configuration for one instance
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    session: InstanceSession,
}

impl WebhookConfig {
    pub fn new(session: InstanceSession) -> Self {
        Self { session }
    }

    /// Point the instance's webhook at `webhook_url` for the given event codes
    pub async fn set_webhook(&self, webhook_url: &str, event_codes: &[u32]) -> Result<Value> {
        let settings = WebhookSettings::from_codes(webhook_url, event_codes)?;
        let url = self.session.url("webhook/set");
        let result = self
            .session
            .connection()
            .post(&url, &settings.payload())
            .await?;

        info!(
            "Webhook for {} set to {} ({} events)",
            self.session.name(),
            webhook_url,
            settings.events.len()
        );
        Ok(result)
    }

    pub async fn find_webhook(&self) -> Result<Value> {
        let url = self.session.url("webhook/find");
        self.session.connection().get(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_codes_round_trip_catalog() {
        for (index, event) in WebhookEvent::ALL.iter().enumerate() {
            assert_eq!(usize::from(event.code()), index + 1);
            assert_eq!(WebhookEvent::from_code(u32::from(event.code())), Some(*event));
            assert_eq!(
                serde_json::to_value(event).unwrap(),
                Value::String(event.as_str().to_string())
            );
        }
    }

    #[test]
    fn test_unknown_codes() {
        assert_eq!(WebhookEvent::from_code(0), None);
        assert_eq!(WebhookEvent::from_code(24), None);
        assert!(matches!(
            WebhookEvent::try_from(24),
            Err(EvolutionError::InvalidEventCode(24))
        ));
    }

    #[test]
    fn test_startup_always_included() {
        let settings = WebhookSettings::from_codes("https://hook.example.com", &[]).unwrap();
        assert_eq!(settings.events, vec![WebhookEvent::ApplicationStartup]);
    }

    #[test]
    fn test_duplicates_collapse_in_code_order() {
        let settings = WebhookSettings::from_codes("https://hook.example.com", &[4, 1, 4]).unwrap();
        let names: Vec<_> = settings.events.iter().map(|e| e.as_str()).collect();
        assert_eq!(names, vec!["APPLICATION_STARTUP", "MESSAGES_UPSERT"]);
    }

    #[test]
    fn test_invalid_code_fails_fast() {
        let result = WebhookSettings::from_codes("https://hook.example.com", &[2, 99, 3]);
        assert!(matches!(result, Err(EvolutionError::InvalidEventCode(99))));
    }

    #[test]
    fn test_payload_shape() {
        let settings =
            WebhookSettings::from_codes("https://hook.example.com/evo", &[19, 4]).unwrap();
        assert_eq!(
            settings.payload(),
            json!({
                "webhook": {
                    "enabled": true,
                    "url": "https://hook.example.com/evo",
                    "webhookByEvents": true,
                    "webhookBase64": true,
                    "events": ["APPLICATION_STARTUP", "MESSAGES_UPSERT", "CONNECTION_UPDATE"]
                }
            })
        );
    }
}
