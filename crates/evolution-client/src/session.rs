//! The selected instance
//!
//! An [`InstanceSession`] is built once, either from a remote lookup
//! ([`InstanceManager::select_instance`](crate::instance::InstanceManager::select_instance))
//! or directly from a known name, and is never mutated afterwards. All
//! instance-scoped managers are handed out from it.

use std::sync::Arc;

use serde_json::Value;

use crate::chatwoot::ChatwootIntegration;
use crate::connection::Connection;
use crate::error::Result;
use crate::group::GroupManager;
use crate::instance::{InstanceInfo, InstanceSettings};
use crate::location::SendLocation;
use crate::media::SendMedia;
use crate::message::SendMessage;
use crate::status::SendStatus;
use crate::webhook::WebhookConfig;

/// Read-only handle to one remote instance
#[derive(Debug, Clone)]
pub struct InstanceSession {
    connection: Arc<Connection>,
    name: String,
    token: Option<String>,
    info: Option<InstanceInfo>,
}

impl InstanceSession {
    /// Session for a known instance name, without checking the server
    pub fn new(connection: Arc<Connection>, name: impl Into<String>) -> Self {
        Self {
            connection,
            name: name.into(),
            token: None,
            info: None,
        }
    }

    pub(crate) fn from_info(connection: Arc<Connection>, info: InstanceInfo) -> Self {
        Self {
            connection,
            name: info.name.clone(),
            token: info.token.clone(),
            info: Some(info),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Instance token, known only for sessions selected from the server
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Record returned by the server at selection time
    pub fn info(&self) -> Option<&InstanceInfo> {
        self.info.as_ref()
    }

    pub fn connection(&self) -> &Arc<Connection> {
        &self.connection
    }

    pub fn messages(&self) -> SendMessage {
        SendMessage::new(self.clone())
    }

    pub fn media(&self) -> SendMedia {
        SendMedia::new(self.clone())
    }

    pub fn status(&self) -> SendStatus {
        SendStatus::new(self.clone())
    }

    pub fn location(&self) -> SendLocation {
        SendLocation::new(self.clone())
    }

    pub fn groups(&self) -> GroupManager {
        GroupManager::new(self.clone())
    }

    pub fn webhook(&self) -> WebhookConfig {
        WebhookConfig::new(self.clone())
    }

    pub fn chatwoot(&self) -> ChatwootIntegration {
        ChatwootIntegration::new(self.clone())
    }

    /// URL of an instance-scoped endpoint for this instance
    pub(crate) fn url(&self, endpoint: &str) -> String {
        self.connection.instance_url(endpoint, &self.name)
    }

    pub async fn connection_state(&self) -> Result<Value> {
        self.connection.get(&self.url("instance/connectionState")).await
    }

    /// Replace the behavior flags of this instance
    pub async fn set_settings(&self, settings: &InstanceSettings) -> Result<Value> {
        let payload = Value::Object(settings.to_json());
        self.connection.put(&self.url("settings/set"), &payload).await
    }

    pub async fn find_settings(&self) -> Result<Value> {
        self.connection.get(&self.url("settings/find")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn connection() -> Arc<Connection> {
        Arc::new(Connection::new("http://localhost:8080", "key", None).unwrap())
    }

    #[test]
    fn test_session_from_name() {
        let session = InstanceSession::new(connection(), "bot1");
        assert_eq!(session.name(), "bot1");
        assert!(session.token().is_none());
        assert_eq!(
            session.url("message/sendText"),
            "http://localhost:8080/message/sendText/bot1"
        );
    }

    #[test]
    fn test_session_from_info() {
        let info: InstanceInfo = serde_json::from_value(json!({
            "name": "bot1",
            "connectionStatus": "open",
            "token": "secret"
        }))
        .unwrap();
        let session = InstanceSession::from_info(connection(), info);
        assert_eq!(session.token(), Some("secret"));
        assert!(session.info().unwrap().is_open());
    }
}
