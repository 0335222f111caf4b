//! Instance management
//!
//! Global operations on the server's instances: creation, listing,
//! connection and teardown. Operations scoped to one already selected
//! instance live on [`InstanceSession`](crate::session::InstanceSession).

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{info, warn};

use crate::connection::Connection;
use crate::error::{EvolutionError, Result};
use crate::identifier::validate_number;
use crate::session::InstanceSession;

/// Integration engine requested for new instances
pub const DEFAULT_INTEGRATION: &str = "WHATSAPP-BAILEYS";

/// Connection status of an instance ready to send
pub const STATUS_OPEN: &str = "open";

/// Behavior flags applied when creating or updating an instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceSettings {
    pub reject_call: bool,
    pub msg_call: String,
    pub groups_ignore: bool,
    pub always_online: bool,
    pub read_messages: bool,
    pub read_status: bool,
    pub sync_full_history: bool,
}

impl Default for InstanceSettings {
    fn default() -> Self {
        Self {
            reject_call: true,
            msg_call: "Este número não aceita chamadas.".to_string(),
            groups_ignore: true,
            always_online: true,
            read_messages: true,
            read_status: true,
            sync_full_history: true,
        }
    }
}

impl InstanceSettings {
    pub(crate) fn to_json(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// Instance as listed by `fetchInstances`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceInfo {
    pub name: String,
    #[serde(default)]
    pub connection_status: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InstanceInfo {
    pub fn is_open(&self) -> bool {
        self.connection_status.as_deref() == Some(STATUS_OPEN)
    }
}

/// Manager for global instance operations
#[derive(Debug, Clone)]
pub struct InstanceManager {
    connection: Arc<Connection>,
}

impl InstanceManager {
    pub fn new(connection: Arc<Connection>) -> Self {
        Self { connection }
    }

    /// Create a new instance paired through a QR code
    pub async fn create_instance(
        &self,
        instance_name: &str,
        token: &str,
        number: &str,
        settings: &InstanceSettings,
    ) -> Result<Value> {
        let number = validate_number(number)
            .ok_or_else(|| EvolutionError::InvalidNumber(number.to_string()))?;

        let mut payload = Map::new();
        payload.insert("instanceName".to_string(), json!(instance_name));
        payload.insert("token".to_string(), json!(token));
        payload.insert("qrcode".to_string(), json!(true));
        payload.insert("number".to_string(), json!(number));
        payload.insert("integration".to_string(), json!(DEFAULT_INTEGRATION));
        payload.extend(settings.to_json());

        let url = self.connection.url("instance/create");
        let result = self.connection.post(&url, &Value::Object(payload)).await?;

        info!("Created instance {}", instance_name);
        Ok(result)
    }

    /// Raw instance list as returned by the server
    pub async fn fetch_instances(&self) -> Result<Value> {
        let url = self.connection.url("instance/fetchInstances");
        self.connection.get(&url).await
    }

    /// Instance list decoded into [`InstanceInfo`]; unreadable entries are skipped
    pub async fn list_instances(&self) -> Result<Vec<InstanceInfo>> {
        let raw = self.fetch_instances().await?;
        Ok(parse_instances(&raw))
    }

    /// Start a connection, returning the pairing code / QR payload
    pub async fn connect_instance(&self, instance_name: &str) -> Result<Value> {
        let url = self.connection.instance_url("instance/connect", instance_name);
        self.connection.get(&url).await
    }

    pub async fn logout_instance(&self, instance_name: &str) -> Result<Value> {
        let url = self.connection.instance_url("instance/logout", instance_name);
        let result = self.connection.get(&url).await?;
        info!("Logged out instance {}", instance_name);
        Ok(result)
    }

    pub async fn delete_instance(&self, instance_name: &str) -> Result<Value> {
        let url = self.connection.instance_url("instance/delete", instance_name);
        let result = self.connection.delete(&url).await?;
        info!("Deleted instance {}", instance_name);
        Ok(result)
    }

    pub async fn connection_state(&self, instance_name: &str) -> Result<Value> {
        let url = self
            .connection
            .instance_url("instance/connectionState", instance_name);
        self.connection.get(&url).await
    }

    pub async fn find_settings(&self, instance_name: &str) -> Result<Value> {
        let url = self.connection.instance_url("settings/find", instance_name);
        self.connection.get(&url).await
    }

    /// Select the first listed instance with this name whose connection is open.
    ///
    /// An unknown or disconnected instance is not an error: a warning is
    /// logged and `None` returned.
    pub async fn select_instance(&self, instance_name: &str) -> Result<Option<InstanceSession>> {
        let instances = self.list_instances().await?;
        let selected = select_open(&instances, instance_name);

        match selected {
            Some(info) => {
                info!("Selected instance {}", info.name);
                Ok(Some(InstanceSession::from_info(
                    Arc::clone(&self.connection),
                    info.clone(),
                )))
            }
            None => {
                warn!(
                    "Instância '{}' não encontrada ou desconectada.",
                    instance_name
                );
                Ok(None)
            }
        }
    }
}

/// First-match scan: list order decides between entries sharing a name.
pub fn select_open<'a>(instances: &'a [InstanceInfo], name: &str) -> Option<&'a InstanceInfo> {
    instances
        .iter()
        .find(|instance| instance.name == name && instance.is_open())
}

fn parse_instances(raw: &Value) -> Vec<InstanceInfo> {
    raw.as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}
