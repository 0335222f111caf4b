//! Evolution API client
//!
//! Entry point of the crate: owns the shared [`Connection`] and hands out
//! the instance manager and instance sessions.

use std::sync::Arc;

use tracing::info;

use crate::config::ClientConfig;
use crate::connection::Connection;
use crate::delay::SendDelay;
use crate::error::Result;
use crate::instance::InstanceManager;
use crate::session::InstanceSession;

/// Evolution API client
#[derive(Debug, Clone)]
pub struct EvolutionClient {
    connection: Arc<Connection>,
    delay: SendDelay,
}

impl EvolutionClient {
    /// Create a client for `url` authenticated with the global API key
    pub fn new(url: &str, api_key: &str) -> Result<Self> {
        Self::from_config(&ClientConfig::new(url, api_key))
    }

    /// Create a client from configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let connection = Connection::new(&config.url, &config.api_key, config.timeout())?;

        info!("Evolution API client initialized for: {}", connection.base_url());

        Ok(Self {
            connection: Arc::new(connection),
            delay: config.delay,
        })
    }

    pub fn connection(&self) -> &Arc<Connection> {
        &self.connection
    }

    /// Throttling configured for bulk sends
    pub fn send_delay(&self) -> SendDelay {
        self.delay
    }

    pub fn instances(&self) -> InstanceManager {
        InstanceManager::new(Arc::clone(&self.connection))
    }

    /// Select an open instance by name; `None` when it is missing or closed
    pub async fn select_instance(&self, instance_name: &str) -> Result<Option<InstanceSession>> {
        self.instances().select_instance(instance_name).await
    }

    /// Session for a known instance name, skipping the remote lookup
    pub fn instance(&self, instance_name: &str) -> InstanceSession {
        InstanceSession::new(Arc::clone(&self.connection), instance_name)
    }
}
