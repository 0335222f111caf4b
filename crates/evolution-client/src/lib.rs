//! evolution-client: Client for the Evolution API WhatsApp gateway
//!
//! Wraps the Evolution API over HTTP: instance and group management,
//! text/media/status/location sending, webhook and Chatwoot configuration.
//! Responses are folded into a uniform [`ApiResponse`] envelope.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use evolution_client::EvolutionClient;
//!
//! let client = EvolutionClient::new("https://evo.example.com", "global-key")?;
//! if let Some(session) = client.select_instance("bot1").await? {
//!     session
//!         .messages()
//!         .send_text("11952735931", "Olá!", Duration::from_secs(5))
//!         .await?;
//! }
//! ```

pub mod chatwoot;
pub mod client;
pub mod config;
pub mod connection;
pub mod delay;
pub mod error;
pub mod files;
pub mod group;
pub mod identifier;
pub mod instance;
pub mod location;
pub mod media;
pub mod message;
pub mod response;
pub mod session;
pub mod status;
pub mod webhook;

pub use chatwoot::{ChatwootIntegration, ChatwootSettings};
pub use client::EvolutionClient;
pub use config::ClientConfig;
pub use connection::Connection;
pub use delay::{SendDelay, calculate_send_delay};
pub use error::{EvolutionError, Result};
pub use group::GroupManager;
pub use identifier::validate_number;
pub use instance::{InstanceInfo, InstanceManager, InstanceSettings};
pub use location::{LocationRequest, SendLocation};
pub use media::SendMedia;
pub use message::SendMessage;
pub use response::{ApiResponse, explain_status_code};
pub use session::InstanceSession;
pub use status::{SendStatus, StatusFont, StatusOptions, StatusType};
pub use webhook::{WebhookConfig, WebhookEvent, WebhookSettings};
