//! Location message sending

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::error::{EvolutionError, Result};
use crate::identifier::validate_number;
use crate::message::PRESENCE_DELAY_MS;
use crate::session::InstanceSession;

/// A pin to share with a recipient
#[derive(Debug, Clone, PartialEq)]
pub struct LocationRequest {
    pub number: String,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Server-side typing delay in milliseconds
    pub delay: u32,
    pub link_preview: bool,
    pub mentions_every_one: bool,
    pub mentioned: Vec<String>,
    /// Message being replied to, as the server's message key object
    pub quoted: Option<Value>,
}

impl LocationRequest {
    pub fn new(
        number: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            number: number.into(),
            name: name.into(),
            address: address.into(),
            latitude,
            longitude,
            delay: PRESENCE_DELAY_MS,
            link_preview: true,
            mentions_every_one: false,
            mentioned: Vec::new(),
            quoted: None,
        }
    }
}

/// `sendLocation` payload; optional fields are left out when empty
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct LocationPayload<'a> {
    number: String,
    name: &'a str,
    address: &'a str,
    latitude: f64,
    longitude: f64,
    delay: u32,
    link_preview: bool,
    #[serde(rename = "mentionsEveryOne", skip_serializing_if = "is_false")]
    mentions_every_one: bool,
    #[serde(skip_serializing_if = "is_empty")]
    mentioned: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    quoted: Option<&'a Value>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_empty(list: &&[String]) -> bool {
    list.is_empty()
}

impl<'a> LocationPayload<'a> {
    fn from_request(request: &'a LocationRequest) -> Result<Self> {
        let number = validate_number(&request.number)
            .ok_or_else(|| EvolutionError::InvalidNumber(request.number.clone()))?;
        Ok(Self {
            number,
            name: &request.name,
            address: &request.address,
            latitude: request.latitude,
            longitude: request.longitude,
            delay: request.delay,
            link_preview: request.link_preview,
            mentions_every_one: request.mentions_every_one,
            mentioned: &request.mentioned,
            quoted: request.quoted.as_ref(),
        })
    }
}

/// Location sender for one instance
#[derive(Debug, Clone)]
pub struct SendLocation {
    session: InstanceSession,
}

impl SendLocation {
    pub fn new(session: InstanceSession) -> Self {
        Self { session }
    }

    pub async fn send_location(&self, request: &LocationRequest) -> Result<Value> {
        let payload = LocationPayload::from_request(request)?;
        let body = serde_json::to_value(&payload)?;
        let url = self.session.url("message/sendLocation");
        let result = self.session.connection().post(&url, &body).await?;

        info!("Location '{}' sent to {}", request.name, payload.number);
        Ok(result)
    }
}
