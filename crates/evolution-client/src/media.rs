//! Media message sending
//!
//! Images, videos, audio and documents are read from disk and embedded as
//! base64. The file is checked before the recipient so that a bad path is
//! reported even when the number is also wrong.

use std::path::Path;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{EvolutionError, Result};
use crate::files::{MediaType, convert_to_base64, ensure_file, file_size_mb, guess_mime};
use crate::identifier::validate_number;
use crate::message::PRESENCE_DELAY_MS;
use crate::response::ApiResponse;
use crate::session::InstanceSession;

/// Default pause after each media send
pub const DEFAULT_MEDIA_PAUSE: Duration = Duration::from_secs(10);

/// `sendMedia` payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaMessage {
    pub number: String,
    #[serde(rename = "mediatype")]
    pub media_type: String,
    #[serde(rename = "mimetype")]
    pub mime_type: String,
    pub caption: String,
    pub media: String,
    pub file_name: String,
    pub delay: u32,
}

impl MediaMessage {
    /// Build a payload from a local file
    pub fn from_file(number: &str, path: &Path, file_name: &str, caption: &str) -> Result<Self> {
        ensure_file(path)?;
        debug!("Encoding {} ({:.2} MB)", path.display(), file_size_mb(path)?);
        let mime = guess_mime(path).ok_or_else(|| EvolutionError::UnknownMimeType(path.to_path_buf()))?;
        let media_type = MediaType::from_mime(&mime);
        let media = convert_to_base64(path)?;

        let number = validate_number(number)
            .ok_or_else(|| EvolutionError::InvalidNumber(number.to_string()))?;

        Ok(Self {
            number,
            media_type: media_type.as_str().to_string(),
            mime_type: mime.essence_str().to_string(),
            caption: caption.to_string(),
            media,
            file_name: file_name.to_string(),
            delay: PRESENCE_DELAY_MS,
        })
    }
}

/// Media sender for one instance
#[derive(Debug, Clone)]
pub struct SendMedia {
    session: InstanceSession,
}

impl SendMedia {
    pub fn new(session: InstanceSession) -> Self {
        Self { session }
    }

    /// Send a file with an optional caption, then wait `pause`.
    ///
    /// Returns the classified envelope; non-2xx answers come back as
    /// [`EvolutionError::Api`].
    pub async fn send_media(
        &self,
        number: &str,
        path: impl AsRef<Path>,
        file_name: &str,
        caption: &str,
        pause: Duration,
    ) -> Result<ApiResponse> {
        let message = MediaMessage::from_file(number, path.as_ref(), file_name, caption)?;
        let url = self.session.url("message/sendMedia");
        let body = serde_json::to_value(&message)?;

        let envelope = self
            .session
            .connection()
            .post_paced_envelope(&url, &body, pause)
            .await?;

        info!(
            "Sent {} ({}) to {}",
            message.media_type, message.mime_type, message.number
        );
        Ok(envelope)
    }
}
