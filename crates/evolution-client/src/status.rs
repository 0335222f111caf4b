//! Status (stories) publishing

use std::path::Path;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::error::Result;
use crate::files::convert_to_base64;
use crate::session::InstanceSession;

/// Default pause after each status post
pub const DEFAULT_STATUS_PAUSE: Duration = Duration::from_secs(2);

/// Default background for text statuses
pub const DEFAULT_BACKGROUND_COLOR: &str = "#D3D3D3";

/// Recipient list sent when none is given
pub const DEFAULT_STATUS_JID: &str = "551125611600@c.us";

/// Kind of status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusType {
    Text,
    Image,
    Video,
    Audio,
}

/// Fonts available for text statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum StatusFont {
    Serif = 1,
    NoricanRegular = 2,
    BryndanWrite = 3,
    BebasneueRegular = 4,
    #[default]
    OswaldHeavy = 5,
}

impl StatusFont {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Presentation and audience options shared by every status kind
#[derive(Debug, Clone, PartialEq)]
pub struct StatusOptions {
    pub caption: String,
    pub background_color: String,
    pub font: StatusFont,
    pub all_contacts: bool,
    pub status_jid_list: Vec<String>,
    pub pause: Duration,
}

impl Default for StatusOptions {
    fn default() -> Self {
        Self {
            caption: String::new(),
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            font: StatusFont::default(),
            all_contacts: true,
            status_jid_list: vec![DEFAULT_STATUS_JID.to_string()],
            pause: DEFAULT_STATUS_PAUSE,
        }
    }
}

/// `sendStatus` payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusMessage {
    #[serde(rename = "type")]
    pub status_type: StatusType,
    pub content: String,
    pub caption: String,
    pub all_contacts: bool,
    pub status_jid_list: Vec<String>,
    pub background_color: String,
    pub font: u8,
}

impl StatusMessage {
    pub fn new(status_type: StatusType, content: String, options: &StatusOptions) -> Self {
        Self {
            status_type,
            content,
            caption: options.caption.clone(),
            all_contacts: options.all_contacts,
            status_jid_list: options.status_jid_list.clone(),
            background_color: options.background_color.clone(),
            font: options.font.code(),
        }
    }
}

/// Status publisher for one instance
#[derive(Debug, Clone)]
pub struct SendStatus {
    session: InstanceSession,
}

impl SendStatus {
    pub fn new(session: InstanceSession) -> Self {
        Self { session }
    }

    pub async fn send_status_text(&self, content: &str, options: &StatusOptions) -> Result<Value> {
        let message = StatusMessage::new(StatusType::Text, content.to_string(), options);
        self.send(&message, options.pause).await
    }

    pub async fn send_status_image(
        &self,
        path: impl AsRef<Path>,
        options: &StatusOptions,
    ) -> Result<Value> {
        self.send_file(StatusType::Image, path.as_ref(), options).await
    }

    pub async fn send_status_video(
        &self,
        path: impl AsRef<Path>,
        options: &StatusOptions,
    ) -> Result<Value> {
        self.send_file(StatusType::Video, path.as_ref(), options).await
    }

    pub async fn send_status_audio(
        &self,
        path: impl AsRef<Path>,
        options: &StatusOptions,
    ) -> Result<Value> {
        self.send_file(StatusType::Audio, path.as_ref(), options).await
    }

    async fn send_file(
        &self,
        status_type: StatusType,
        path: &Path,
        options: &StatusOptions,
    ) -> Result<Value> {
        let content = convert_to_base64(path)?;
        let message = StatusMessage::new(status_type, content, options);
        self.send(&message, options.pause).await
    }

    /// Publish a prepared status, then wait `pause`
    pub async fn send(&self, message: &StatusMessage, pause: Duration) -> Result<Value> {
        let url = self.session.url("message/sendStatus");
        let body = serde_json::to_value(message)?;
        let result = self
            .session
            .connection()
            .post_paced(&url, &body, pause)
            .await?;

        info!("Published {:?} status", message.status_type);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_status_payload_defaults() {
        let message =
            StatusMessage::new(StatusType::Text, "Bom dia!".to_string(), &StatusOptions::default());
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "type": "text",
                "content": "Bom dia!",
                "caption": "",
                "allContacts": true,
                "statusJidList": ["551125611600@c.us"],
                "backgroundColor": "#D3D3D3",
                "font": 5
            })
        );
    }

    #[test]
    fn test_custom_options() {
        let options = StatusOptions {
            caption: "Promo".to_string(),
            background_color: "#FF0000".to_string(),
            font: StatusFont::Serif,
            all_contacts: false,
            status_jid_list: vec!["5511952735931@s.whatsapp.net".to_string()],
            ..StatusOptions::default()
        };
        let message = StatusMessage::new(StatusType::Image, "aGVsbG8=".to_string(), &options);
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["type"], "image");
        assert_eq!(json["font"], 1);
        assert_eq!(json["allContacts"], false);
        assert_eq!(json["caption"], "Promo");
    }

    #[test]
    fn test_font_codes() {
        assert_eq!(StatusFont::Serif.code(), 1);
        assert_eq!(StatusFont::NoricanRegular.code(), 2);
        assert_eq!(StatusFont::BryndanWrite.code(), 3);
        assert_eq!(StatusFont::BebasneueRegular.code(), 4);
        assert_eq!(StatusFont::default().code(), 5);
    }
}
