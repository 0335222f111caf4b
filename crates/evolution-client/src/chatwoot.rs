//! Chatwoot CRM integration

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::error::Result;
use crate::session::InstanceSession;

/// Options for connecting an instance to a Chatwoot account
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatwootSettings {
    pub account_id: u64,
    pub token: String,
    pub url: String,
    pub sign_msg: bool,
    pub reopen_conversation: bool,
    pub conversation_pending: bool,
    pub merge_brazil_contacts: bool,
    pub import_contacts: bool,
    pub import_messages: bool,
    pub days_limit_import_messages: u32,
    pub auto_create: bool,
    pub organization: String,
    pub logo: String,
}

impl ChatwootSettings {
    pub fn new(account_id: u64, token: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            account_id,
            token: token.into(),
            url: url.into(),
            sign_msg: true,
            reopen_conversation: true,
            conversation_pending: false,
            merge_brazil_contacts: false,
            import_contacts: true,
            import_messages: true,
            days_limit_import_messages: 1,
            auto_create: true,
            organization: String::new(),
            logo: String::new(),
        }
    }
}

/// `chatwoot/set` payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatwootPayload<'a> {
    enabled: bool,
    account_id: String,
    token: &'a str,
    url: &'a str,
    sign_msg: bool,
    reopen_conversation: bool,
    conversation_pending: bool,
    name_inbox: &'a str,
    merge_brazil_contacts: bool,
    import_contacts: bool,
    import_messages: bool,
    days_limit_import_messages: u32,
    sign_delimiter: &'a str,
    auto_create: bool,
    organization: &'a str,
    logo: &'a str,
}

impl<'a> ChatwootPayload<'a> {
    fn new(settings: &'a ChatwootSettings, inbox: &'a str) -> Self {
        Self {
            enabled: true,
            account_id: settings.account_id.to_string(),
            token: &settings.token,
            url: settings.url.trim_end_matches('/'),
            sign_msg: settings.sign_msg,
            reopen_conversation: settings.reopen_conversation,
            conversation_pending: settings.conversation_pending,
            name_inbox: inbox,
            merge_brazil_contacts: settings.merge_brazil_contacts,
            import_contacts: settings.import_contacts,
            import_messages: settings.import_messages,
            days_limit_import_messages: settings.days_limit_import_messages,
            sign_delimiter: "\n",
            auto_create: settings.auto_create,
            organization: &settings.organization,
            logo: &settings.logo,
        }
    }
}

/// Chatwoot integration for one instance
#[derive(Debug, Clone)]
pub struct ChatwootIntegration {
    session: InstanceSession,
}

impl ChatwootIntegration {
    pub fn new(session: InstanceSession) -> Self {
        Self { session }
    }

    /// Connect the instance to Chatwoot; the inbox is named after the instance
    pub async fn set_chatwoot(&self, settings: &ChatwootSettings) -> Result<Value> {
        let payload = ChatwootPayload::new(settings, self.session.name());
        let body = serde_json::to_value(&payload)?;
        let url = self.session.url("chatwoot/set");
        let result = self.session.connection().post(&url, &body).await?;

        info!(
            "Chatwoot account {} linked to {}",
            settings.account_id,
            self.session.name()
        );
        Ok(result)
    }

    pub async fn find_chatwoot(&self) -> Result<Value> {
        let url = self.session.url("chatwoot/find");
        self.session.connection().get(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chatwoot_payload() {
        let settings = ChatwootSettings::new(7, "cw-token", "https://chat.example.com/");
        let payload = ChatwootPayload::new(&settings, "bot1");
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "enabled": true,
                "accountId": "7",
                "token": "cw-token",
                "url": "https://chat.example.com",
                "signMsg": true,
                "reopenConversation": true,
                "conversationPending": false,
                "nameInbox": "bot1",
                "mergeBrazilContacts": false,
                "importContacts": true,
                "importMessages": true,
                "daysLimitImportMessages": 1,
                "signDelimiter": "\n",
                "autoCreate": true,
                "organization": "",
                "logo": ""
            })
        );
    }
}
