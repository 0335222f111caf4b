//! Group management

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::error::Result;
use crate::session::InstanceSession;

/// Group creation payload
#[derive(Debug, Clone, Serialize)]
struct CreateGroupPayload<'a> {
    subject: &'a str,
    description: &'a str,
    participants: &'a [String],
}

/// Group operations for one instance
#[derive(Debug, Clone)]
pub struct GroupManager {
    session: InstanceSession,
}

impl GroupManager {
    pub fn new(session: InstanceSession) -> Self {
        Self { session }
    }

    /// Create a group.
    ///
    /// Participants are passed as JIDs or phone numbers, exactly as the
    /// server should receive them.
    pub async fn create_group(
        &self,
        subject: &str,
        participants: &[String],
        description: &str,
    ) -> Result<Value> {
        let payload = CreateGroupPayload {
            subject,
            description,
            participants,
        };
        let body = serde_json::to_value(&payload)?;

        let url = self.session.url("group/create");
        let result = self.session.connection().post(&url, &body).await?;

        info!(
            "Created group '{}' with {} participants",
            subject,
            participants.len()
        );
        Ok(result)
    }

    /// List every group the instance takes part in
    pub async fn fetch_all_groups(&self, get_participants: bool) -> Result<Value> {
        let url = self.session.url("group/fetchAllGroups");
        let flag = if get_participants { "true" } else { "false" };
        self.session
            .connection()
            .get_with_query(&url, &[("getParticipants", flag)])
            .await
    }
}
