use serde::{Deserialize, Serialize};

use crate::model::{is_email, ValidationError};

/// A row in the inbox list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSummary {
    pub id: String,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub recipient: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub read_state: bool,
    #[serde(default)]
    pub received_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spf_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dkim_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dmarc_result: Option<String>,
}

/// A message with its body, as returned by the detail endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageFull {
    #[serde(flatten)]
    pub summary: MessageSummary,
    #[serde(default)]
    pub message_id: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub body_size: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessagePage {
    #[serde(default)]
    pub messages: Vec<MessageSummary>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadStateUpdate {
    pub read_state: bool,
}

/// A message being composed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutgoingMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl OutgoingMessage {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_email(self.to.trim()) {
            return Err(ValidationError::InvalidEmail);
        }
        if self.subject.trim().is_empty() {
            return Err(ValidationError::Required("Subject"));
        }
        if self.body.trim().is_empty() {
            return Err(ValidationError::Required("Message body"));
        }
        Ok(())
    }
}
