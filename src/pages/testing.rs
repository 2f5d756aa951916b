//! In-memory backend that records every call, for page workflow tests.
use std::sync::Mutex;

use crate::model::message::{MessageFull, MessagePage, MessageSummary, OutgoingMessage};
use crate::model::script::FilterScript;
use crate::net::api::Error;
use crate::net::backend::{MailBackend, SieveBackend};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListScripts,
    PutScript { name: String, content: String },
    ActivateScript(String),
    DeleteScript(String),
    ListMessages { limit: u32, offset: u32 },
    GetMessage(String),
    MarkRead(String),
    SendMessage(OutgoingMessage),
}

#[derive(Default)]
pub struct RecordingBackend {
    calls: Mutex<Vec<Call>>,
    scripts: Mutex<Vec<FilterScript>>,
    messages: Vec<MessageFull>,
    fail: Vec<&'static str>,
}

impl RecordingBackend {
    pub fn failing(ops: &[&'static str]) -> Self {
        Self {
            fail: ops.to_vec(),
            ..Default::default()
        }
    }

    pub fn with_scripts(scripts: Vec<FilterScript>) -> Self {
        Self {
            scripts: Mutex::new(scripts),
            ..Default::default()
        }
    }

    pub fn with_messages(messages: Vec<MessageFull>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, op: &'static str, call: Call) -> Result<(), Error> {
        self.calls.lock().unwrap().push(call);
        if self.fail.contains(&op) {
            return Err(Error::Status {
                status: 500,
                message: format!("{op} failed"),
            });
        }
        Ok(())
    }
}

fn not_found(what: &str) -> Error {
    Error::Status {
        status: 404,
        message: format!("{what} not found"),
    }
}

pub fn message(id: &str, read: bool) -> MessageFull {
    MessageFull {
        summary: MessageSummary {
            id: id.to_string(),
            sender: "bob@example.com".into(),
            recipient: "alice@example.com".into(),
            subject: format!("Message {id}"),
            snippet: "Hello".into(),
            read_state: read,
            received_at: "2024-05-01T10:00:00Z".into(),
            spf_result: None,
            dkim_result: None,
            dmarc_result: None,
        },
        message_id: format!("<{id}@example.com>"),
        body: format!("Body of {id}"),
        body_size: 10,
    }
}

impl SieveBackend for RecordingBackend {
    async fn list_scripts(&self) -> Result<Vec<FilterScript>, Error> {
        self.record("list_scripts", Call::ListScripts)?;
        Ok(self.scripts.lock().unwrap().clone())
    }

    async fn put_script(&self, name: &str, content: &str) -> Result<(), Error> {
        self.record(
            "put_script",
            Call::PutScript {
                name: name.to_string(),
                content: content.to_string(),
            },
        )?;
        let mut scripts = self.scripts.lock().unwrap();
        match scripts.iter_mut().find(|s| s.name == name) {
            Some(existing) => existing.content = content.to_string(),
            None => scripts.push(FilterScript {
                name: name.to_string(),
                content: content.to_string(),
                ..Default::default()
            }),
        }
        Ok(())
    }

    async fn activate_script(&self, name: &str) -> Result<(), Error> {
        self.record("activate_script", Call::ActivateScript(name.to_string()))?;
        let mut scripts = self.scripts.lock().unwrap();
        let script = scripts
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| not_found(name))?;
        script.is_active = true;
        Ok(())
    }

    async fn delete_script(&self, name: &str) -> Result<(), Error> {
        self.record("delete_script", Call::DeleteScript(name.to_string()))?;
        let mut scripts = self.scripts.lock().unwrap();
        let before = scripts.len();
        scripts.retain(|s| s.name != name);
        if scripts.len() == before {
            return Err(not_found(name));
        }
        Ok(())
    }
}

impl MailBackend for RecordingBackend {
    async fn list_messages(&self, limit: u32, offset: u32) -> Result<MessagePage, Error> {
        self.record("list_messages", Call::ListMessages { limit, offset })?;
        let messages: Vec<MessageSummary> = self
            .messages
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|m| m.summary.clone())
            .collect();
        Ok(MessagePage {
            has_more: (offset as usize + messages.len()) < self.messages.len(),
            total: self.messages.len() as u64,
            messages,
        })
    }

    async fn get_message(&self, id: &str) -> Result<MessageFull, Error> {
        self.record("get_message", Call::GetMessage(id.to_string()))?;
        self.messages
            .iter()
            .find(|m| m.summary.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn mark_read(&self, id: &str) -> Result<(), Error> {
        self.record("mark_read", Call::MarkRead(id.to_string()))
    }

    async fn send_message(&self, message: &OutgoingMessage) -> Result<(), Error> {
        self.record("send_message", Call::SendMessage(message.clone()))
    }
}
