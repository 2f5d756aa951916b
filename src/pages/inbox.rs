/// Inbox list and message detail.
///
/// List and detail loads are independent requests. A detail response is
/// only applied while its message is still the selected one; anything
/// else is a late answer for an earlier click and is dropped.
use crate::model::message::{MessageFull, MessagePage, MessageSummary};
use crate::net::api;
use crate::net::backend::MailBackend;

pub const PAGE_SIZE: u32 = 50;

pub async fn load_list<B: MailBackend>(backend: &B) -> Result<MessagePage, api::Error> {
    backend.list_messages(PAGE_SIZE, 0).await
}

/// Fetch one message, tagging the result with the id it was requested for.
pub async fn load_detail<B: MailBackend>(
    backend: &B,
    id: String,
) -> (String, Result<MessageFull, api::Error>) {
    let result = backend.get_message(&id).await;
    (id, result)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailOutcome {
    /// Shown; `mark_read` asks the caller to flag it read on the server.
    Shown { mark_read: bool },
    Failed(String),
    /// Selection moved on before the response arrived.
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct InboxPage {
    pub messages: Vec<MessageSummary>,
    pub total: u64,
    pub loading_list: bool,
    pub selected: Option<String>,
    pub detail: Option<MessageFull>,
    pub loading_detail: bool,
}

impl InboxPage {
    pub fn begin_load(&mut self) {
        self.loading_list = true;
    }

    pub fn list_loaded(&mut self, result: Result<MessagePage, String>) -> Result<(), String> {
        self.loading_list = false;
        let page = result?;
        self.total = page.total;
        self.messages = page.messages;
        Ok(())
    }

    /// Returns true when a detail load should be started. Re-selecting
    /// the current message only reloads it after a failed load.
    pub fn select(&mut self, id: String) -> bool {
        if self.selected.as_deref() == Some(id.as_str())
            && (self.detail.is_some() || self.loading_detail)
        {
            return false;
        }
        self.selected = Some(id);
        self.detail = None;
        self.loading_detail = true;
        true
    }

    pub fn detail_loaded(
        &mut self,
        id: &str,
        result: Result<MessageFull, String>,
    ) -> DetailOutcome {
        if self.selected.as_deref() != Some(id) {
            tracing::debug!(id, "dropping stale message response");
            return DetailOutcome::Stale;
        }
        self.loading_detail = false;
        match result {
            Ok(message) => {
                let mark_read = !message.summary.read_state;
                self.detail = Some(message);
                DetailOutcome::Shown { mark_read }
            }
            Err(e) => DetailOutcome::Failed(e),
        }
    }

    /// The server confirmed the message is read.
    pub fn marked_read(&mut self, id: &str) {
        if let Some(m) = self.messages.iter_mut().find(|m| m.id == id) {
            m.read_state = true;
        }
        if let Some(detail) = self.detail.as_mut().filter(|d| d.summary.id == id) {
            detail.summary.read_state = true;
        }
    }

    pub fn unread_count(&self) -> usize {
        self.messages.iter().filter(|m| !m.read_state).count()
    }
}
