use crate::model::message::OutgoingMessage;
use crate::model::ValidationError;
use crate::net::api;
use crate::net::backend::MailBackend;

#[derive(Debug, Clone, Default)]
pub struct ComposePage {
    pub draft: OutgoingMessage,
    pub sending: bool,
}

impl ComposePage {
    /// Validate the draft and hand back what should be sent.
    pub fn begin_send(&mut self) -> Result<OutgoingMessage, ValidationError> {
        let message = OutgoingMessage {
            to: self.draft.to.trim().to_string(),
            subject: self.draft.subject.clone(),
            body: self.draft.body.clone(),
        };
        message.validate()?;
        self.sending = true;
        Ok(message)
    }

    pub fn sent(&mut self) {
        *self = Self::default();
    }

    pub fn send_failed(&mut self) {
        self.sending = false;
    }
}

pub async fn send<B: MailBackend>(backend: &B, message: OutgoingMessage) -> Result<(), api::Error> {
    backend.send_message(&message).await?;
    tracing::info!(to = %message.to, "message sent");
    Ok(())
}
