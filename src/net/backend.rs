use std::future::Future;

use crate::model::message::{MessageFull, MessagePage, OutgoingMessage};
use crate::model::script::FilterScript;
use crate::net::api::Error;

/// Script storage operations the vacation page depends on.
pub trait SieveBackend {
    fn list_scripts(&self) -> impl Future<Output = Result<Vec<FilterScript>, Error>> + Send;

    /// Create the script, or replace it if one with the same name exists.
    fn put_script(
        &self,
        name: &str,
        content: &str,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    fn activate_script(&self, name: &str) -> impl Future<Output = Result<(), Error>> + Send;

    fn delete_script(&self, name: &str) -> impl Future<Output = Result<(), Error>> + Send;
}

/// Mailbox operations used by the inbox and compose pages.
pub trait MailBackend {
    fn list_messages(
        &self,
        limit: u32,
        offset: u32,
    ) -> impl Future<Output = Result<MessagePage, Error>> + Send;

    fn get_message(&self, id: &str) -> impl Future<Output = Result<MessageFull, Error>> + Send;

    fn mark_read(&self, id: &str) -> impl Future<Output = Result<(), Error>> + Send;

    fn send_message(
        &self,
        message: &OutgoingMessage,
    ) -> impl Future<Output = Result<(), Error>> + Send;
}
