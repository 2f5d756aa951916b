use iced::widget::{column, container, text_editor};
use iced::{Element, Length, Subscription, Task, Theme};

use chrono::Utc;
use std::time::{Duration, Instant};

use crate::config::settings::Settings;
use crate::model::message::{MessageFull, MessagePage};
use crate::model::session::Session;
use crate::model::vacation::VacationRule;
use crate::net::api::{self, ApiClient};
use crate::net::backend::MailBackend;
use crate::pages::compose::{self, ComposePage};
use crate::pages::inbox::{self, DetailOutcome, InboxPage};
use crate::pages::vacation::{self, Loaded, SaveError, VacationPage};
use crate::store::{session_store, settings_store};
use crate::ui;
use crate::ui::compose_view::ComposeMessage;
use crate::ui::inbox_view::InboxMessage;
use crate::ui::login_modal::{LoginMessage, LoginState};
use crate::ui::status_bar::Notice;
use crate::ui::vacation_view::VacationMessage;

const NOTICE_CHECK_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Inbox,
    Compose,
    Vacation,
}

/// A failed backend call as carried back to the update loop.
#[derive(Debug, Clone)]
pub struct Failure {
    pub message: String,
    /// The token was rejected; the user has to sign in again.
    pub expired: bool,
}

impl From<api::Error> for Failure {
    fn from(e: api::Error) -> Self {
        Self {
            expired: matches!(e, api::Error::Unauthorized),
            message: e.to_string(),
        }
    }
}

impl From<SaveError> for Failure {
    fn from(e: SaveError) -> Self {
        let expired = match &e {
            SaveError::Save(inner) | SaveError::Activate(inner) | SaveError::Delete(inner) => {
                matches!(inner, api::Error::Unauthorized)
            }
            SaveError::Invalid(_) => false,
        };
        Self {
            message: e.to_string(),
            expired,
        }
    }
}

struct SignedIn {
    session: Session,
    client: ApiClient,
}

pub struct Console {
    settings: Settings,
    signed_in: Option<SignedIn>,
    login: LoginState,
    page: Page,

    inbox: InboxPage,
    compose: ComposePage,
    compose_body: text_editor::Content,
    vacation: VacationPage,
    vacation_body: text_editor::Content,

    notice: Option<Notice>,
    dark_mode: bool,

    /// Bumped whenever the session changes. Backend results carry the
    /// value they were started under and are dropped once it moves on.
    generation: u64,
}

impl Console {
    fn new(settings: Settings) -> Self {
        Self {
            settings,
            signed_in: None,
            login: LoginState::default(),
            page: Page::Inbox,
            inbox: InboxPage::default(),
            compose: ComposePage::default(),
            compose_body: text_editor::Content::new(),
            vacation: VacationPage::default(),
            vacation_body: text_editor::Content::new(),
            notice: None,
            dark_mode: false,
            generation: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    // Toolbar
    ShowPage(Page),
    Logout,
    ToggleTheme,

    // Views
    LoginMsg(LoginMessage),
    InboxMsg(InboxMessage),
    ComposeMsg(ComposeMessage),
    VacationMsg(VacationMessage),

    NoticeTick(Instant),

    // Backend results, tagged with the session generation
    LoggedIn(Result<(String, Session), String>),
    MessagesLoaded(u64, Result<MessagePage, Failure>),
    DetailLoaded(u64, String, Result<MessageFull, Failure>),
    MarkedRead(u64, String, Result<(), Failure>),
    MessageSent(u64, Result<(), Failure>),
    VacationLoaded(u64, Result<Loaded, Failure>),
    VacationSaved(u64, Result<VacationRule, Failure>),
}

impl Message {
    fn generation(&self) -> Option<u64> {
        match self {
            Message::MessagesLoaded(g, _)
            | Message::DetailLoaded(g, _, _)
            | Message::MarkedRead(g, _, _)
            | Message::MessageSent(g, _)
            | Message::VacationLoaded(g, _)
            | Message::VacationSaved(g, _) => Some(*g),
            _ => None,
        }
    }
}

pub fn init() -> (Console, Task<Message>) {
    let mut state = Console::new(settings_store::load_settings());

    let stored = session_store::load_session();
    let restored = match stored {
        Some(session) if session.is_expired(Utc::now()) => {
            tracing::info!(email = %session.email, "stored session has expired");
            session_store::clear_session();
            state.login.open(&state.settings.api_url, Some(&session.email));
            return (state, Task::none());
        }
        Some(session) => match ApiClient::new(&state.settings.api_url) {
            Ok(client) => Some(SignedIn {
                client: client.with_session(&session),
                session,
            }),
            Err(e) => {
                tracing::warn!(error = %e, "stored server URL is unusable");
                None
            }
        },
        None => None,
    };

    match restored {
        Some(signed_in) => {
            tracing::info!(email = %signed_in.session.email, "restored session");
            state.signed_in = Some(signed_in);
            let task = load_inbox(&mut state);
            (state, task)
        }
        None => {
            state.login.open(&state.settings.api_url, None);
            (state, Task::none())
        }
    }
}

pub fn update(state: &mut Console, message: Message) -> Task<Message> {
    if let Some(generation) = message.generation() {
        if state.signed_in.is_none() || generation != state.generation {
            tracing::debug!(
                generation,
                current = state.generation,
                "dropping response from an earlier session"
            );
            return Task::none();
        }
    }

    match message {
        Message::ToggleTheme => {
            state.dark_mode = !state.dark_mode;
            Task::none()
        }

        Message::ShowPage(page) => {
            state.page = page;
            match page {
                Page::Inbox => load_inbox(state),
                Page::Vacation => load_vacation(state),
                Page::Compose => Task::none(),
            }
        }

        Message::Logout => {
            sign_out(state);
            Task::none()
        }

        Message::NoticeTick(now) => {
            if state.notice.as_ref().is_some_and(|n| n.expired(now)) {
                state.notice = None;
            }
            Task::none()
        }

        Message::LoginMsg(msg) => handle_login_message(state, msg),
        Message::InboxMsg(msg) => handle_inbox_message(state, msg),
        Message::ComposeMsg(msg) => handle_compose_message(state, msg),
        Message::VacationMsg(msg) => handle_vacation_message(state, msg),

        Message::LoggedIn(result) => match result {
            Ok((url, session)) => match ApiClient::new(&url) {
                Ok(client) => {
                    state.settings.api_url = url;
                    settings_store::save_settings(&state.settings);
                    session_store::save_session(&session);
                    state.generation += 1;
                    state.signed_in = Some(SignedIn {
                        client: client.with_session(&session),
                        session,
                    });
                    state.login.close();
                    state.page = Page::Inbox;
                    load_inbox(state)
                }
                Err(e) => {
                    state.login.submitting = false;
                    state.notice = Some(Notice::error(e.to_string()));
                    Task::none()
                }
            },
            Err(e) => {
                tracing::error!(error = %e, "login failed");
                state.login.submitting = false;
                state.notice = Some(Notice::error(format!("Login failed: {e}")));
                Task::none()
            }
        },

        Message::MessagesLoaded(_, result) => {
            let expired = is_expired(&result);
            if let Err(e) = state.inbox.list_loaded(result.map_err(|f| f.message)) {
                tracing::error!(error = %e, "failed to load inbox");
                if expired {
                    return expire_session(state);
                }
                state.notice = Some(Notice::error("Failed to load inbox"));
            }
            Task::none()
        }

        Message::DetailLoaded(_, id, result) => {
            let expired = is_expired(&result);
            match state.inbox.detail_loaded(&id, result.map_err(|f| f.message)) {
                DetailOutcome::Shown { mark_read: true } => mark_read(state, id),
                DetailOutcome::Shown { mark_read: false } | DetailOutcome::Stale => Task::none(),
                DetailOutcome::Failed(e) => {
                    tracing::error!(id, error = %e, "failed to load message");
                    if expired {
                        return expire_session(state);
                    }
                    state.notice = Some(Notice::error("Failed to load message"));
                    Task::none()
                }
            }
        }

        Message::MarkedRead(_, id, result) => {
            match result {
                Ok(()) => state.inbox.marked_read(&id),
                Err(e) => tracing::warn!(id, error = %e.message, "failed to mark message read"),
            }
            Task::none()
        }

        Message::MessageSent(_, result) => match result {
            Ok(()) => {
                state.compose.sent();
                state.compose_body = text_editor::Content::new();
                state.notice = Some(Notice::success("Message sent successfully"));
                state.page = Page::Inbox;
                load_inbox(state)
            }
            Err(e) => {
                tracing::error!(error = %e.message, "failed to send message");
                state.compose.send_failed();
                if e.expired {
                    return expire_session(state);
                }
                state.notice = Some(Notice::error("Failed to send message"));
                Task::none()
            }
        },

        Message::VacationLoaded(_, result) => {
            let expired = is_expired(&result);
            if let Err(e) = &result {
                tracing::error!(error = %e.message, "failed to load vacation settings");
            }
            state.vacation.loaded(result.map_err(|f| f.message));
            state.vacation_body = text_editor::Content::with_text(&state.vacation.form.body);
            if expired {
                return expire_session(state);
            }
            if state.vacation.status == vacation::LoadStatus::Failed {
                state.notice = Some(Notice::error("Could not load current vacation settings"));
            }
            Task::none()
        }

        Message::VacationSaved(_, result) => {
            match result {
                Ok(rule) => {
                    let text = if rule.enabled {
                        "Vacation response enabled"
                    } else {
                        "Vacation response disabled"
                    };
                    state.vacation.saved(rule);
                    state.notice = Some(Notice::success(text));
                }
                Err(e) => {
                    tracing::error!(error = %e.message, "failed to save vacation settings");
                    state.vacation.save_failed();
                    if e.expired {
                        return expire_session(state);
                    }
                    state.notice = Some(Notice::error("Failed to save settings"));
                }
            }
            Task::none()
        }
    }
}

fn handle_login_message(state: &mut Console, msg: LoginMessage) -> Task<Message> {
    match msg {
        LoginMessage::SetServer(v) => state.login.server_url = v,
        LoginMessage::SetEmail(v) => state.login.email = v,
        LoginMessage::SetPassword(v) => state.login.password = v,
        LoginMessage::Submit => {
            let credentials = state.login.credentials();
            if let Err(e) = credentials.validate() {
                state.notice = Some(Notice::error(e.to_string()));
                return Task::none();
            }
            let url = state.login.server_url.trim().to_string();
            let client = match ApiClient::new(&url) {
                Ok(client) => client,
                Err(e) => {
                    state.notice = Some(Notice::error(e.to_string()));
                    return Task::none();
                }
            };
            state.login.submitting = true;
            return Task::perform(
                async move {
                    client
                        .login(&credentials)
                        .await
                        .map(|session| (url, session))
                        .map_err(|e| e.to_string())
                },
                Message::LoggedIn,
            );
        }
    }
    Task::none()
}

fn handle_inbox_message(state: &mut Console, msg: InboxMessage) -> Task<Message> {
    match msg {
        InboxMessage::Refresh => load_inbox(state),
        InboxMessage::Select(id) => {
            let Some((client, generation)) = client(state) else {
                return Task::none();
            };
            if !state.inbox.select(id.clone()) {
                return Task::none();
            }
            Task::perform(
                async move {
                    let (id, result) = inbox::load_detail(&client, id).await;
                    (id, result.map_err(Failure::from))
                },
                move |(id, result)| Message::DetailLoaded(generation, id, result),
            )
        }
    }
}

fn handle_compose_message(state: &mut Console, msg: ComposeMessage) -> Task<Message> {
    match msg {
        ComposeMessage::SetTo(v) => state.compose.draft.to = v,
        ComposeMessage::SetSubject(v) => state.compose.draft.subject = v,
        ComposeMessage::BodyAction(action) => {
            state.compose_body.perform(action);
            state.compose.draft.body = editor_text(&state.compose_body);
        }
        ComposeMessage::Cancel => {
            state.compose = ComposePage::default();
            state.compose_body = text_editor::Content::new();
            state.page = Page::Inbox;
        }
        ComposeMessage::Send => {
            let Some((client, generation)) = client(state) else {
                return Task::none();
            };
            match state.compose.begin_send() {
                Ok(outgoing) => {
                    return Task::perform(
                        async move { compose::send(&client, outgoing).await.map_err(Failure::from) },
                        move |result| Message::MessageSent(generation, result),
                    );
                }
                Err(e) => state.notice = Some(Notice::error(e.to_string())),
            }
        }
    }
    Task::none()
}

fn handle_vacation_message(state: &mut Console, msg: VacationMessage) -> Task<Message> {
    let form = &mut state.vacation.form;
    match msg {
        VacationMessage::SetEnabled(on) => form.enabled = on,
        VacationMessage::SetSubject(v) => form.subject = v,
        VacationMessage::SetDays(v) => form.days = v,
        VacationMessage::BodyAction(action) => {
            state.vacation_body.perform(action);
            form.body = editor_text(&state.vacation_body);
        }
        VacationMessage::Acknowledge(on) => state.vacation.acknowledged = on,
        VacationMessage::Reload => return load_vacation(state),
        VacationMessage::Save => {
            if !state.vacation.can_save() {
                return Task::none();
            }
            let Some((client, generation)) = client(state) else {
                return Task::none();
            };
            let rule = match state.vacation.form.to_rule() {
                Ok(rule) => rule,
                Err(e) => {
                    state.notice = Some(Notice::error(e.to_string()));
                    return Task::none();
                }
            };
            state.vacation.saving = true;
            return Task::perform(
                async move {
                    vacation::apply(&client, &rule)
                        .await
                        .map(|()| rule)
                        .map_err(Failure::from)
                },
                move |result| Message::VacationSaved(generation, result),
            );
        }
    }
    Task::none()
}

/// The signed-in client and the generation its results belong to.
fn client(state: &Console) -> Option<(ApiClient, u64)> {
    state
        .signed_in
        .as_ref()
        .map(|s| (s.client.clone(), state.generation))
}

fn is_expired<T>(result: &Result<T, Failure>) -> bool {
    matches!(result, Err(f) if f.expired)
}

fn load_inbox(state: &mut Console) -> Task<Message> {
    let Some((client, generation)) = client(state) else {
        return Task::none();
    };
    state.inbox.begin_load();
    Task::perform(
        async move { inbox::load_list(&client).await.map_err(Failure::from) },
        move |result| Message::MessagesLoaded(generation, result),
    )
}

fn load_vacation(state: &mut Console) -> Task<Message> {
    let Some((client, generation)) = client(state) else {
        return Task::none();
    };
    state.vacation.begin_load();
    Task::perform(
        async move { vacation::load(&client).await.map_err(Failure::from) },
        move |result| Message::VacationLoaded(generation, result),
    )
}

fn mark_read(state: &Console, id: String) -> Task<Message> {
    let Some((client, generation)) = client(state) else {
        return Task::none();
    };
    Task::perform(
        async move {
            let result = client.mark_read(&id).await.map_err(Failure::from);
            (id, result)
        },
        move |(id, result)| Message::MarkedRead(generation, id, result),
    )
}

fn sign_out(state: &mut Console) {
    let email = end_session(state);
    session_store::clear_session();
    state.login.open(&state.settings.api_url, email.as_deref());
    tracing::info!("signed out");
}

/// Drop the signed-in user and everything loaded for them. Returns the
/// email so the login form can be prefilled.
fn end_session(state: &mut Console) -> Option<String> {
    state.generation += 1;
    state.page = Page::Inbox;
    state.inbox = InboxPage::default();
    state.compose = ComposePage::default();
    state.compose_body = text_editor::Content::new();
    state.vacation = VacationPage::default();
    state.vacation_body = text_editor::Content::new();
    state.signed_in.take().map(|s| s.session.email)
}

fn expire_session(state: &mut Console) -> Task<Message> {
    sign_out(state);
    state.notice = Some(Notice::error(api::Error::Unauthorized.to_string()));
    Task::none()
}

/// Editor text without the trailing newline the editor keeps after the
/// last line.
fn editor_text(content: &text_editor::Content) -> String {
    let text = content.text();
    match text.strip_suffix('\n') {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}

// --- View ---

pub fn view(state: &Console) -> Element<'_, Message> {
    let session = state.signed_in.as_ref().map(|s| &s.session);
    let server = state
        .signed_in
        .as_ref()
        .and_then(|s| s.client.base_url().host_str())
        .unwrap_or(state.settings.api_url.as_str());
    let status_bar = ui::status_bar::view(state.notice.as_ref(), session, server);

    let mut content: Element<'_, Message> = if state.signed_in.is_some() {
        let toolbar =
            ui::toolbar::view(state.page, state.inbox.unread_count(), state.dark_mode);
        let body = match state.page {
            Page::Inbox => ui::inbox_view::view(&state.inbox).map(Message::InboxMsg),
            Page::Compose => ui::compose_view::view(&state.compose, &state.compose_body)
                .map(Message::ComposeMsg),
            Page::Vacation => ui::vacation_view::view(&state.vacation, &state.vacation_body)
                .map(Message::VacationMsg),
        };
        column![
            toolbar,
            container(body).width(Length::Fill).height(Length::Fill),
            status_bar,
        ]
        .into()
    } else {
        column![ui::placeholder("Sign in to continue"), status_bar].into()
    };

    if state.login.visible {
        content = iced::widget::stack![
            content,
            ui::login_modal::view(&state.login).map(Message::LoginMsg),
        ]
        .into();
    }

    content
}

pub fn theme(state: &Console) -> Theme {
    if state.dark_mode {
        Theme::Dark
    } else {
        Theme::Light
    }
}

pub fn subscription(state: &Console) -> Subscription<Message> {
    if state.notice.is_some() {
        iced::time::every(Duration::from_millis(NOTICE_CHECK_MS)).map(Message::NoticeTick)
    } else {
        Subscription::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::vacation::VacationState;
    use crate::pages::testing::message;

    fn sign_in(state: &mut Console, email: &str) {
        let session = Session {
            token: format!("token-{email}"),
            email: email.to_string(),
            role: None,
            expires_at: None,
        };
        let client = ApiClient::new(&state.settings.api_url).unwrap();
        state.generation += 1;
        state.signed_in = Some(SignedIn {
            client: client.with_session(&session),
            session,
        });
    }

    fn one_message() -> Result<MessagePage, Failure> {
        Ok(MessagePage {
            messages: vec![message("1", false).summary],
            total: 1,
            has_more: false,
        })
    }

    #[test]
    fn test_inbox_applied_for_current_session() {
        let mut state = Console::new(Settings::default());
        sign_in(&mut state, "alice@example.com");

        let current = state.generation;
        let _ = update(&mut state, Message::MessagesLoaded(current, one_message()));
        assert_eq!(state.inbox.messages.len(), 1);
    }

    #[test]
    fn test_inbox_dropped_after_sign_out() {
        let mut state = Console::new(Settings::default());
        sign_in(&mut state, "alice@example.com");
        let started = state.generation;

        end_session(&mut state);
        let _ = update(&mut state, Message::MessagesLoaded(started, one_message()));
        assert!(state.inbox.messages.is_empty());
    }

    #[test]
    fn test_previous_user_results_dropped_after_new_sign_in() {
        let mut state = Console::new(Settings::default());
        sign_in(&mut state, "alice@example.com");
        let alice = state.generation;

        end_session(&mut state);
        sign_in(&mut state, "bob@example.com");

        let _ = update(&mut state, Message::MessagesLoaded(alice, one_message()));
        assert!(state.inbox.messages.is_empty());

        let loaded = Loaded {
            state: VacationState::Recognized(VacationRule {
                enabled: true,
                subject: "Away".into(),
                body: "Back soon".into(),
                days: 3,
            }),
            other_active: Vec::new(),
        };
        let _ = update(&mut state, Message::VacationLoaded(alice, Ok(loaded)));
        assert_eq!(state.vacation.status, vacation::LoadStatus::Loading);
        assert_eq!(state.vacation.state, VacationState::Absent);
    }

    #[test]
    fn test_unauthorized_is_expired() {
        let failure = Failure::from(api::Error::Unauthorized);
        assert!(failure.expired);

        let failure = Failure::from(api::Error::Status {
            status: 500,
            message: "boom".into(),
        });
        assert!(!failure.expired);
        assert!(failure.message.contains("boom"));
    }

    #[test]
    fn test_save_error_keeps_expiry() {
        let failure = Failure::from(SaveError::Activate(api::Error::Unauthorized));
        assert!(failure.expired);

        let failure = Failure::from(SaveError::Save(api::Error::Status {
            status: 404,
            message: "missing".into(),
        }));
        assert!(!failure.expired);
    }
}
