use iced::widget::{container, horizontal_space, row, text};
use iced::{Color, Element, Length, Theme};
use std::time::{Duration, Instant};

use crate::app::Message;
use crate::model::session::Session;
use crate::ui::muted_text;

/// How long a notification stays in the status bar.
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    pub shown_at: Instant,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
            shown_at: Instant::now(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
            shown_at: Instant::now(),
        }
    }

    pub fn expired(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) >= NOTICE_TTL
    }
}

pub fn view<'a>(notice: Option<&'a Notice>, session: Option<&'a Session>, server: &'a str) -> Element<'a, Message> {
    let notice_text = match notice {
        Some(n) => {
            let color = match n.kind {
                NoticeKind::Success => Color::from_rgb(0.2, 0.6, 0.3),
                NoticeKind::Error => Color::from_rgb(0.8, 0.2, 0.2),
            };
            text(&n.text).size(13).color(color)
        }
        None => text("Ready").size(13),
    };

    let user = match session {
        Some(s) if s.is_admin() => format!("{} (admin) @ {server}", s.email),
        Some(s) => format!("{} @ {server}", s.email),
        None => "Not signed in".to_string(),
    };

    container(
        row![
            notice_text,
            horizontal_space().width(Length::Fill),
            text(user).size(12).style(|theme: &Theme| muted_text(theme)),
        ]
        .align_y(iced::Alignment::Center),
    )
    .width(Length::Fill)
    .padding([2, 8])
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_expiry() {
        let notice = Notice::error("Failed to save settings");
        assert!(!notice.expired(notice.shown_at));
        assert!(!notice.expired(notice.shown_at + Duration::from_secs(1)));
        assert!(notice.expired(notice.shown_at + NOTICE_TTL));
    }
}
