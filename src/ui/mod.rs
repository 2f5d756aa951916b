pub mod compose_view;
pub mod inbox_view;
pub mod login_modal;
pub mod status_bar;
pub mod toolbar;
pub mod vacation_view;

use iced::widget::{container, text};
use iced::{Border, Color, Element, Font, Length, Theme};

pub const BOLD: Font = Font {
    weight: iced::font::Weight::Bold,
    ..Font::DEFAULT
};

/// Bordered card used for page sections.
pub fn section_card<'a, M: 'a>(content: impl Into<Element<'a, M>>) -> Element<'a, M> {
    container(content)
        .padding(16)
        .width(Length::Fill)
        .style(|theme: &Theme| {
            let p = theme.palette();
            container::Style {
                background: Some(iced::Background::Color(p.background)),
                border: Border {
                    color: Color::from_rgba(p.text.r, p.text.g, p.text.b, 0.12),
                    width: 1.0,
                    radius: 8.0.into(),
                },
                ..container::Style::default()
            }
        })
        .into()
}

/// Theme-aware muted text style (50% opacity of the theme's text color).
pub fn muted_text(theme: &Theme) -> text::Style {
    let p = theme.palette();
    text::Style {
        color: Some(Color::from_rgba(p.text.r, p.text.g, p.text.b, 0.5)),
    }
}

pub fn warning_text(_theme: &Theme) -> text::Style {
    text::Style {
        color: Some(Color::from_rgb(0.8, 0.55, 0.0)),
    }
}

/// Centered placeholder for empty or loading panes.
pub fn placeholder<'a, M: 'a>(label: &'a str) -> Element<'a, M> {
    container(text(label).size(14).style(muted_text))
        .center(Length::Fill)
        .into()
}
