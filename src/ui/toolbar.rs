use iced::widget::{button, container, horizontal_space, row, text};
use iced::{Border, Color, Element, Length, Theme};

use crate::app::{Message, Page};
use crate::ui::BOLD;

pub fn view<'a>(current: Page, unread: usize, dark_mode: bool) -> Element<'a, Message> {
    let theme_label = if dark_mode { "Light" } else { "Dark" };
    let inbox_label = if unread > 0 {
        format!("Inbox ({unread})")
    } else {
        "Inbox".to_string()
    };

    let branding = row![text("MAIL").size(20).font(BOLD), text("RAVEN").size(20)]
        .spacing(0)
        .align_y(iced::Alignment::Center);

    let tb = row![
        branding,
        horizontal_space().width(24),
        page_button(inbox_label, Page::Inbox, current),
        page_button("Compose".to_string(), Page::Compose, current),
        page_button("Vacation".to_string(), Page::Vacation, current),
        horizontal_space().width(Length::Fill),
        toolbar_button(theme_label.to_string(), Message::ToggleTheme, false),
        toolbar_button("Sign out".to_string(), Message::Logout, false),
    ]
    .spacing(4)
    .padding(6)
    .align_y(iced::Alignment::Center);

    container(tb)
        .width(Length::Fill)
        .style(|theme: &Theme| {
            let palette = theme.palette();
            container::Style {
                background: Some(iced::Background::Color(Color::from_rgba(
                    palette.text.r,
                    palette.text.g,
                    palette.text.b,
                    0.04,
                ))),
                ..container::Style::default()
            }
        })
        .into()
}

fn page_button<'a>(label: String, page: Page, current: Page) -> iced::widget::Button<'a, Message> {
    toolbar_button(label, Message::ShowPage(page), page == current)
}

fn toolbar_button<'a>(label: String, msg: Message, active: bool) -> iced::widget::Button<'a, Message> {
    button(text(label).size(13))
        .on_press(msg)
        .style(move |theme: &Theme, status| {
            let palette = theme.palette();
            let mut style = button::Style {
                background: Some(iced::Background::Color(palette.background)),
                text_color: palette.text,
                border: Border {
                    color: Color::from_rgba(
                        palette.text.r,
                        palette.text.g,
                        palette.text.b,
                        0.2,
                    ),
                    width: 1.0,
                    radius: 6.0.into(),
                },
                ..button::Style::default()
            };
            if active {
                style.background = Some(iced::Background::Color(Color::from_rgba(
                    0.2, 0.45, 0.85, 0.15,
                )));
            } else if matches!(status, button::Status::Hovered | button::Status::Pressed) {
                style.background = Some(iced::Background::Color(Color::from_rgba(
                    palette.text.r,
                    palette.text.g,
                    palette.text.b,
                    0.08,
                )));
            }
            style
        })
        .padding([4, 10])
}
