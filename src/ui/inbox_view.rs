use iced::widget::{button, column, container, horizontal_rule, row, scrollable, text};
use iced::{Border, Color, Element, Font, Length, Theme};

use crate::model::message::{MessageFull, MessageSummary};
use crate::pages::inbox::InboxPage;
use crate::ui::{muted_text, placeholder, BOLD};

#[derive(Debug, Clone)]
pub enum InboxMessage {
    Select(String),
    Refresh,
}

pub fn view(page: &InboxPage) -> Element<'_, InboxMessage> {
    let list: Element<'_, InboxMessage> = if page.loading_list && page.messages.is_empty() {
        placeholder("Loading...")
    } else {
        view_list(page)
    };

    let detail: Element<'_, InboxMessage> = if page.loading_detail {
        placeholder("Loading...")
    } else {
        match &page.detail {
            Some(message) => view_detail(message),
            None => placeholder("No message selected"),
        }
    };

    row![
        container(list).width(340).height(Length::Fill),
        container(detail).width(Length::Fill).height(Length::Fill),
    ]
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}

fn view_list(page: &InboxPage) -> Element<'_, InboxMessage> {
    let header = row![
        text(format!("Inbox ({})", page.total)).size(14).font(BOLD),
        iced::widget::horizontal_space().width(Length::Fill),
        button(text("Refresh").size(12))
            .on_press_maybe((!page.loading_list).then_some(InboxMessage::Refresh))
            .style(button::secondary)
            .padding([3, 8]),
    ]
    .align_y(iced::Alignment::Center);

    let mut content = column![header].spacing(4).padding(6);

    if page.messages.is_empty() {
        content = content.push(text("No messages").size(12).style(muted_text));
    }

    for message in &page.messages {
        let is_selected = page.selected.as_deref() == Some(message.id.as_str());
        content = content.push(list_entry(message, is_selected));
    }

    container(scrollable(content).height(Length::Fill))
        .height(Length::Fill)
        .style(|theme: &Theme| {
            let p = theme.palette();
            container::Style {
                border: Border {
                    color: Color::from_rgba(p.text.r, p.text.g, p.text.b, 0.1),
                    width: 1.0,
                    radius: 0.0.into(),
                },
                ..container::Style::default()
            }
        })
        .into()
}

fn list_entry(message: &MessageSummary, selected: bool) -> Element<'_, InboxMessage> {
    let font = if message.read_state { Font::DEFAULT } else { BOLD };

    let content = column![
        row![
            text(&message.sender).size(13).font(font).width(Length::Fill),
            text(short_date(&message.received_at)).size(11).style(muted_text),
        ]
        .spacing(6),
        text(&message.subject).size(13).font(font),
        text(&message.snippet).size(11).style(muted_text),
    ]
    .spacing(2);

    button(content)
        .on_press(InboxMessage::Select(message.id.clone()))
        .width(Length::Fill)
        .padding(8)
        .style(move |theme: &Theme, _status| {
            let p = theme.palette();
            let bg = if selected {
                Color::from_rgba(0.2, 0.45, 0.85, 0.12)
            } else {
                p.background
            };
            button::Style {
                background: Some(iced::Background::Color(bg)),
                text_color: p.text,
                border: Border {
                    color: Color::from_rgba(p.text.r, p.text.g, p.text.b, 0.08),
                    width: 1.0,
                    radius: 6.0.into(),
                },
                ..button::Style::default()
            }
        })
        .into()
}

fn view_detail(message: &MessageFull) -> Element<'_, InboxMessage> {
    let summary = &message.summary;

    let mut header = column![
        text(&summary.subject).size(18).font(BOLD),
        meta_row("From", &summary.sender),
        meta_row("To", &summary.recipient),
        meta_row("Date", &summary.received_at),
    ]
    .spacing(4);

    let checks: Vec<String> = [
        ("SPF", &summary.spf_result),
        ("DKIM", &summary.dkim_result),
        ("DMARC", &summary.dmarc_result),
    ]
    .into_iter()
    .filter_map(|(name, result)| {
        result
            .as_deref()
            .filter(|r| !r.is_empty())
            .map(|r| format!("{name}: {r}"))
    })
    .collect();
    if !checks.is_empty() {
        header = header.push(text(checks.join("   ")).size(11).style(muted_text));
    }

    let body = column![header, horizontal_rule(1), text(&message.body).size(14)]
        .spacing(12)
        .padding(16);

    scrollable(body).height(Length::Fill).into()
}

fn meta_row<'a>(label: &'a str, value: &'a str) -> Element<'a, InboxMessage> {
    row![
        text(format!("{label}:")).size(12).font(BOLD).width(50),
        text(value).size(12),
    ]
    .spacing(6)
    .into()
}

/// `2024-05-01T10:00:00Z` → `2024-05-01`; anything else is shown as is.
fn short_date(timestamp: &str) -> &str {
    timestamp
        .split_once('T')
        .map_or(timestamp, |(date, _)| date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_date() {
        assert_eq!(short_date("2024-05-01T10:00:00Z"), "2024-05-01");
        assert_eq!(short_date("yesterday"), "yesterday");
    }
}
