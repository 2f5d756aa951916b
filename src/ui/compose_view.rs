use iced::widget::{button, column, container, row, text, text_editor, text_input};
use iced::{Element, Length};

use crate::pages::compose::ComposePage;
use crate::ui::{muted_text, section_card, BOLD};

#[derive(Debug, Clone)]
pub enum ComposeMessage {
    SetTo(String),
    SetSubject(String),
    BodyAction(text_editor::Action),
    Send,
    Cancel,
}

pub fn view<'a>(page: &'a ComposePage, body: &'a text_editor::Content) -> Element<'a, ComposeMessage> {
    let send_label = if page.sending { "Sending..." } else { "Send Message" };

    let form = column![
        text("Compose Message").size(18).font(BOLD),
        text("Send a new email message.").size(12).style(muted_text),
        field(
            "To",
            text_input("recipient@example.com", &page.draft.to)
                .on_input(ComposeMessage::SetTo)
                .into(),
        ),
        field(
            "Subject",
            text_input("Enter subject", &page.draft.subject)
                .on_input(ComposeMessage::SetSubject)
                .into(),
        ),
        field(
            "Message",
            text_editor(body)
                .placeholder("Type your message here...")
                .on_action(ComposeMessage::BodyAction)
                .height(300)
                .into(),
        ),
        row![
            iced::widget::horizontal_space().width(Length::Fill),
            button("Cancel")
                .on_press(ComposeMessage::Cancel)
                .style(button::secondary),
            button(send_label)
                .on_press_maybe((!page.sending).then_some(ComposeMessage::Send))
                .style(button::primary),
        ]
        .spacing(8),
    ]
    .spacing(12);

    container(section_card(form))
        .padding(24)
        .max_width(720)
        .into()
}

fn field<'a>(label: &'a str, input: Element<'a, ComposeMessage>) -> Element<'a, ComposeMessage> {
    column![text(label).size(12).style(muted_text), input]
        .spacing(4)
        .into()
}
