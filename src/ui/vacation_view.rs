use iced::widget::{
    button, checkbox, column, container, horizontal_rule, row, text, text_editor, text_input,
    toggler,
};
use iced::{Element, Length};

use crate::model::vacation::VacationState;
use crate::pages::vacation::{LoadStatus, VacationPage};
use crate::ui::{muted_text, placeholder, section_card, warning_text, BOLD};

#[derive(Debug, Clone)]
pub enum VacationMessage {
    SetEnabled(bool),
    SetSubject(String),
    BodyAction(text_editor::Action),
    SetDays(String),
    Acknowledge(bool),
    Save,
    Reload,
}

pub fn view<'a>(page: &'a VacationPage, body: &'a text_editor::Content) -> Element<'a, VacationMessage> {
    let content: Element<'a, VacationMessage> = match (&page.status, &page.state) {
        (LoadStatus::Loading, _) => return placeholder("Loading..."),
        (LoadStatus::Failed, _) => column![
            text("Could not load current vacation settings.").size(14),
            button("Try again")
                .on_press(VacationMessage::Reload)
                .style(button::secondary),
        ]
        .spacing(12)
        .into(),
        (LoadStatus::Ready, VacationState::ExternallyManaged { active }) => {
            view_read_only(*active)
        }
        (LoadStatus::Ready, _) => view_form(page, body),
    };

    container(section_card(content))
        .padding(24)
        .max_width(720)
        .into()
}

fn view_read_only<'a>(active: bool) -> Element<'a, VacationMessage> {
    column![
        text("Vacation Settings").size(18).font(BOLD),
        text("Your vacation script is managed by another tool or is too complex to edit here.")
            .size(13)
            .style(warning_text),
        text(format!("Status: {}", if active { "Active" } else { "Inactive" })).size(13),
    ]
    .spacing(10)
    .into()
}

fn view_form<'a>(page: &'a VacationPage, body: &'a text_editor::Content) -> Element<'a, VacationMessage> {
    let form = &page.form;

    let mut content = column![
        text("Vacation Auto-Responder").size(18).font(BOLD),
        text("Automatically reply to incoming emails when you are away.")
            .size(12)
            .style(muted_text),
        horizontal_rule(1),
        row![
            column![
                text("Enable Auto-Reply").size(14),
                text("Turn this on to start sending replies.")
                    .size(11)
                    .style(muted_text),
            ]
            .spacing(2)
            .width(Length::Fill),
            toggler(form.enabled).on_toggle(VacationMessage::SetEnabled),
        ]
        .align_y(iced::Alignment::Center)
        .spacing(12),
    ]
    .spacing(12);

    if form.enabled {
        content = content
            .push(field(
                "Subject",
                text_input("", &form.subject)
                    .on_input(VacationMessage::SetSubject)
                    .into(),
            ))
            .push(field(
                "Message Body",
                text_editor(body)
                    .on_action(VacationMessage::BodyAction)
                    .height(140)
                    .into(),
            ))
            .push(field(
                "Response Interval (Days)",
                column![
                    text_input("1", &form.days)
                        .on_input(VacationMessage::SetDays)
                        .width(120),
                    text("How often to reply to the same sender.")
                        .size(11)
                        .style(muted_text),
                ]
                .spacing(4)
                .into(),
            ));
    }

    if page.needs_acknowledgement() {
        content = content.push(
            column![
                text(format!(
                    "Other active filters: {}. The server may allow only one active script, \
                     so enabling the auto-responder can switch them off.",
                    page.other_active.join(", ")
                ))
                .size(12)
                .style(warning_text),
                checkbox("I understand, enable anyway", page.acknowledged)
                    .on_toggle(VacationMessage::Acknowledge),
            ]
            .spacing(6),
        );
    }

    let save_label = if page.saving { "Saving..." } else { "Save Changes" };
    content = content.push(
        button(save_label)
            .on_press_maybe(page.can_save().then_some(VacationMessage::Save))
            .style(button::primary),
    );

    content.into()
}

fn field<'a>(label: &'a str, input: Element<'a, VacationMessage>) -> Element<'a, VacationMessage> {
    column![text(label).size(12).style(muted_text), input]
        .spacing(4)
        .into()
}
