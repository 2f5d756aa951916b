use iced::widget::{button, column, container, row, text, text_input};
use iced::{Border, Color, Element, Length, Theme};

use crate::model::session::Credentials;
use crate::ui::muted_text;

#[derive(Debug, Clone)]
pub enum LoginMessage {
    SetServer(String),
    SetEmail(String),
    SetPassword(String),
    Submit,
}

#[derive(Debug, Clone, Default)]
pub struct LoginState {
    pub visible: bool,
    pub server_url: String,
    pub email: String,
    pub password: String,
    pub submitting: bool,
}

impl LoginState {
    pub fn open(&mut self, server_url: &str, email: Option<&str>) {
        self.visible = true;
        self.submitting = false;
        self.server_url = server_url.to_string();
        if let Some(email) = email {
            self.email = email.to_string();
        }
        self.password.clear();
    }

    pub fn close(&mut self) {
        self.visible = false;
        self.submitting = false;
        self.password.clear();
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

pub fn view(state: &LoginState) -> Element<'_, LoginMessage> {
    let submit = (!state.submitting).then_some(LoginMessage::Submit);

    let form = column![
        labeled_input("Server:", &state.server_url, LoginMessage::SetServer, false, None),
        labeled_input("Email:", &state.email, LoginMessage::SetEmail, false, submit.clone()),
        labeled_input("Password:", &state.password, LoginMessage::SetPassword, true, submit.clone()),
    ]
    .spacing(6);

    let button_label = if state.submitting { "Signing in..." } else { "Sign in" };

    let dialog = container(
        column![
            text("Sign in to MailRaven").size(18),
            text("Use your mailbox address and password.")
                .size(12)
                .style(muted_text),
            form,
            button(button_label)
                .on_press_maybe(submit)
                .style(button::primary),
        ]
        .spacing(12)
        .padding(20)
        .max_width(450),
    )
    .style(|theme: &Theme| {
        let palette = theme.palette();
        container::Style {
            background: Some(iced::Background::Color(palette.background)),
            border: Border {
                color: Color::from_rgba(
                    palette.text.r,
                    palette.text.g,
                    palette.text.b,
                    0.3,
                ),
                width: 1.0,
                radius: 8.0.into(),
            },
            ..container::Style::default()
        }
    });

    // Overlay: dark semi-transparent background + centered dialog
    container(
        container(dialog)
            .center_x(Length::Fill)
            .center_y(Length::Fill),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .style(|_theme: &Theme| container::Style {
        background: Some(iced::Background::Color(Color::from_rgba(0.0, 0.0, 0.0, 0.5))),
        ..container::Style::default()
    })
    .into()
}

fn labeled_input<'a>(
    label: &'a str,
    value: &'a str,
    on_input: impl Fn(String) -> LoginMessage + 'a,
    secure: bool,
    on_submit: Option<LoginMessage>,
) -> Element<'a, LoginMessage> {
    let mut input = text_input("", value)
        .on_input(on_input)
        .secure(secure)
        .width(280);
    if let Some(msg) = on_submit {
        input = input.on_submit(msg);
    }

    row![text(label).width(120).size(14), input]
        .spacing(8)
        .align_y(iced::Alignment::Center)
        .into()
}
