mod app;
mod config;
mod model;
mod net;
mod pages;
mod sieve;
mod store;
mod ui;

use tracing_subscriber::EnvFilter;

pub fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    iced::application("MailRaven Console", app::update, app::view)
        .subscription(app::subscription)
        .theme(app::theme)
        .window_size((1100.0, 700.0))
        .centered()
        .run_with(app::init)
}
