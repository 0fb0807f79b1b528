mod app;
mod cli;
mod components;
mod config;
mod draw;
mod state;

use crate::app::App;
use crate::cli::Cli;
use crate::config::ConfigStore;
use crate::state::app_settings::AppSettings;
use clap::Parser;
use crossterm::style::Stylize;
use football_api::ApiError;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    better_panic::install();

    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(AppSettings::log_filter(cli.debug)))
        .format_timestamp(None)
        .init();

    let store = ConfigStore::locate();
    log::debug!(target: "sporty", "config file at {}", store.path().display());
    let settings = match AppSettings::load(&store) {
        Ok(settings) => settings,
        Err(e) => {
            report(&e);
            return;
        }
    };

    let app = App::new(settings, store);
    if let Err(e) = app.run(cli.command).await {
        report(&e);
    }
}

/// Every handled failure ends as one line on stderr; the exit status stays 0.
fn report(e: &anyhow::Error) {
    if let Some(errors) = e.downcast_ref::<ApiError>().and_then(ApiError::errors) {
        log::debug!(target: "sporty", "upstream errors payload: {errors}");
    }
    eprintln!("{}", format!("Error: {e:#}").red());
}
