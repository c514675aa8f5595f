use std::process::ExitCode;

use action::RunState;
use host::GithubActions;
use providers::ovh::OvhClient;
use tracing_subscriber::EnvFilter;

mod action;
mod config;
mod dns;
mod error;
mod host;
mod providers;

fn init_logging() {
    let default_level = match std::env::var("RUNNER_DEBUG").as_deref() {
        Ok("1") => "debug",
        _ => "info",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    let host = GithubActions::from_env();
    match action::run(&host, |ovh| Ok(OvhClient::new(ovh)?)).await {
        RunState::Succeeded => ExitCode::SUCCESS,
        RunState::Failed => ExitCode::FAILURE,
    }
}
