// Entrypoint for the uploader.
// - Keeps `main` small: parse arguments, run the upload, map the outcome
//   to an exit status in one place.
// - `run` returns `anyhow::Result` so every stage can just use `?`.

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use gh_asset_upload::api::Uploader;
use gh_asset_upload::args::Cli;
use gh_asset_upload::ui;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    // Logs go to stderr; stdout carries only the user-facing report.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "upload failed");
            let usage = Cli::command().render_help().to_string();
            ui::print_error_and_usage(&e, &usage);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.into_config()?;
    ui::print_sending(&config);

    let uploader = Uploader::new()?;
    let asset_url = uploader.upload(&config)?.into_result()?;
    ui::print_success(&asset_url);
    Ok(())
}
