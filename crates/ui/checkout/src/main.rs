use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use ::app::{AppBuilder, Application};
use checkout::{app::App, cli::{Cli, Cmd}, config::Config, errors, headless};
use clap::Parser;
use color_eyre::{Result, eyre::eyre};
use donation::Validator;
use geography::{GeographyClient, GeographySource};
use tracing::info;

struct Checkout;

impl Application for Checkout {
    const APP_ID: &'static str = "checkout";
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Cli::parse();
    let cmd = args.command();
    let config = Config::new()?;

    // the form owns the terminal; the other commands also log to stderr
    let ctx = AppBuilder::<Checkout>::new(env!("CARGO_PKG_VERSION"))
        .data_dir(config.config.data_dir.clone())
        .console(cmd != Cmd::Run)
        .build()
        .map_err(|e| eyre!("failed to initialize logging: {e}"))?;
    errors::init(Some(ctx.log_file()))?;
    info!(command = ?cmd, "starting");

    let source: Arc<dyn GeographySource> =
        Arc::new(GeographyClient::new(&config.geography_config())?);
    let validator = Validator::new(config.validation.report);

    if cmd == Cmd::Run {
        let mut app = App::new(&config, source)?;
        app.run().await?;
        return Ok(ExitCode::SUCCESS);
    }

    // stdout is locked per command, never while the form owns the terminal
    match headless::execute(cmd, source.as_ref(), &validator, || io::stdout().lock()).await? {
        Some(false) => Ok(ExitCode::FAILURE),
        _ => Ok(ExitCode::SUCCESS),
    }
}
