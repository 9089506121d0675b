//! acc - command-line client for Autodesk Construction Cloud.
//!
//! A thin wrapper over `acc-client`: sign in, browse hubs and projects,
//! read and write cost records, search documents, and keep local project
//! phase notes.

mod cli;
mod commands;
mod output;
mod session;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::Cli;
use session::Context;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let ctx = Context::new(cli.client, cli.data_dir)?;
    let result = commands::handle(cli.command, &ctx).await;

    if let Err(err) = &result {
        if session::requires_login(err) {
            if let Err(e) = ctx.clear_credentials().await {
                tracing::warn!(error = %e, "Failed to clear stored credentials");
            }
            output::error("Your session has expired. Sign in again with 'acc auth login-url'.");
        }
    }

    result
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
