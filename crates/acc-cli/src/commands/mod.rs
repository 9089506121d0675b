//! Subcommand implementations, one module per command group.

pub mod auth;
pub mod cost;
pub mod docs;
pub mod hubs;
pub mod phase;
pub mod timesheets;

use anyhow::{Context as _, Result};

use acc_core::{HubId, ProjectId};

use crate::cli::Commands;
use crate::session::Context;

pub async fn handle(cmd: Commands, ctx: &Context) -> Result<()> {
    match cmd {
        Commands::Auth(cmd) => auth::handle(cmd, ctx).await,
        Commands::Hubs(cmd) => hubs::handle(cmd, ctx).await,
        Commands::Cost(cmd) => cost::handle(cmd, ctx).await,
        Commands::Timesheets(cmd) => timesheets::handle(cmd, ctx).await,
        Commands::Docs(cmd) => docs::handle(cmd, ctx).await,
        Commands::Phase(cmd) => phase::handle(cmd, ctx),
    }
}

fn hub_id(raw: &str) -> Result<HubId> {
    HubId::new(raw).context("Invalid hub id")
}

fn project_id(raw: &str) -> Result<ProjectId> {
    ProjectId::new(raw).context("Invalid project id")
}
