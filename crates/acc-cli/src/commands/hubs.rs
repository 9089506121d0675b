//! Hubs, projects and regions.

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};

use crate::output;
use crate::session::Context;

use super::hub_id;

#[derive(Args, Debug)]
pub struct HubsCommand {
    #[command(subcommand)]
    pub command: HubsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum HubsSubcommand {
    /// List the hubs you can access
    List(ListArgs),

    /// List a hub's projects with their local phase
    Projects(ProjectsArgs),

    /// Determine which region serves a hub
    Region(RegionArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print raw JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ProjectsArgs {
    /// Hub id (b.xxxx)
    pub hub: String,

    /// Print raw JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct RegionArgs {
    /// Hub id (b.xxxx)
    pub hub: String,

    /// Query every region instead of inferring from hub details
    #[arg(long)]
    pub probe: bool,
}

pub async fn handle(cmd: HubsCommand, ctx: &Context) -> Result<()> {
    match cmd.command {
        HubsSubcommand::List(args) => list(args, ctx).await,
        HubsSubcommand::Projects(args) => projects(args, ctx).await,
        HubsSubcommand::Region(args) => region(args, ctx).await,
    }
}

async fn list(args: ListArgs, ctx: &Context) -> Result<()> {
    let session = ctx.session()?;
    let hubs = session.get_hubs().await.context("Failed to list hubs")?;

    if args.json {
        return output::json_pretty(&hubs);
    }
    if hubs.is_empty() {
        output::note("No hubs found.");
        return Ok(());
    }

    for hub in &hubs {
        let region = hub.region().map(|r| r.to_string()).unwrap_or_default();
        output::row(&hub.id, &format!("{}  {} {}", hub.name(), hub.hub_type(), region));
    }
    Ok(())
}

async fn projects(args: ProjectsArgs, ctx: &Context) -> Result<()> {
    let hub = hub_id(&args.hub)?;
    let session = ctx.session()?;

    session
        .resolve_region(hub.as_str())
        .await
        .context("Failed to resolve hub region")?;
    let projects = session
        .get_projects(&hub)
        .await
        .context("Failed to list projects")?;

    if args.json {
        return output::json_pretty(&projects);
    }
    if projects.is_empty() {
        output::note("No projects found.");
        return Ok(());
    }

    let phases = ctx
        .phases()?
        .multiple_project_phases(projects.iter().map(|p| p.id.as_str()))
        .context("Failed to read project phases")?;
    for project in &projects {
        let phase = phases.get(&project.id).map(String::as_str).unwrap_or_default();
        output::row(&project.id, &format!("{}  [{}]", project.name(), phase));
    }
    output::note(&format!("Region: {}", session.region()));
    Ok(())
}

async fn region(args: RegionArgs, ctx: &Context) -> Result<()> {
    let session = ctx.session()?;

    if args.probe {
        let found = session
            .probe_regions(&args.hub)
            .await
            .context("Failed to probe regions")?;
        match found {
            Some(region) => output::field("Region", region.as_str()),
            None => output::note("No region answered for this hub."),
        }
        return Ok(());
    }

    let decision = session
        .resolve_region(&args.hub)
        .await
        .context("Failed to resolve region")?;
    output::field("Region", decision.region.as_str());
    output::field("Source", &decision.source.to_string());
    Ok(())
}
