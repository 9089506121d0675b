//! Document search and downloads.

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};

use crate::output;
use crate::session::Context;

use super::{hub_id, project_id};

#[derive(Args, Debug)]
pub struct DocsCommand {
    #[command(subcommand)]
    pub command: DocsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum DocsSubcommand {
    /// Find documents by name in every folder of a project
    Search(SearchArgs),

    /// List the versions of a document
    Versions(VersionsArgs),

    /// Print a signed download URL for a document version
    DownloadUrl(DownloadArgs),
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Hub id (b.xxxx)
    pub hub: String,

    /// Project id (b.xxxx or bare)
    pub project: String,

    /// Case-insensitive name fragment
    pub term: String,

    /// Print raw JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct VersionsArgs {
    /// Project id (b.xxxx or bare)
    pub project: String,

    /// Item (document) id
    pub item: String,

    /// Print raw JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Project id (b.xxxx or bare)
    pub project: String,

    /// Version id
    pub version: String,
}

pub async fn handle(cmd: DocsCommand, ctx: &Context) -> Result<()> {
    match cmd.command {
        DocsSubcommand::Search(args) => search(args, ctx).await,
        DocsSubcommand::Versions(args) => versions(args, ctx).await,
        DocsSubcommand::DownloadUrl(args) => download_url(args, ctx).await,
    }
}

async fn search(args: SearchArgs, ctx: &Context) -> Result<()> {
    let hub = hub_id(&args.hub)?;
    let project = project_id(&args.project)?;
    let session = ctx.session()?;

    session
        .resolve_region(hub.as_str())
        .await
        .context("Failed to resolve hub region")?;
    let hits = session
        .search_documents(&hub, &project, &args.term)
        .await
        .context("Search failed")?;

    if args.json {
        return output::json_pretty(&hits);
    }
    if hits.is_empty() {
        output::note(&format!("No documents match '{}'.", args.term));
        return Ok(());
    }

    for hit in &hits {
        output::row(&hit.entry.id, &hit.path_string());
    }
    Ok(())
}

async fn versions(args: VersionsArgs, ctx: &Context) -> Result<()> {
    let project = project_id(&args.project)?;
    let session = ctx.session()?;
    let versions = session
        .get_document_versions(&project, &args.item)
        .await
        .context("Failed to list versions")?;

    if args.json {
        return output::json_pretty(&versions);
    }
    for version in &versions {
        let number = version
            .attributes
            .version_number
            .map(|n| format!("v{}", n))
            .unwrap_or_else(|| "v?".to_string());
        let name = version
            .attributes
            .display_name
            .as_deref()
            .or(version.attributes.name.as_deref())
            .unwrap_or("-");
        output::row(&version.id, &format!("{}  {}", number, name));
    }
    Ok(())
}

async fn download_url(args: DownloadArgs, ctx: &Context) -> Result<()> {
    let project = project_id(&args.project)?;
    let session = ctx.session()?;
    let url = session
        .get_document_download_url(&project, &args.version)
        .await
        .context("Failed to get download URL")?
        .context("The service returned no download URL for this version")?;

    println!("{}", url);
    Ok(())
}
