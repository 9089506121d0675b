//! Local project phase tracking. These commands never touch the network.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use colored::Colorize;

use acc_store::PhaseEntry;

use crate::output;
use crate::session::Context;

#[derive(Args, Debug)]
pub struct PhaseCommand {
    #[command(subcommand)]
    pub command: PhaseSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PhaseSubcommand {
    /// Show a project's current phase
    Get(ProjectArg),

    /// Set a project's current phase
    Set(SetArgs),

    /// Record a dated phase without changing the current one
    Add(AddArgs),

    /// Show the current phase and history, most recent first
    History(ProjectArg),

    /// Remove a history entry by index
    Remove(RemoveArgs),

    /// List the available phase names
    Options,

    /// Write every project's phases as JSON
    Export(ExportArgs),

    /// Merge phases from an export file
    Import(ImportArgs),

    /// Remove all phase data
    Clear,
}

#[derive(Args, Debug)]
pub struct ProjectArg {
    /// Project id
    pub project: String,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Project id
    pub project: String,

    /// Phase name
    pub phase: String,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Project id
    pub project: String,

    /// Phase name
    pub phase: String,

    /// Date the phase started (YYYY-MM-DD); defaults to now
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Project id
    pub project: String,

    /// Index in stored history order (oldest first, from 0)
    pub index: usize,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Write to a file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Export file to read
    pub file: PathBuf,
}

pub fn handle(cmd: PhaseCommand, ctx: &Context) -> Result<()> {
    let store = ctx.phases()?;

    match cmd.command {
        PhaseSubcommand::Get(args) => {
            let phase = store.project_phase(&args.project)?;
            println!("{}", phase);
        }
        PhaseSubcommand::Set(args) => {
            store
                .set_project_phase(&args.project, &args.phase)
                .context("Failed to set phase")?;
            output::success(&format!("{} is now in {}", args.project, args.phase));
        }
        PhaseSubcommand::Add(args) => {
            let entry = match args.date {
                Some(date) => PhaseEntry::on_date(&args.phase, date),
                None => PhaseEntry::now(&args.phase),
            };
            let date = entry.date_set;
            store
                .add_phase_with_date(&args.project, entry)
                .context("Failed to add phase")?;
            output::success(&format!("Recorded {} from {}", args.phase, date));
        }
        PhaseSubcommand::History(args) => {
            let records = store.all_project_phases(&args.project)?;
            if records.is_empty() {
                output::note("No phases recorded.");
            }
            for record in &records {
                let marker = if record.is_current {
                    "current".green().to_string()
                } else {
                    String::new()
                };
                println!("{}  {}  {}", record.date_set, record.phase, marker);
            }
        }
        PhaseSubcommand::Remove(args) => {
            if store.remove_phase_by_index(&args.project, args.index)? {
                output::success(&format!("Removed entry {}", args.index));
            } else {
                output::note("No such entry.");
            }
        }
        PhaseSubcommand::Options => {
            for phase in store.available_phases() {
                println!("{}", phase);
            }
        }
        PhaseSubcommand::Export(args) => {
            let export = store.export()?;
            match args.output {
                Some(path) => {
                    let json = serde_json::to_string_pretty(&export)?;
                    std::fs::write(&path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    output::success(&format!(
                        "Exported {} projects to {}",
                        export.projects.len(),
                        path.display()
                    ));
                }
                None => output::json_pretty(&export)?,
            }
        }
        PhaseSubcommand::Import(args) => {
            let json = std::fs::read_to_string(&args.file)
                .with_context(|| format!("Failed to read {}", args.file.display()))?;
            let data: serde_json::Value =
                serde_json::from_str(&json).context("Import file is not valid JSON")?;
            let count = store.import(&data).context("Failed to import phases")?;
            output::success(&format!("Imported {} projects", count));
        }
        PhaseSubcommand::Clear => {
            store.clear_all()?;
            output::success("All phase data cleared");
        }
    }

    Ok(())
}
