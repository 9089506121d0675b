//! Cost management timesheets.

use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};

use acc_core::models::{NewTimesheet, TimesheetPatch};

use crate::output;
use crate::session::Context;

use super::project_id;

#[derive(Args, Debug)]
pub struct TimesheetsCommand {
    #[command(subcommand)]
    pub command: TimesheetsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum TimesheetsSubcommand {
    /// List a project's timesheets
    List(ListArgs),

    /// Book a timesheet against a budget code
    Create(CreateArgs),

    /// Change fields of a timesheet
    Update(UpdateArgs),

    /// Delete a timesheet
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Project id (b.xxxx or bare)
    pub project: String,

    /// Print raw JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Project id (b.xxxx or bare)
    pub project: String,

    /// Budget code to book against
    #[arg(long)]
    pub budget_code: String,

    /// First day (YYYY-MM-DD)
    #[arg(long)]
    pub start: NaiveDate,

    /// Last day (YYYY-MM-DD)
    #[arg(long)]
    pub end: NaiveDate,

    /// Input quantity (hours)
    #[arg(long, default_value_t = 0.0)]
    pub input: f64,

    /// Output quantity
    #[arg(long, default_value_t = 0.0)]
    pub output: f64,

    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Project id (b.xxxx or bare)
    pub project: String,

    /// Timesheet id
    pub id: String,

    #[arg(long)]
    pub budget_code: Option<String>,

    #[arg(long)]
    pub start: Option<NaiveDate>,

    #[arg(long)]
    pub end: Option<NaiveDate>,

    #[arg(long)]
    pub input: Option<f64>,

    #[arg(long)]
    pub output: Option<f64>,

    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Project id (b.xxxx or bare)
    pub project: String,

    /// Timesheet id
    pub id: String,
}

pub async fn handle(cmd: TimesheetsCommand, ctx: &Context) -> Result<()> {
    match cmd.command {
        TimesheetsSubcommand::List(args) => list(args, ctx).await,
        TimesheetsSubcommand::Create(args) => create(args, ctx).await,
        TimesheetsSubcommand::Update(args) => update(args, ctx).await,
        TimesheetsSubcommand::Delete(args) => delete(args, ctx).await,
    }
}

async fn list(args: ListArgs, ctx: &Context) -> Result<()> {
    let project = project_id(&args.project)?;
    let session = ctx.session()?;
    let timesheets = session
        .get_timesheets(&project)
        .await
        .context("Failed to list timesheets")?;

    if args.json {
        return output::json_pretty(&timesheets);
    }
    if timesheets.is_empty() {
        output::note("No timesheets found.");
        return Ok(());
    }

    for sheet in &timesheets {
        output::row(
            &sheet.id,
            &format!(
                "{}  {} .. {}  in {}  out {}",
                sheet.budget_code.as_deref().unwrap_or("-"),
                sheet.start_date.as_deref().unwrap_or("?"),
                sheet.end_date.as_deref().unwrap_or("?"),
                output::amount(sheet.input_quantity),
                output::amount(sheet.output_quantity)
            ),
        );
    }
    Ok(())
}

async fn create(args: CreateArgs, ctx: &Context) -> Result<()> {
    let project = project_id(&args.project)?;
    let timesheet = NewTimesheet {
        budget_code: args.budget_code,
        start_date: args.start,
        end_date: args.end,
        input_quantity: args.input,
        output_quantity: args.output,
        description: args.description,
    };

    let session = ctx.session()?;
    let created = session
        .create_timesheet(&project, &timesheet)
        .await
        .context("Failed to create timesheet")?;

    output::success("Timesheet created");
    output::field("Id", &created.id);
    Ok(())
}

async fn update(args: UpdateArgs, ctx: &Context) -> Result<()> {
    let project = project_id(&args.project)?;
    let patch = TimesheetPatch {
        budget_code: args.budget_code,
        start_date: args.start,
        end_date: args.end,
        input_quantity: args.input,
        output_quantity: args.output,
        description: args.description,
    };

    let session = ctx.session()?;
    session
        .update_timesheet(&project, &args.id, &patch)
        .await
        .context("Failed to update timesheet")?;

    output::success(&format!("Timesheet {} updated", args.id));
    Ok(())
}

async fn delete(args: DeleteArgs, ctx: &Context) -> Result<()> {
    let project = project_id(&args.project)?;
    let session = ctx.session()?;
    session
        .delete_timesheet(&project, &args.id)
        .await
        .context("Failed to delete timesheet")?;

    output::success(&format!("Timesheet {} deleted", args.id));
    Ok(())
}
