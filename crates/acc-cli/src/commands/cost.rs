//! Cost management records.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use acc_core::ListOptions;
use acc_core::models::NewExpense;

use crate::output;
use crate::session::Context;

use super::{hub_id, project_id};

#[derive(Args, Debug)]
pub struct CostCommand {
    #[command(subcommand)]
    pub command: CostSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CostSubcommand {
    /// Resolve a project's cost container id
    Container(ProjectArgs),

    /// List a project's expenses
    Expenses(ProjectArgs),

    /// List the line items of an expense
    Items(ExpenseArgs),

    /// List a project's budgets
    Budgets(ProjectArgs),

    /// List the files attached to an expense
    Attachments(ExpenseArgs),

    /// Attach a file to an expense
    Attach(AttachArgs),

    /// Create an expense
    CreateExpense(CreateExpenseArgs),

    /// Every expense in every project of a hub, with totals
    HubExpenses(HubArgs),
}

#[derive(Args, Debug)]
pub struct ProjectArgs {
    /// Project id (b.xxxx or bare)
    pub project: String,

    /// Print raw JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ExpenseArgs {
    /// Project id (b.xxxx or bare)
    pub project: String,

    /// Expense id
    pub expense: String,

    /// Print raw JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct AttachArgs {
    /// Project id (b.xxxx or bare)
    pub project: String,

    /// Expense id
    pub expense: String,

    /// File to upload
    pub file: PathBuf,

    /// MIME type of the file
    #[arg(long, default_value = "application/octet-stream")]
    pub mime: String,
}

#[derive(Args, Debug)]
pub struct CreateExpenseArgs {
    /// Project id (b.xxxx or bare)
    pub project: String,

    /// Expense name
    #[arg(long)]
    pub name: String,

    /// Amount
    #[arg(long)]
    pub amount: Option<f64>,

    /// Supplier name
    #[arg(long)]
    pub supplier: Option<String>,

    /// Description
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args, Debug)]
pub struct HubArgs {
    /// Hub id (b.xxxx)
    pub hub: String,

    /// Print raw JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn handle(cmd: CostCommand, ctx: &Context) -> Result<()> {
    match cmd.command {
        CostSubcommand::Container(args) => container(args, ctx).await,
        CostSubcommand::Expenses(args) => expenses(args, ctx).await,
        CostSubcommand::Items(args) => items(args, ctx).await,
        CostSubcommand::Budgets(args) => budgets(args, ctx).await,
        CostSubcommand::Attachments(args) => attachments(args, ctx).await,
        CostSubcommand::Attach(args) => attach(args, ctx).await,
        CostSubcommand::CreateExpense(args) => create_expense(args, ctx).await,
        CostSubcommand::HubExpenses(args) => hub_expenses(args, ctx).await,
    }
}

async fn container(args: ProjectArgs, ctx: &Context) -> Result<()> {
    let project = project_id(&args.project)?;
    let session = ctx.session()?;

    let resolution = session
        .resolve_cost_container(&project)
        .await
        .context("Failed to resolve cost container")?;

    output::field("Container", resolution.container_id.as_str());
    output::field("Resolved by", &resolution.step.to_string());
    Ok(())
}

async fn expenses(args: ProjectArgs, ctx: &Context) -> Result<()> {
    let project = project_id(&args.project)?;
    let session = ctx.session()?;
    let expenses = session
        .get_expenses(&project)
        .await
        .context("Failed to list expenses")?;

    if args.json {
        return output::json_pretty(&expenses);
    }
    if expenses.is_empty() {
        output::note("No expenses found.");
        return Ok(());
    }

    for expense in &expenses {
        output::row(
            &expense.id,
            &format!(
                "{}  {}  {}",
                expense.display_name(),
                output::amount(expense.total_amount()),
                expense.status.as_deref().unwrap_or("-").dimmed()
            ),
        );
    }
    Ok(())
}

async fn items(args: ExpenseArgs, ctx: &Context) -> Result<()> {
    let project = project_id(&args.project)?;
    let session = ctx.session()?;
    let items = session
        .get_expense_items(&project, &args.expense, &ListOptions::default())
        .await
        .context("Failed to list expense items")?;

    if args.json {
        return output::json_pretty(&items);
    }
    for item in &items {
        output::row(
            &item.id,
            &format!(
                "{}  {}",
                item.name.as_deref().unwrap_or("-"),
                output::amount(item.total_amount())
            ),
        );
    }
    Ok(())
}

async fn budgets(args: ProjectArgs, ctx: &Context) -> Result<()> {
    let project = project_id(&args.project)?;
    let session = ctx.session()?;
    let budgets = session
        .get_budgets(&project, &ListOptions::default())
        .await
        .context("Failed to list budgets")?;

    if args.json {
        return output::json_pretty(&budgets);
    }
    for budget in &budgets {
        output::row(
            &budget.id,
            &format!(
                "{}  {}  {}",
                budget.code().unwrap_or("-"),
                budget.name.as_deref().unwrap_or("-"),
                output::amount(budget.original_amount)
            ),
        );
    }
    Ok(())
}

async fn attachments(args: ExpenseArgs, ctx: &Context) -> Result<()> {
    let project = project_id(&args.project)?;
    let session = ctx.session()?;
    let attachments = session
        .get_expense_attachments(&project, &args.expense)
        .await
        .context("Failed to list attachments")?;

    if args.json {
        return output::json_pretty(&attachments);
    }
    if attachments.is_empty() {
        output::note("No attachments.");
    }
    for attachment in &attachments {
        output::row(&attachment.id, attachment.name.as_deref().unwrap_or("-"));
    }
    Ok(())
}

async fn attach(args: AttachArgs, ctx: &Context) -> Result<()> {
    let project = project_id(&args.project)?;
    let file_name = args
        .file
        .file_name()
        .and_then(|n| n.to_str())
        .context("File path has no usable file name")?
        .to_string();
    let bytes = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let session = ctx.session()?;
    let uploaded = session
        .upload_expense_attachment(&project, &args.expense, &file_name, &args.mime, bytes)
        .await
        .context("Failed to upload attachment")?;

    output::success(&format!("Attached {}", file_name));
    for attachment in &uploaded {
        output::field("Attachment", &attachment.id);
    }
    Ok(())
}

async fn create_expense(args: CreateExpenseArgs, ctx: &Context) -> Result<()> {
    let project = project_id(&args.project)?;

    let mut expense = NewExpense::new(args.name);
    if let Some(amount) = args.amount {
        expense = expense.with_amount(amount);
    }
    if let Some(supplier) = args.supplier {
        expense = expense.with_supplier(supplier);
    }
    if let Some(description) = args.description {
        expense = expense.with_description(description);
    }

    let session = ctx.session()?;
    let created = session
        .create_expense(&project, &expense)
        .await
        .context("Failed to create expense")?;

    output::success("Expense created");
    output::field("Id", &created.id);
    output::field("Amount", &output::amount(created.total_amount()));
    Ok(())
}

async fn hub_expenses(args: HubArgs, ctx: &Context) -> Result<()> {
    let hub = hub_id(&args.hub)?;
    let session = ctx.session()?;

    session
        .resolve_region(hub.as_str())
        .await
        .context("Failed to resolve hub region")?;
    let report = session
        .get_all_hub_expenses(&hub)
        .await
        .context("Failed to collect hub expenses")?;

    if args.json {
        return output::json_pretty(&report.rows);
    }

    for row in &report.rows {
        output::row(
            &row.expense_id,
            &format!(
                "{}  {}  {}",
                row.project_name,
                row.expense_name,
                output::amount(row.amount)
            ),
        );
    }
    for failure in &report.failures {
        output::error(&format!("{}: {}", failure.project_name, failure.error));
    }
    output::field("Total", &format!("{:.2}", report.total()));
    Ok(())
}
