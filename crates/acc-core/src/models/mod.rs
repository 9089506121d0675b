//! Data transfer objects for ACC payloads.
//!
//! Response types mirror ACC JSON with every field optional, and keep any
//! keys they do not name in an `extra` map so nothing is lost when a record
//! is echoed back or printed.

mod aggregate;
mod cost;
mod data;
mod hub;
mod issues;
pub(crate) mod lenient;
mod query;

pub use aggregate::{HubCostReport, HubExpenseReport, HubExpenseRow, ProjectCostData, ProjectFailure};
pub use cost::{
    Budget, CostContainer, Expense, ExpenseItem, MainContract, NewExpense, NewExpenseItem,
    NewTimesheet, Timesheet, TimesheetPatch,
};
pub use data::{
    Attachment, DocumentHit, DocumentVersion, EntryAttributes, ExportJob, ExportRequest,
    FolderEntry, VersionAttributes,
};
pub use hub::{Extension, Hub, HubAttributes, Project, ProjectAttributes};
pub use issues::{Issue, IssuePatch, IssueSubtype, IssueType, NewIssue};
pub use query::ListOptions;
