//! Hub-wide aggregation results.

use serde::Serialize;

use super::cost::{CostContainer, Expense, ExpenseItem};

/// One expense, tagged with the project it came from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HubExpenseRow {
    pub project_id: String,
    pub project_name: String,
    pub expense_id: String,
    pub expense_name: String,
    /// Sum of the item totals, or the expense's own total when it has no items.
    pub amount: Option<f64>,
    pub expense: Expense,
    pub items: Vec<ExpenseItem>,
    /// Set when the items could not be fetched; the row is kept regardless.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_error: Option<String>,
}

impl HubExpenseRow {
    /// Total an expense from its items, falling back to the expense record.
    pub fn calculated_amount(expense: &Expense, items: &[ExpenseItem]) -> Option<f64> {
        let from_items: Vec<f64> = items.iter().filter_map(ExpenseItem::total_amount).collect();
        if from_items.is_empty() {
            expense.total_amount()
        } else {
            Some(from_items.iter().sum())
        }
    }
}

/// A project the aggregation could not read.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFailure {
    pub project_id: String,
    pub project_name: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HubExpenseReport {
    pub rows: Vec<HubExpenseRow>,
    pub failures: Vec<ProjectFailure>,
}

impl HubExpenseReport {
    pub fn total(&self) -> f64 {
        self.rows.iter().filter_map(|r| r.amount).sum()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCostData {
    pub project_id: String,
    pub project_name: String,
    /// `None` when cost management is not enabled for the project.
    pub container: Option<CostContainer>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HubCostReport {
    pub projects: Vec<ProjectCostData>,
    pub failures: Vec<ProjectFailure>,
}
