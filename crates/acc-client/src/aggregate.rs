//! Hub-wide cost aggregation.
//!
//! Projects are visited one at a time. A project that fails is recorded
//! and skipped; an authentication failure stops the whole walk.

use tracing::{debug, info, instrument, warn};

use acc_core::models::{
    HubCostReport, HubExpenseReport, HubExpenseRow, Project, ProjectCostData, ProjectFailure,
};
use acc_core::{Error, HubId, ListOptions, ProjectId, Result};

use crate::session::Session;

fn failure(project: &Project, err: &Error) -> ProjectFailure {
    ProjectFailure {
        project_id: project.id.clone(),
        project_name: project.name().to_string(),
        error: err.to_string(),
    }
}

impl Session {
    /// Every expense in every project of a hub, each with its line items.
    #[instrument(skip(self), fields(hub = %hub_id))]
    pub async fn get_all_hub_expenses(&self, hub_id: &HubId) -> Result<HubExpenseReport> {
        let projects = self.get_hub_projects(hub_id).await?;
        info!(projects = projects.len(), "Collecting hub expenses");

        let mut report = HubExpenseReport::default();
        for project in &projects {
            match self.project_expense_rows(project).await {
                Ok(rows) => report.rows.extend(rows),
                Err(err) if err.requires_login() => return Err(err),
                Err(err) => {
                    warn!(project = %project.id, error = %err, "Skipping project");
                    report.failures.push(failure(project, &err));
                }
            }
        }

        info!(rows = report.rows.len(), failures = report.failures.len(), "Hub expenses collected");
        Ok(report)
    }

    async fn project_expense_rows(&self, project: &Project) -> Result<Vec<HubExpenseRow>> {
        let project_id = ProjectId::new(&project.id)?;
        let expenses = self.get_expenses(&project_id).await?;
        debug!(project = %project.id, count = expenses.len(), "Project expenses");

        let mut rows = Vec::with_capacity(expenses.len());
        for expense in expenses {
            let (items, item_error) = match self
                .get_expense_items(&project_id, &expense.id, &ListOptions::default())
                .await
            {
                Ok(items) => (items, None),
                Err(err) if err.requires_login() => return Err(err),
                Err(err) => {
                    warn!(expense = %expense.id, error = %err, "Expense items unavailable");
                    (Vec::new(), Some(err.to_string()))
                }
            };

            rows.push(HubExpenseRow {
                project_id: project.id.clone(),
                project_name: project.name().to_string(),
                expense_id: expense.id.clone(),
                expense_name: expense.display_name().to_string(),
                amount: HubExpenseRow::calculated_amount(&expense, &items),
                expense,
                items,
                item_error,
            });
        }
        Ok(rows)
    }

    /// The cost container of every project in a hub.
    #[instrument(skip(self), fields(hub = %hub_id))]
    pub async fn get_all_hub_cost_data(&self, hub_id: &HubId) -> Result<HubCostReport> {
        let projects = self.get_hub_projects(hub_id).await?;
        info!(projects = projects.len(), "Collecting hub cost data");

        let mut report = HubCostReport::default();
        for project in &projects {
            let container = match ProjectId::new(&project.id) {
                Ok(project_id) => self.get_cost_management_data(&project_id).await,
                Err(err) => Err(err),
            };

            match container {
                Ok(container) => report.projects.push(ProjectCostData {
                    project_id: project.id.clone(),
                    project_name: project.name().to_string(),
                    container,
                }),
                Err(err) if err.requires_login() => return Err(err),
                Err(err) => {
                    warn!(project = %project.id, error = %err, "Skipping project");
                    report.failures.push(failure(project, &err));
                }
            }
        }

        Ok(report)
    }
}
