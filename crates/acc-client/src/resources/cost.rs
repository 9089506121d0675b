//! Cost management: containers, expenses, items, budgets, contracts,
//! timesheets and attachments.
//!
//! Every operation addresses the project's resolved cost container.

use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info, instrument};

use acc_core::models::{
    Attachment, Budget, CostContainer, Expense, ExpenseItem, MainContract, NewExpense,
    NewExpenseItem, NewTimesheet, Timesheet, TimesheetPatch,
};
use acc_core::{CostContainerId, ListOptions, ProjectId, Result};

use crate::endpoints;
use crate::http::Upload;
use crate::resource::{CollectionResource, decode, unwrap_list, unwrap_single};
use crate::session::Session;

/// Association type for attachments on expenses.
const EXPENSE_ASSOCIATION: &str = "Expense";

impl Session {
    /// The cost container id for a project.
    pub async fn get_cost_container_id(&self, project_id: &ProjectId) -> Result<CostContainerId> {
        Ok(self.resolve_cost_container(project_id).await?.container_id)
    }

    /// The project's cost container, or `None` if cost management is not
    /// enabled for it.
    #[instrument(skip(self), fields(project = %project_id))]
    pub async fn get_cost_management_data(
        &self,
        project_id: &ProjectId,
    ) -> Result<Option<CostContainer>> {
        let container = self.get_cost_container_id(project_id).await?;
        match self.get(&endpoints::cost_container(container.as_str())).await {
            Ok(body) => Ok(Some(decode(unwrap_single(body))?)),
            Err(err) if err.is_feature_unavailable() => {
                info!("Cost management not enabled");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    pub async fn has_cost_management(&self, project_id: &ProjectId) -> Result<bool> {
        Ok(self.get_cost_management_data(project_id).await?.is_some())
    }

    // ------------------------------------------------------------------------
    // Expenses
    // ------------------------------------------------------------------------

    pub async fn expenses(&self, project_id: &ProjectId) -> Result<CollectionResource<'_, Expense>> {
        let container = self.get_cost_container_id(project_id).await?;
        Ok(CollectionResource::new(self, endpoints::expenses(container.as_str())))
    }

    /// Expenses of a project. A project without cost management has none.
    #[instrument(skip(self), fields(project = %project_id))]
    pub async fn get_expenses(&self, project_id: &ProjectId) -> Result<Vec<Expense>> {
        match self.expenses(project_id).await?.list(&ListOptions::default()).await {
            Ok(expenses) => {
                debug!(count = expenses.len(), "Expenses listed");
                Ok(expenses)
            }
            Err(err) if err.is_feature_unavailable() => {
                info!(error = %err, "Cost management not enabled, no expenses");
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }

    #[instrument(skip(self, expense), fields(project = %project_id))]
    pub async fn create_expense(&self, project_id: &ProjectId, expense: &NewExpense) -> Result<Expense> {
        expense.validate()?;
        let created = self.expenses(project_id).await?.create(expense).await?;
        info!(expense = %created.id, "Expense created");
        Ok(created)
    }

    pub async fn get_expense(
        &self,
        project_id: &ProjectId,
        expense_id: &str,
        include: &[&str],
    ) -> Result<Expense> {
        let options = ListOptions::new().include(include.iter().copied());
        self.expenses(project_id).await?.get(expense_id, &options).await
    }

    pub async fn update_expense(
        &self,
        project_id: &ProjectId,
        expense_id: &str,
        changes: &Value,
    ) -> Result<Expense> {
        self.expenses(project_id).await?.update(expense_id, changes).await
    }

    pub async fn delete_expense(&self, project_id: &ProjectId, expense_id: &str) -> Result<()> {
        self.expenses(project_id).await?.delete(expense_id).await
    }

    // ------------------------------------------------------------------------
    // Expense items
    // ------------------------------------------------------------------------

    pub async fn expense_items(
        &self,
        project_id: &ProjectId,
        expense_id: &str,
    ) -> Result<CollectionResource<'_, ExpenseItem>> {
        let container = self.get_cost_container_id(project_id).await?;
        Ok(CollectionResource::new(
            self,
            endpoints::expense_items(container.as_str(), &endpoints::enc(expense_id)),
        ))
    }

    pub async fn get_expense_items(
        &self,
        project_id: &ProjectId,
        expense_id: &str,
        options: &ListOptions,
    ) -> Result<Vec<ExpenseItem>> {
        self.expense_items(project_id, expense_id).await?.list(options).await
    }

    pub async fn create_expense_item(
        &self,
        project_id: &ProjectId,
        expense_id: &str,
        item: &NewExpenseItem,
    ) -> Result<ExpenseItem> {
        self.expense_items(project_id, expense_id).await?.create(item).await
    }

    pub async fn get_expense_item(
        &self,
        project_id: &ProjectId,
        expense_id: &str,
        item_id: &str,
        include: &[&str],
    ) -> Result<ExpenseItem> {
        let options = ListOptions::new().include(include.iter().copied());
        self.expense_items(project_id, expense_id)
            .await?
            .get(item_id, &options)
            .await
    }

    pub async fn update_expense_item(
        &self,
        project_id: &ProjectId,
        expense_id: &str,
        item_id: &str,
        changes: &Value,
    ) -> Result<ExpenseItem> {
        self.expense_items(project_id, expense_id)
            .await?
            .update(item_id, changes)
            .await
    }

    pub async fn delete_expense_item(
        &self,
        project_id: &ProjectId,
        expense_id: &str,
        item_id: &str,
    ) -> Result<()> {
        self.expense_items(project_id, expense_id)
            .await?
            .delete(item_id)
            .await
    }

    // ------------------------------------------------------------------------
    // Budgets and main contracts
    // ------------------------------------------------------------------------

    pub async fn get_budgets(&self, project_id: &ProjectId, options: &ListOptions) -> Result<Vec<Budget>> {
        let container = self.get_cost_container_id(project_id).await?;
        CollectionResource::<Budget>::new(self, endpoints::budgets(container.as_str()))
            .list(options)
            .await
    }

    pub async fn get_budget(
        &self,
        project_id: &ProjectId,
        budget_id: &str,
        include: &[&str],
    ) -> Result<Budget> {
        let container = self.get_cost_container_id(project_id).await?;
        let options = ListOptions::new().include(include.iter().copied());
        CollectionResource::<Budget>::new(self, endpoints::budgets(container.as_str()))
            .get(budget_id, &options)
            .await
    }

    pub async fn get_main_contracts(
        &self,
        project_id: &ProjectId,
        options: &ListOptions,
    ) -> Result<Vec<MainContract>> {
        let container = self.get_cost_container_id(project_id).await?;
        CollectionResource::<MainContract>::new(self, endpoints::main_contracts(container.as_str()))
            .list(options)
            .await
    }

    pub async fn get_main_contract(
        &self,
        project_id: &ProjectId,
        contract_id: &str,
        include: &[&str],
    ) -> Result<MainContract> {
        let container = self.get_cost_container_id(project_id).await?;
        let options = ListOptions::new().include(include.iter().copied());
        CollectionResource::<MainContract>::new(self, endpoints::main_contracts(container.as_str()))
            .get(contract_id, &options)
            .await
    }

    // ------------------------------------------------------------------------
    // Timesheets
    // ------------------------------------------------------------------------

    async fn time_sheets(&self, project_id: &ProjectId) -> Result<CollectionResource<'_, Timesheet>> {
        let container = self.get_cost_container_id(project_id).await?;
        Ok(CollectionResource::new(self, endpoints::time_sheets(container.as_str())))
    }

    pub async fn get_timesheets(&self, project_id: &ProjectId) -> Result<Vec<Timesheet>> {
        self.time_sheets(project_id)
            .await?
            .list(&ListOptions::default())
            .await
    }

    #[instrument(skip(self, timesheet), fields(project = %project_id))]
    pub async fn create_timesheet(
        &self,
        project_id: &ProjectId,
        timesheet: &NewTimesheet,
    ) -> Result<Timesheet> {
        timesheet.validate()?;
        self.time_sheets(project_id).await?.create(timesheet).await
    }

    #[instrument(skip(self, patch), fields(project = %project_id))]
    pub async fn update_timesheet(
        &self,
        project_id: &ProjectId,
        timesheet_id: &str,
        patch: &TimesheetPatch,
    ) -> Result<Timesheet> {
        if patch.is_empty() {
            return Err(acc_core::InvalidInputError::Other {
                message: "nothing to update".to_string(),
            }
            .into());
        }
        self.time_sheets(project_id)
            .await?
            .update(timesheet_id, patch)
            .await
    }

    #[instrument(skip(self), fields(project = %project_id))]
    pub async fn delete_timesheet(&self, project_id: &ProjectId, timesheet_id: &str) -> Result<()> {
        self.time_sheets(project_id).await?.delete(timesheet_id).await
    }

    // ------------------------------------------------------------------------
    // Attachments
    // ------------------------------------------------------------------------

    /// Files attached to an expense.
    pub async fn get_expense_attachments(
        &self,
        project_id: &ProjectId,
        expense_id: &str,
    ) -> Result<Vec<Attachment>> {
        let container = self.get_cost_container_id(project_id).await?;
        let options = ListOptions::new()
            .filter("associationType", [EXPENSE_ASSOCIATION])
            .filter("associationId", [expense_id]);
        CollectionResource::<Attachment>::new(self, endpoints::attachments(container.as_str()))
            .list(&options)
            .await
    }

    /// Attach a file to an expense.
    #[instrument(skip(self, file_name, bytes), fields(project = %project_id, len = bytes.len()))]
    pub async fn upload_expense_attachment(
        &self,
        project_id: &ProjectId,
        expense_id: &str,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<Vec<Attachment>> {
        let container = self.get_cost_container_id(project_id).await?;
        let upload = Upload::new("file", file_name, bytes)
            .mime(mime)
            .text("associationType", EXPENSE_ASSOCIATION)
            .text("associationId", expense_id);

        let body = self
            .upload(Method::POST, &endpoints::attachments(container.as_str()), &upload)
            .await?;
        info!(expense = expense_id, "Attachment uploaded");

        if body.get("id").is_some() {
            return Ok(vec![decode(body)?]);
        }
        unwrap_list(body).into_iter().map(decode).collect()
    }
}
