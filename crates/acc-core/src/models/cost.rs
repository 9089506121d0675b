//! Cost management payloads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient;
use crate::error::{Error, InvalidInputError};

/// A cost container, as returned by `GET /cost/v1/containers/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostContainer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An expense record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::amount", skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Expense {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or_else(|| self.extra.get("title").and_then(Value::as_str))
            .unwrap_or("Unnamed Expense")
    }

    /// Best-effort total, checking the alternative amount keys ACC uses.
    pub fn total_amount(&self) -> Option<f64> {
        lenient::best_amount(self.amount, &self.extra)
    }
}

/// A line item of an expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseItem {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::amount", skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount", skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "lenient::amount", skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ExpenseItem {
    pub fn total_amount(&self) -> Option<f64> {
        lenient::best_amount(self.amount, &self.extra)
    }
}

/// A budget line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::amount", skip_serializing_if = "Option::is_none")]
    pub original_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount", skip_serializing_if = "Option::is_none")]
    pub revised: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Budget {
    /// The code timesheets are booked against (`budgetCode`, else `code`).
    pub fn code(&self) -> Option<&str> {
        self.budget_code.as_deref().or(self.code.as_deref())
    }
}

/// A main (prime) contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainContract {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A timesheet booked against a budget code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timesheet {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::amount", skip_serializing_if = "Option::is_none")]
    pub input_quantity: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount", skip_serializing_if = "Option::is_none")]
    pub output_quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of a new expense. Unset fields take the defaults the ACC web
/// client submits.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub name: String,
    pub description: String,
    pub supplier_name: String,
    pub amount: String,
    pub status: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub scope: String,
    pub term: String,
    pub reference_number: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for NewExpense {
    fn default() -> Self {
        Self {
            name: "New Expense".to_string(),
            description: String::new(),
            supplier_name: String::new(),
            amount: "0.00".to_string(),
            status: "draft".to_string(),
            kind: "expense".to_string(),
            scope: "full".to_string(),
            term: "Net 30".to_string(),
            reference_number: String::new(),
            extra: Map::new(),
        }
    }
}

impl NewExpense {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = format!("{:.2}", amount);
        self
    }

    pub fn with_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier_name = supplier.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.name.trim().is_empty() {
            return Err(InvalidInputError::MissingField { field: "name" }.into());
        }
        if lenient::to_f64(&Value::String(self.amount.clone())).is_none() {
            return Err(InvalidInputError::Other {
                message: format!("amount '{}' is not a number", self.amount),
            }
            .into());
        }
        Ok(())
    }
}

/// Body of a new expense line item.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpenseItem {
    pub name: String,
    pub description: String,
    pub quantity: f64,
    pub unit_price: String,
    pub unit: String,
    pub amount: String,
    pub scope: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_id: Option<String>,
}

impl Default for NewExpenseItem {
    fn default() -> Self {
        Self {
            name: "New Expense Item".to_string(),
            description: String::new(),
            quantity: 1.0,
            unit_price: "0.00".to_string(),
            unit: "ea".to_string(),
            amount: "0.00".to_string(),
            scope: "full".to_string(),
            budget_id: None,
        }
    }
}

impl NewExpenseItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set quantity and unit price; the amount is their product.
    pub fn priced(mut self, quantity: f64, unit_price: f64) -> Self {
        self.quantity = quantity;
        self.unit_price = format!("{:.2}", unit_price);
        self.amount = format!("{:.2}", quantity * unit_price);
        self
    }
}

/// Body of a new timesheet.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTimesheet {
    pub budget_code: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub input_quantity: f64,
    pub output_quantity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewTimesheet {
    /// Check the fields a timesheet cannot be submitted without.
    pub fn validate(&self) -> Result<(), Error> {
        if self.budget_code.trim().is_empty() {
            return Err(InvalidInputError::MissingField {
                field: "budgetCode",
            }
            .into());
        }
        if self.end_date < self.start_date {
            return Err(InvalidInputError::Other {
                message: format!(
                    "end date {} is before start date {}",
                    self.end_date, self.start_date
                ),
            }
            .into());
        }
        if self.input_quantity < 0.0 || self.output_quantity < 0.0 {
            return Err(InvalidInputError::Other {
                message: "quantities must not be negative".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Partial update of a timesheet. Only set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TimesheetPatch {
    pub fn is_empty(&self) -> bool {
        self.budget_code.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.input_quantity.is_none()
            && self.output_quantity.is_none()
            && self.description.is_none()
    }
}
