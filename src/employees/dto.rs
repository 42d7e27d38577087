use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateEmployeeRequest {
    /// Optional explicit code; generated from the configured prefix when absent.
    pub code: Option<String>,
    pub name: String,
    pub daily_wage: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEmployeeRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub daily_wage: Option<Decimal>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssignStatus {
    Updated,
    Error,
}

#[derive(Debug, Serialize)]
pub struct AssignOutcome {
    pub employee: String,
    pub status: AssignStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AssignReport {
    pub success: bool,
    pub assigned_count: usize,
    pub results: Vec<AssignOutcome>,
}
