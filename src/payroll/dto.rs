use serde::{Deserialize, Serialize};

use crate::payroll::repo::NewPayroll;

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub month: Option<u8>,
    pub year: Option<i32>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CalcStatus {
    Skipped,
    Inserted,
    Updated,
    Error,
}

#[derive(Debug, Serialize)]
pub struct EmployeeResult {
    pub employee: String,
    pub status: CalcStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<NewPayroll>,
}

#[derive(Debug, Serialize)]
pub struct CalculateReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub month: u8,
    pub year: i32,
    pub employee_count: usize,
    pub results: Vec<EmployeeResult>,
}
