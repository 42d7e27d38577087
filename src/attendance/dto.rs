use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::attendance::repo::{AttendanceRecord, AttendanceStatus};

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<Date>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub date: Option<Date>,
    pub employee_code: Option<String>,
}

/// One save action from the daily attendance sheet: every pending status
/// change keyed by employee code.
#[derive(Debug, Deserialize)]
pub struct SaveAttendanceRequest {
    pub date: Date,
    pub statuses: HashMap<String, AttendanceStatus>,
}

#[derive(Debug, Serialize)]
pub struct SaveError {
    pub employee_code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SaveReport {
    pub success: bool,
    pub date: Date,
    pub saved: usize,
    pub errors: Vec<SaveError>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Created,
    Exists,
    Error,
}

#[derive(Debug, Serialize)]
pub struct SyncOutcome {
    pub employee: String,
    pub status: SyncStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SyncReport {
    pub success: bool,
    pub date: Date,
    pub employee_count: usize,
    pub created: usize,
    pub existing: usize,
    pub results: Vec<SyncOutcome>,
}

#[derive(Debug, Serialize)]
pub struct ReconcileReport {
    pub success: bool,
    pub deleted_count: usize,
    pub deleted: Vec<AttendanceRecord>,
}
