use time::Date;
use tracing::{info, warn};

use crate::{
    attendance::dto::{
        ReconcileReport, SaveAttendanceRequest, SaveError, SaveReport, SyncOutcome, SyncReport,
        SyncStatus,
    },
    attendance::repo,
    employees::repo::Employee,
    error::AppError,
    payroll,
    state::AppState,
};

/// Ensure every coded employee has a row for the date, defaulting new rows to
/// `absent`. Existing rows are left untouched, so a second run creates
/// nothing. Employees without a code cannot have attendance and are excluded.
pub async fn sync_day(state: &AppState, date: Date) -> Result<SyncReport, AppError> {
    let employees = Employee::list_coded(&state.db).await?;

    let mut results = Vec::with_capacity(employees.len());
    let mut created = 0usize;
    let mut existing = 0usize;

    for emp in &employees {
        let Some(code) = emp.code.as_deref() else {
            continue;
        };
        match repo::insert_absent_if_missing(&state.db, code, date).await {
            Ok(true) => {
                created += 1;
                results.push(SyncOutcome {
                    employee: emp.name.clone(),
                    status: SyncStatus::Created,
                    message: None,
                });
            }
            Ok(false) => {
                existing += 1;
                results.push(SyncOutcome {
                    employee: emp.name.clone(),
                    status: SyncStatus::Exists,
                    message: None,
                });
            }
            Err(e) => {
                warn!(employee = %emp.name, error = %e, "attendance sync failed");
                results.push(SyncOutcome {
                    employee: emp.name.clone(),
                    status: SyncStatus::Error,
                    message: Some(e.to_string()),
                });
            }
        }
    }

    info!(%date, created, existing, "attendance synced");
    Ok(SyncReport {
        success: true,
        date,
        employee_count: employees.len(),
        created,
        existing,
        results,
    })
}

/// Purge attendance rows referencing no current employee code. Destructive:
/// the deleted rows are returned to the caller but not kept anywhere.
pub async fn reconcile_orphans(state: &AppState) -> Result<ReconcileReport, AppError> {
    let valid_codes = Employee::list_codes(&state.db).await?;
    let deleted = repo::delete_orphans(&state.db, &valid_codes).await?;

    if !deleted.is_empty() {
        info!(count = deleted.len(), "orphaned attendance rows deleted");
    }
    Ok(ReconcileReport {
        success: true,
        deleted_count: deleted.len(),
        deleted,
    })
}

/// Persist one day's worth of status changes, then refresh payroll for the
/// month containing the date. A payroll failure is logged, not surfaced: the
/// attendance rows are already saved.
pub async fn save_for_date(
    state: &AppState,
    req: SaveAttendanceRequest,
) -> Result<SaveReport, AppError> {
    let mut saved = 0usize;
    let mut errors = Vec::new();

    for (code, status) in &req.statuses {
        let code = code.trim();
        if code.is_empty() {
            continue;
        }
        match repo::upsert_status(&state.db, code, req.date, *status).await {
            Ok(()) => saved += 1,
            Err(e) => {
                warn!(employee_code = %code, error = %e, "attendance save failed");
                errors.push(SaveError {
                    employee_code: code.to_string(),
                    message: e.to_string(),
                });
            }
        }
    }

    let month = u8::from(req.date.month());
    let year = req.date.year();
    if let Err(e) = payroll::services::calculate_month(state, Some(month), Some(year)).await {
        warn!(month, year, error = %e, "automatic payroll recalculation failed");
    }

    info!(date = %req.date, saved, failed = errors.len(), "attendance saved");
    Ok(SaveReport {
        success: true,
        date: req.date,
        saved,
        errors,
    })
}
