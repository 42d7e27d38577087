use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::{
    employees::dto::{AssignOutcome, AssignReport, AssignStatus, CreateEmployeeRequest, UpdateEmployeeRequest},
    employees::repo::Employee,
    error::{is_unique_violation, AppError},
    state::AppState,
};

/// Width of the numeric suffix in generated codes (SPX001, SPX002, ...).
const CODE_PAD_WIDTH: usize = 3;

/// Two writers can compute the same "next" code; the unique constraint fails
/// the loser, which recomputes from fresh state this many times before
/// giving up.
const MAX_CODE_ATTEMPTS: usize = 3;

/// Numeric suffix of a code carrying the expected prefix. Codes with a
/// different prefix or a non-numeric tail do not participate in sequencing.
pub fn code_number(code: &str, prefix: &str) -> Option<u32> {
    let digits = code.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

pub fn format_code(prefix: &str, n: u32) -> String {
    format!("{prefix}{n:0width$}", width = CODE_PAD_WIDTH)
}

/// Next code in the sequence: max participating suffix + 1. Gaps are never
/// back-filled.
pub fn next_code(existing: &[String], prefix: &str) -> String {
    let max = existing
        .iter()
        .filter_map(|c| code_number(c, prefix))
        .max()
        .unwrap_or(0);
    format_code(prefix, max + 1)
}

fn validate_name(name: &str) -> Result<String, AppError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("employee name is required".into()));
    }
    Ok(trimmed.to_string())
}

fn validate_wage(wage: Decimal) -> Result<(), AppError> {
    if wage <= Decimal::ZERO {
        return Err(AppError::Validation("daily wage must be positive".into()));
    }
    Ok(())
}

pub async fn create_employee(
    state: &AppState,
    req: CreateEmployeeRequest,
) -> Result<Employee, AppError> {
    let name = validate_name(&req.name)?;
    validate_wage(req.daily_wage)?;

    let explicit = req.code.as_deref().map(str::trim).filter(|c| !c.is_empty());
    if let Some(code) = explicit {
        return match Employee::insert(&state.db, Some(code), &name, req.daily_wage).await {
            Ok(emp) => Ok(emp),
            Err(e) if is_unique_violation(&e) => Err(AppError::Conflict(format!(
                "employee code {code} already in use"
            ))),
            Err(e) => Err(e.into()),
        };
    }

    let prefix = &state.config.employee_code_prefix;
    for _ in 0..MAX_CODE_ATTEMPTS {
        let codes = Employee::list_codes(&state.db).await?;
        let code = next_code(&codes, prefix);
        match Employee::insert(&state.db, Some(&code), &name, req.daily_wage).await {
            Ok(emp) => {
                info!(code = %code, name = %name, "employee created");
                return Ok(emp);
            }
            Err(e) if is_unique_violation(&e) => {
                warn!(code = %code, "generated code taken, recomputing");
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(AppError::Conflict(
        "could not allocate a unique employee code".into(),
    ))
}

pub async fn update_employee(
    state: &AppState,
    id: uuid::Uuid,
    req: UpdateEmployeeRequest,
) -> Result<Employee, AppError> {
    let name = match req.name.as_deref() {
        Some(n) => Some(validate_name(n)?),
        None => None,
    };
    if let Some(wage) = req.daily_wage {
        validate_wage(wage)?;
    }
    let code = req.code.as_deref().map(str::trim).filter(|c| !c.is_empty());

    match Employee::update(&state.db, id, code, name.as_deref(), req.daily_wage).await {
        Ok(Some(emp)) => Ok(emp),
        Ok(None) => Err(AppError::NotFound(format!("employee {id} not found"))),
        Err(e) if is_unique_violation(&e) => Err(AppError::Conflict(
            "employee code already in use".into(),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Backfill: assign the next sequential codes to every employee missing one.
/// Per-employee failures are recorded and the batch continues.
pub async fn assign_missing_codes(state: &AppState) -> Result<AssignReport, AppError> {
    let missing = Employee::list_missing_code(&state.db).await?;
    if missing.is_empty() {
        return Ok(AssignReport {
            success: true,
            assigned_count: 0,
            results: Vec::new(),
        });
    }

    let prefix = &state.config.employee_code_prefix;
    let codes = Employee::list_codes(&state.db).await?;
    let mut next = codes
        .iter()
        .filter_map(|c| code_number(c, prefix))
        .max()
        .unwrap_or(0)
        + 1;

    let mut results = Vec::with_capacity(missing.len());
    let mut assigned = 0usize;

    for emp in missing {
        let mut attempts = 0usize;
        loop {
            let code = format_code(prefix, next);
            match Employee::set_code(&state.db, emp.id, &code).await {
                Ok(_) => {
                    info!(employee = %emp.name, code = %code, "code assigned");
                    results.push(AssignOutcome {
                        employee: emp.name.clone(),
                        status: AssignStatus::Updated,
                        code: Some(code),
                        message: None,
                    });
                    assigned += 1;
                    next += 1;
                    break;
                }
                Err(e) if is_unique_violation(&e) && attempts < MAX_CODE_ATTEMPTS => {
                    attempts += 1;
                    warn!(code = %code, "code taken concurrently, recomputing");
                    let fresh = Employee::list_codes(&state.db).await?;
                    next = fresh
                        .iter()
                        .filter_map(|c| code_number(c, prefix))
                        .max()
                        .unwrap_or(0)
                        + 1;
                }
                Err(e) => {
                    warn!(employee = %emp.name, error = %e, "code assignment failed");
                    results.push(AssignOutcome {
                        employee: emp.name.clone(),
                        status: AssignStatus::Error,
                        code: None,
                        message: Some(e.to_string()),
                    });
                    break;
                }
            }
        }
    }

    Ok(AssignReport {
        success: true,
        assigned_count: assigned,
        results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn first_code_starts_the_sequence() {
        assert_eq!(next_code(&[], "SPX"), "SPX001");
    }

    #[test]
    fn next_code_continues_from_max_not_count() {
        // A gap at SPX002 is not refilled.
        assert_eq!(next_code(&codes(&["SPX001", "SPX003"]), "SPX"), "SPX004");
    }

    #[test]
    fn foreign_and_malformed_codes_do_not_participate() {
        let existing = codes(&["SPX002", "TMP999", "SPXabc", "SPX", "007"]);
        assert_eq!(next_code(&existing, "SPX"), "SPX003");
    }

    #[test]
    fn sequence_grows_past_the_pad_width() {
        assert_eq!(next_code(&codes(&["SPX999"]), "SPX"), "SPX1000");
    }

    #[test]
    fn prefix_is_configurable() {
        assert_eq!(next_code(&codes(&["ACM041"]), "ACM"), "ACM042");
        assert_eq!(next_code(&codes(&["ACM041"]), "SPX"), "SPX001");
    }

    #[test]
    fn code_number_parses_only_exact_shape() {
        assert_eq!(code_number("SPX010", "SPX"), Some(10));
        assert_eq!(code_number("SPX07x", "SPX"), None);
        assert_eq!(code_number("spx007", "SPX"), None);
        assert_eq!(code_number("SPX", "SPX"), None);
    }

    #[test]
    fn name_must_be_non_empty() {
        assert!(validate_name("  ").is_err());
        assert_eq!(validate_name(" Asha ").unwrap(), "Asha");
    }

    #[test]
    fn wage_must_be_positive() {
        use rust_decimal_macros::dec;
        assert!(validate_wage(dec!(0)).is_err());
        assert!(validate_wage(dec!(-10)).is_err());
        assert!(validate_wage(dec!(500)).is_ok());
        assert!(validate_wage(dec!(0.01)).is_ok());
    }
}
