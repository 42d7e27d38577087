use std::collections::HashMap;

use rust_decimal::Decimal;
use time::{Date, Month, OffsetDateTime};
use tracing::{info, warn};

use crate::{
    attendance::repo::{AttendanceRecord, AttendanceStatus},
    employees::repo::Employee,
    error::AppError,
    payroll::dto::{CalcStatus, CalculateReport, EmployeeResult},
    payroll::repo::{self, NewPayroll},
    state::AppState,
};

/// First and last calendar day of a month. Month and year are validated here
/// rather than silently producing an empty window.
pub fn month_window(year: i32, month: u8) -> Result<(Date, Date), AppError> {
    if !(1..=9999).contains(&year) {
        return Err(AppError::Validation(format!("year {year} out of range")));
    }
    let m = Month::try_from(month)
        .map_err(|_| AppError::Validation(format!("month {month} out of range")))?;
    let start = Date::from_calendar_date(year, m, 1)
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let end = Date::from_calendar_date(year, m, time::util::days_in_year_month(year, m))
        .map_err(|e| AppError::Validation(e.to_string()))?;
    Ok((start, end))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusTally {
    pub present: i32,
    pub half_day: i32,
    pub absent: i32,
}

/// Group attendance rows by employee code and count per status. A row whose
/// status text is not one of the three known values lands in no bucket.
pub fn tally_by_code(rows: &[AttendanceRecord]) -> HashMap<String, StatusTally> {
    let mut tallies: HashMap<String, StatusTally> = HashMap::new();
    for row in rows {
        let tally = tallies.entry(row.employee_code.clone()).or_default();
        match AttendanceStatus::parse(&row.status) {
            Some(AttendanceStatus::Present) => tally.present += 1,
            Some(AttendanceStatus::Absent) => tally.absent += 1,
            Some(AttendanceStatus::HalfDay) => tally.half_day += 1,
            None => {}
        }
    }
    tallies
}

/// Present days earn the full daily wage, half days earn half of it, absent
/// days earn nothing.
pub fn total_amount(tally: &StatusTally, daily_wage: Decimal) -> Decimal {
    daily_wage * Decimal::from(tally.present)
        + daily_wage * Decimal::from(tally.half_day) / Decimal::from(2)
}

/// Compute and upsert one payroll row per coded employee for the month.
/// Employees without a code are reported as skipped; a failure on one
/// employee is recorded and does not stop the batch.
pub async fn calculate_month(
    state: &AppState,
    month: Option<u8>,
    year: Option<i32>,
) -> Result<CalculateReport, AppError> {
    let today = OffsetDateTime::now_utc().date();
    let month = month.unwrap_or_else(|| u8::from(today.month()));
    let year = year.unwrap_or_else(|| today.year());
    let (start, end) = month_window(year, month)?;

    let employees = Employee::list(&state.db).await?;
    if employees.is_empty() {
        return Ok(CalculateReport {
            success: false,
            message: Some("no employees found to calculate payroll".into()),
            month,
            year,
            employee_count: 0,
            results: Vec::new(),
        });
    }

    let rows = crate::attendance::repo::list_in_range(&state.db, start, end).await?;
    let tallies = tally_by_code(&rows);

    let mut results = Vec::with_capacity(employees.len());
    for emp in &employees {
        let Some(code) = emp.code.as_deref() else {
            results.push(EmployeeResult {
                employee: emp.name.clone(),
                status: CalcStatus::Skipped,
                reason: Some("no employee code assigned".into()),
                message: None,
                data: None,
            });
            continue;
        };

        let tally = tallies.get(code).copied().unwrap_or_default();
        let row = NewPayroll {
            employee_code: code.to_string(),
            month: month as i32,
            year,
            present_days: tally.present,
            half_days: tally.half_day,
            absent_days: tally.absent,
            daily_wage: emp.daily_wage,
            total_amount: total_amount(&tally, emp.daily_wage),
        };

        // The lookup only decides what outcome to report; the upsert itself
        // is atomic on the natural key.
        let existed = match repo::find(&state.db, code, month as i32, year).await {
            Ok(found) => found.is_some(),
            Err(e) => {
                warn!(employee = %emp.name, error = %e, "payroll lookup failed");
                results.push(EmployeeResult {
                    employee: emp.name.clone(),
                    status: CalcStatus::Error,
                    reason: None,
                    message: Some(e.to_string()),
                    data: None,
                });
                continue;
            }
        };

        match repo::upsert(&state.db, &row).await {
            Ok(_) => results.push(EmployeeResult {
                employee: emp.name.clone(),
                status: if existed {
                    CalcStatus::Updated
                } else {
                    CalcStatus::Inserted
                },
                reason: None,
                message: None,
                data: Some(row),
            }),
            Err(e) => {
                warn!(employee = %emp.name, error = %e, "payroll upsert failed");
                results.push(EmployeeResult {
                    employee: emp.name.clone(),
                    status: CalcStatus::Error,
                    reason: None,
                    message: Some(e.to_string()),
                    data: None,
                });
            }
        }
    }

    info!(month, year, employees = employees.len(), "payroll calculated");
    Ok(CalculateReport {
        success: true,
        message: Some(format!("payroll calculated for {month}/{year}")),
        month,
        year,
        employee_count: employees.len(),
        results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use time::macros::date;
    use uuid::Uuid;

    fn rec(code: &str, date: Date, status: &str) -> AttendanceRecord {
        AttendanceRecord {
            id: Uuid::new_v4(),
            employee_code: code.to_string(),
            date,
            status: status.to_string(),
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn window_covers_whole_month() {
        let (start, end) = month_window(2025, 4).unwrap();
        assert_eq!(start, date!(2025 - 04 - 01));
        assert_eq!(end, date!(2025 - 04 - 30));

        let (start, end) = month_window(2025, 12).unwrap();
        assert_eq!(start, date!(2025 - 12 - 01));
        assert_eq!(end, date!(2025 - 12 - 31));
    }

    #[test]
    fn february_window_follows_leap_years() {
        let (_, end) = month_window(2024, 2).unwrap();
        assert_eq!(end, date!(2024 - 02 - 29));

        let (_, end) = month_window(2023, 2).unwrap();
        assert_eq!(end, date!(2023 - 02 - 28));
    }

    #[test]
    fn out_of_range_inputs_are_rejected() {
        assert!(month_window(2025, 0).is_err());
        assert!(month_window(2025, 13).is_err());
        assert!(month_window(0, 6).is_err());
        assert!(month_window(-44, 6).is_err());
    }

    #[test]
    fn tally_groups_by_code_and_counts_statuses() {
        let rows = vec![
            rec("SPX001", date!(2025 - 03 - 01), "present"),
            rec("SPX001", date!(2025 - 03 - 02), "present"),
            rec("SPX001", date!(2025 - 03 - 03), "half_day"),
            rec("SPX001", date!(2025 - 03 - 04), "absent"),
            rec("SPX002", date!(2025 - 03 - 01), "absent"),
        ];
        let tallies = tally_by_code(&rows);
        assert_eq!(
            tallies["SPX001"],
            StatusTally {
                present: 2,
                half_day: 1,
                absent: 1
            }
        );
        assert_eq!(
            tallies["SPX002"],
            StatusTally {
                present: 0,
                half_day: 0,
                absent: 1
            }
        );
        assert!(tallies.get("SPX003").is_none());
    }

    #[test]
    fn unknown_status_counts_toward_no_bucket() {
        let rows = vec![
            rec("SPX001", date!(2025 - 03 - 01), "present"),
            rec("SPX001", date!(2025 - 03 - 02), "sick"),
            rec("SPX001", date!(2025 - 03 - 03), ""),
        ];
        let tallies = tally_by_code(&rows);
        assert_eq!(
            tallies["SPX001"],
            StatusTally {
                present: 1,
                half_day: 0,
                absent: 0
            }
        );
    }

    #[test]
    fn amount_is_full_wage_per_present_plus_half_per_half_day() {
        let tally = StatusTally {
            present: 3,
            half_day: 1,
            absent: 2,
        };
        assert_eq!(total_amount(&tally, dec!(500)), dec!(1750));
    }

    #[test]
    fn absences_earn_nothing() {
        let tally = StatusTally {
            present: 0,
            half_day: 0,
            absent: 22,
        };
        assert_eq!(total_amount(&tally, dec!(500)), dec!(0));
    }

    #[test]
    fn half_day_amount_keeps_decimal_precision() {
        let tally = StatusTally {
            present: 0,
            half_day: 1,
            absent: 0,
        };
        assert_eq!(total_amount(&tally, dec!(101)), dec!(50.5));
    }
}
