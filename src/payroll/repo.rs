use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PayrollRecord {
    pub id: Uuid,
    pub employee_code: String,
    pub month: i32,
    pub year: i32,
    pub present_days: i32,
    pub half_days: i32,
    pub absent_days: i32,
    pub daily_wage: Decimal,
    pub total_amount: Decimal,
    pub created_at: OffsetDateTime,
}

/// Computed payroll fields for one (employee_code, month, year) key.
#[derive(Debug, Clone, Serialize)]
pub struct NewPayroll {
    pub employee_code: String,
    pub month: i32,
    pub year: i32,
    pub present_days: i32,
    pub half_days: i32,
    pub absent_days: i32,
    pub daily_wage: Decimal,
    pub total_amount: Decimal,
}

pub async fn find(
    db: &PgPool,
    employee_code: &str,
    month: i32,
    year: i32,
) -> Result<Option<PayrollRecord>, sqlx::Error> {
    sqlx::query_as::<_, PayrollRecord>(
        r#"
        SELECT id, employee_code, month, year, present_days, half_days, absent_days,
               daily_wage, total_amount, created_at
        FROM payroll
        WHERE employee_code = $1 AND month = $2 AND year = $3
        "#,
    )
    .bind(employee_code)
    .bind(month)
    .bind(year)
    .fetch_optional(db)
    .await
}

pub async fn list_for_month(
    db: &PgPool,
    month: i32,
    year: i32,
) -> Result<Vec<PayrollRecord>, sqlx::Error> {
    sqlx::query_as::<_, PayrollRecord>(
        r#"
        SELECT id, employee_code, month, year, present_days, half_days, absent_days,
               daily_wage, total_amount, created_at
        FROM payroll
        WHERE month = $1 AND year = $2
        ORDER BY employee_code ASC
        "#,
    )
    .bind(month)
    .bind(year)
    .fetch_all(db)
    .await
}

/// Atomic write on the (employee_code, month, year) natural key:
/// recalculation overwrites in place, concurrent writers cannot duplicate.
pub async fn upsert(db: &PgPool, row: &NewPayroll) -> Result<PayrollRecord, sqlx::Error> {
    sqlx::query_as::<_, PayrollRecord>(
        r#"
        INSERT INTO payroll (employee_code, month, year, present_days, half_days,
                             absent_days, daily_wage, total_amount)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (employee_code, month, year) DO UPDATE
        SET present_days = EXCLUDED.present_days,
            half_days = EXCLUDED.half_days,
            absent_days = EXCLUDED.absent_days,
            daily_wage = EXCLUDED.daily_wage,
            total_amount = EXCLUDED.total_amount
        RETURNING id, employee_code, month, year, present_days, half_days, absent_days,
                  daily_wage, total_amount, created_at
        "#,
    )
    .bind(&row.employee_code)
    .bind(row.month)
    .bind(row.year)
    .bind(row.present_days)
    .bind(row.half_days)
    .bind(row.absent_days)
    .bind(row.daily_wage)
    .bind(row.total_amount)
    .fetch_one(db)
    .await
}
