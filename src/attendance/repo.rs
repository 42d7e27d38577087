use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// The only statuses a day can hold. Writes go through this enum; reads keep
/// the raw column text so that a row holding an unexpected value does not
/// poison a whole query (such rows simply count toward no payroll bucket).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    HalfDay,
}

impl AttendanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::HalfDay => "half_day",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "present" => Some(AttendanceStatus::Present),
            "absent" => Some(AttendanceStatus::Absent),
            "half_day" => Some(AttendanceStatus::HalfDay),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub employee_code: String,
    pub date: Date,
    pub status: String,
    pub created_at: OffsetDateTime,
}

pub async fn list_by_date(db: &PgPool, date: Date) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceRecord>(
        r#"
        SELECT id, employee_code, date, status, created_at
        FROM attendance
        WHERE date = $1
        ORDER BY employee_code ASC
        "#,
    )
    .bind(date)
    .fetch_all(db)
    .await
}

pub async fn list_in_range(
    db: &PgPool,
    start: Date,
    end: Date,
) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceRecord>(
        r#"
        SELECT id, employee_code, date, status, created_at
        FROM attendance
        WHERE date >= $1 AND date <= $2
        ORDER BY date ASC, employee_code ASC
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await
}

pub async fn list_by_employee(
    db: &PgPool,
    employee_code: &str,
) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceRecord>(
        r#"
        SELECT id, employee_code, date, status, created_at
        FROM attendance
        WHERE employee_code = $1
        ORDER BY date ASC
        "#,
    )
    .bind(employee_code)
    .fetch_all(db)
    .await
}

/// Atomic upsert on the (employee_code, date) natural key; a concurrent
/// writer for the same key cannot produce a duplicate row.
pub async fn upsert_status(
    db: &PgPool,
    employee_code: &str,
    date: Date,
    status: AttendanceStatus,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO attendance (employee_code, date, status)
        VALUES ($1, $2, $3)
        ON CONFLICT (employee_code, date) DO UPDATE SET status = EXCLUDED.status
        "#,
    )
    .bind(employee_code)
    .bind(date)
    .bind(status.as_str())
    .execute(db)
    .await?;
    Ok(())
}

/// Insert a default `absent` row unless one already exists for the day.
/// Returns whether a row was created; an existing row is never overwritten.
pub async fn insert_absent_if_missing(
    db: &PgPool,
    employee_code: &str,
    date: Date,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO attendance (employee_code, date, status)
        VALUES ($1, $2, 'absent')
        ON CONFLICT (employee_code, date) DO NOTHING
        "#,
    )
    .bind(employee_code)
    .bind(date)
    .execute(db)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete every row whose code is not in the valid set, in one statement.
/// With an empty set this removes all attendance rows.
pub async fn delete_orphans(
    db: &PgPool,
    valid_codes: &[String],
) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceRecord>(
        r#"
        DELETE FROM attendance
        WHERE employee_code <> ALL($1)
        RETURNING id, employee_code, date, status, created_at
        "#,
    )
    .bind(valid_codes)
    .fetch_all(db)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_names_match_the_stored_text() {
        for status in [
            AttendanceStatus::Present,
            AttendanceStatus::Absent,
            AttendanceStatus::HalfDay,
        ] {
            assert_eq!(AttendanceStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(AttendanceStatus::parse("sick"), None);
        assert_eq!(AttendanceStatus::parse(""), None);
        assert_eq!(AttendanceStatus::parse("Present"), None);
    }

    #[test]
    fn status_serde_uses_snake_case() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::HalfDay).unwrap(),
            "\"half_day\""
        );
        let parsed: AttendanceStatus = serde_json::from_str("\"half_day\"").unwrap();
        assert_eq!(parsed, AttendanceStatus::HalfDay);
    }
}
