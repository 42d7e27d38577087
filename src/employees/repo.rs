use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Employee {
    pub id: Uuid,
    /// Human-readable business code (e.g. "SPX001"); attendance and payroll
    /// rows key on this, not on `id`.
    pub code: Option<String>,
    pub name: String,
    pub daily_wage: Decimal,
    pub created_at: OffsetDateTime,
}

impl Employee {
    pub async fn list(db: &PgPool) -> Result<Vec<Employee>, sqlx::Error> {
        sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, code, name, daily_wage, created_at
            FROM employees
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(db)
        .await
    }

    /// Employees holding a code, ordered by it. Attendance can only be
    /// recorded against these.
    pub async fn list_coded(db: &PgPool) -> Result<Vec<Employee>, sqlx::Error> {
        sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, code, name, daily_wage, created_at
            FROM employees
            WHERE code IS NOT NULL
            ORDER BY code ASC
            "#,
        )
        .fetch_all(db)
        .await
    }

    pub async fn list_missing_code(db: &PgPool) -> Result<Vec<Employee>, sqlx::Error> {
        sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, code, name, daily_wage, created_at
            FROM employees
            WHERE code IS NULL
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(db)
        .await
    }

    pub async fn list_codes(db: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT code FROM employees WHERE code IS NOT NULL
            "#,
        )
        .fetch_all(db)
        .await
    }

    pub async fn find(db: &PgPool, id: Uuid) -> Result<Option<Employee>, sqlx::Error> {
        sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, code, name, daily_wage, created_at
            FROM employees
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_code(db: &PgPool, code: &str) -> Result<Option<Employee>, sqlx::Error> {
        sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, code, name, daily_wage, created_at
            FROM employees
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(db)
        .await
    }

    pub async fn insert(
        db: &PgPool,
        code: Option<&str>,
        name: &str,
        daily_wage: Decimal,
    ) -> Result<Employee, sqlx::Error> {
        sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (code, name, daily_wage)
            VALUES ($1, $2, $3)
            RETURNING id, code, name, daily_wage, created_at
            "#,
        )
        .bind(code)
        .bind(name)
        .bind(daily_wage)
        .fetch_one(db)
        .await
    }

    /// Partial patch; absent fields keep their stored value.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        code: Option<&str>,
        name: Option<&str>,
        daily_wage: Option<Decimal>,
    ) -> Result<Option<Employee>, sqlx::Error> {
        sqlx::query_as::<_, Employee>(
            r#"
            UPDATE employees
            SET code = COALESCE($2, code),
                name = COALESCE($3, name),
                daily_wage = COALESCE($4, daily_wage)
            WHERE id = $1
            RETURNING id, code, name, daily_wage, created_at
            "#,
        )
        .bind(id)
        .bind(code)
        .bind(name)
        .bind(daily_wage)
        .fetch_optional(db)
        .await
    }

    pub async fn set_code(db: &PgPool, id: Uuid, code: &str) -> Result<Employee, sqlx::Error> {
        sqlx::query_as::<_, Employee>(
            r#"
            UPDATE employees
            SET code = $2
            WHERE id = $1
            RETURNING id, code, name, daily_wage, created_at
            "#,
        )
        .bind(id)
        .bind(code)
        .fetch_one(db)
        .await
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM employees WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
