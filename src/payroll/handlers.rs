use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::instrument;

use crate::{
    auth::AuthUser,
    error::AppError,
    payroll::dto::{CalculateReport, MonthQuery},
    payroll::repo::{self, PayrollRecord},
    payroll::services,
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/payroll", get(list_payroll))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/payroll/calculate", post(calculate_payroll))
}

#[instrument(skip(state, _user))]
pub async fn list_payroll(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(q): Query<MonthQuery>,
) -> Result<Json<Vec<PayrollRecord>>, AppError> {
    let today = OffsetDateTime::now_utc().date();
    let month = q.month.unwrap_or_else(|| u8::from(today.month()));
    let year = q.year.unwrap_or_else(|| today.year());
    // Same bounds check as the calculator.
    services::month_window(year, month)?;
    Ok(Json(
        repo::list_for_month(&state.db, month as i32, year).await?,
    ))
}

#[instrument(skip(state, _user))]
pub async fn calculate_payroll(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(q): Query<MonthQuery>,
) -> Result<Json<CalculateReport>, AppError> {
    Ok(Json(
        services::calculate_month(&state, q.month, q.year).await?,
    ))
}
