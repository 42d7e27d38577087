use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::instrument;

use crate::{
    attendance::dto::{
        DateQuery, ListQuery, ReconcileReport, SaveAttendanceRequest, SaveReport, SyncReport,
    },
    attendance::repo::{self, AttendanceRecord},
    attendance::services,
    auth::AuthUser,
    error::AppError,
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/attendance", get(list_attendance))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/attendance", post(save_attendance))
        .route("/attendance/sync", post(sync_attendance))
        .route("/attendance/reconcile", post(reconcile_attendance))
}

#[instrument(skip(state, _user))]
pub async fn list_attendance(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<AttendanceRecord>>, AppError> {
    if let Some(code) = q.employee_code.as_deref() {
        return Ok(Json(repo::list_by_employee(&state.db, code).await?));
    }
    let date = q.date.unwrap_or_else(|| OffsetDateTime::now_utc().date());
    Ok(Json(repo::list_by_date(&state.db, date).await?))
}

#[instrument(skip(state, _user, payload))]
pub async fn save_attendance(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<SaveAttendanceRequest>,
) -> Result<Json<SaveReport>, AppError> {
    Ok(Json(services::save_for_date(&state, payload).await?))
}

#[instrument(skip(state, _user))]
pub async fn sync_attendance(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(q): Query<DateQuery>,
) -> Result<Json<SyncReport>, AppError> {
    let date = q.date.unwrap_or_else(|| OffsetDateTime::now_utc().date());
    Ok(Json(services::sync_day(&state, date).await?))
}

#[instrument(skip(state, _user))]
pub async fn reconcile_attendance(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<ReconcileReport>, AppError> {
    Ok(Json(services::reconcile_orphans(&state).await?))
}
