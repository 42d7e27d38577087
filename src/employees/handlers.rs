use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    employees::dto::{AssignReport, CreateEmployeeRequest, UpdateEmployeeRequest},
    employees::repo::Employee,
    employees::services,
    error::AppError,
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/employees", get(list_employees))
        .route("/employees/:id", get(get_employee))
        .route("/employees/by-code/:code", get(get_employee_by_code))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/employees", post(create_employee))
        .route("/employees/:id", put(update_employee).delete(delete_employee))
        .route("/employees/assign-codes", post(assign_codes))
}

#[instrument(skip(state, _user))]
pub async fn list_employees(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<Vec<Employee>>, AppError> {
    Ok(Json(Employee::list(&state.db).await?))
}

#[instrument(skip(state, _user))]
pub async fn get_employee(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Employee>, AppError> {
    let employee = Employee::find(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("employee {id} not found")))?;
    Ok(Json(employee))
}

#[instrument(skip(state, _user))]
pub async fn get_employee_by_code(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(code): Path<String>,
) -> Result<Json<Employee>, AppError> {
    let employee = Employee::find_by_code(&state.db, &code)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("employee {code} not found")))?;
    Ok(Json(employee))
}

#[instrument(skip(state, _user, payload))]
pub async fn create_employee(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<Employee>), AppError> {
    let employee = services::create_employee(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

#[instrument(skip(state, _user, payload))]
pub async fn update_employee(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEmployeeRequest>,
) -> Result<Json<Employee>, AppError> {
    let employee = services::update_employee(&state, id, payload).await?;
    Ok(Json(employee))
}

#[instrument(skip(state, _user))]
pub async fn delete_employee(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if Employee::delete(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("employee {id} not found")))
    }
}

#[instrument(skip(state, _user))]
pub async fn assign_codes(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<AssignReport>, AppError> {
    Ok(Json(services::assign_missing_codes(&state).await?))
}
