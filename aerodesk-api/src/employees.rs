use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use aerodesk_core::employee::{Employee, EmployeeUpdate};
use aerodesk_shared::pii::Masked;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
struct CreateEmployeeRequest {
    employee_id: i64,
    first_name: String,
    last_name: String,
    email: String,
    role: String,
    password: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/employees", post(create_employee))
        .route("/v1/employees/{id}", get(get_employee).put(update_employee))
}

async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Employee>, AppError> {
    let employee = state
        .employees
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("employee {} not found", id)))?;
    Ok(Json(employee))
}

async fn create_employee(
    State(state): State<AppState>,
    Json(req): Json<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<Employee>), AppError> {
    validate_profile_fields(&req.first_name, &req.last_name, &req.email, &req.password)?;

    let employee = Employee {
        employee_id: req.employee_id,
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email.trim().to_string(),
        role: req.role,
        password: Masked(req.password),
    };

    // Duplicate id and duplicate email surface from the store as 409s.
    state.employees.create(&employee).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

/// The employee id is the path key and cannot be changed by an update.
async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(update): Json<EmployeeUpdate>,
) -> Result<StatusCode, AppError> {
    validate_profile_fields(
        &update.first_name,
        &update.last_name,
        &update.email,
        update.password.expose(),
    )?;

    state
        .employees
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("employee {} not found", id)))?;

    state.employees.update(id, &update).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn validate_profile_fields(
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
) -> Result<(), AppError> {
    if first_name.trim().is_empty()
        || last_name.trim().is_empty()
        || email.trim().is_empty()
        || password.is_empty()
    {
        return Err(AppError::Validation("All fields are required".to_string()));
    }
    if !email.contains('@') {
        return Err(AppError::Validation("Invalid email format".to_string()));
    }
    Ok(())
}
