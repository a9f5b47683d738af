use axum::{extract::State, routing::post, Json, Router};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{error::AppError, middleware::auth::StaffClaims, state::AppState};

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    token: String,
    employee_id: i64,
    full_name: String,
    role: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/auth/login", post(login))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = req.email.trim();
    if email.is_empty() || req.password.is_empty() {
        return Err(AppError::Validation(
            "Email and password must not be empty".to_string(),
        ));
    }

    let employee = state
        .employees
        .find_by_email(email)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

    if !employee.password_matches(&req.password) {
        return Err(AppError::Authentication(
            "Invalid email or password".to_string(),
        ));
    }

    let claims = StaffClaims {
        sub: employee.employee_id.to_string(),
        role: employee.role.clone(),
        exp: (Utc::now() + Duration::seconds(state.auth.expiration_seconds as i64)).timestamp()
            as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.auth.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token encoding failed: {}", e)))?;

    info!("Employee {} logged in", employee.employee_id);

    Ok(Json(LoginResponse {
        token,
        employee_id: employee.employee_id,
        full_name: format!("{} {}", employee.first_name, employee.last_name),
        role: employee.role,
    }))
}
