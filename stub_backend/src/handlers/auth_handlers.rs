use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::jwt::generate_token;
use super::{envelope, error, paginate, ApiResult, ListQuery};
use crate::state::{StubState, ADMIN_ID};

#[derive(Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LicensePayload {
    #[serde(rename = "drId")]
    pub dr_id: String,
}

pub async fn login(State(state): State<StubState>, Json(payload): Json<LoginPayload>) -> ApiResult {
    if payload.email != *state.admin_email {
        return Err(error(StatusCode::UNAUTHORIZED, "Invalid email"));
    }

    let is_valid_password = bcrypt::verify(&payload.password, &state.admin_hash)
        .map_err(|_| error(StatusCode::UNAUTHORIZED, "Invalid password"))?;
    if !is_valid_password {
        return Err(error(StatusCode::UNAUTHORIZED, "Invalid password"));
    }

    let token = generate_token(&state.jwt_secret, ADMIN_ID, chrono::Duration::days(1))
        .map_err(|_| error(StatusCode::INTERNAL_SERVER_ERROR, "Token error"))?;
    tracing::info!("admin {} signed in", state.admin_email);

    envelope(
        json!({
            "access_token": token,
            "refresh_token": Uuid::new_v4().to_string(),
            "email": state.admin_email.as_str(),
            "id": ADMIN_ID,
        }),
        "Login successful",
    )
}

pub async fn pending_verifications(State(state): State<StubState>, Query(query): Query<ListQuery>) -> ApiResult {
    let mut pending: Vec<_> = state.requests.iter().map(|r| r.value().clone()).collect();
    pending.sort_by_key(|r| r.seq);
    envelope(paginate(pending, query.page, query.page_size), "")
}

pub async fn approve_license(State(state): State<StubState>, Json(payload): Json<LicensePayload>) -> ApiResult {
    let (_, request) = state
        .requests
        .remove(&payload.dr_id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Verification request not found"))?;
    let message = format!("License of {} approved", request.doctor_name);
    envelope(&message, &message)
}

pub async fn reject_license(State(state): State<StubState>, Json(payload): Json<LicensePayload>) -> ApiResult {
    let (_, request) = state
        .requests
        .remove(&payload.dr_id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Verification request not found"))?;
    let message = format!("License of {} rejected", request.doctor_name);
    envelope(&message, &message)
}
