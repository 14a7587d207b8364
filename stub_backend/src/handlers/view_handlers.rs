use axum::{
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::json;

use super::{envelope, error, name_matches, paginate, ApiResult, ListQuery};
use crate::state::StubState;

#[derive(Deserialize)]
pub struct PatientIdQuery {
    #[serde(rename = "Id")]
    pub id: String,
}

#[derive(Deserialize)]
pub struct DoctorIdQuery {
    #[serde(rename = "drId")]
    pub id: String,
}

#[derive(Deserialize)]
pub struct ToggleQuery {
    pub id: String,
}

// Share of each completed payment the clinic keeps.
const COMMISSION: f64 = 0.1;

pub async fn dashboard(State(state): State<StubState>, Query(query): Query<ListQuery>) -> ApiResult {
    let completed = |status: &str| status.eq_ignore_ascii_case("completed");
    let sales: f64 = state
        .payments
        .iter()
        .filter(|p| completed(&p.payment_status))
        .map(|p| p.amount)
        .sum();
    let count = |wanted: &str| {
        state
            .payments
            .iter()
            .filter(|p| p.payment_status.eq_ignore_ascii_case(wanted))
            .count()
    };

    let (mut taken, mut done, mut pending) = (0, 0, 0);
    for patient in state.patients.iter() {
        taken += patient.total_appoinments_taken;
        done += patient.toatal_appoinments_completed;
        pending += patient.toatal_appoinments_pending;
    }

    envelope(
        json!({
            "profit": sales * COMMISSION,
            "sales": sales,
            "total_appoinments_taken": taken,
            "toatal_appoinments_completed": done,
            "toatal_appoinments_pending": pending,
            "payment_pending": count("pending"),
            "payment_failed": count("failed"),
            "payment_deatils": paginate(state.payments.to_vec(), query.page, query.page_size),
        }),
        "",
    )
}

pub async fn patients(State(state): State<StubState>, Query(query): Query<ListQuery>) -> ApiResult {
    let mut rows: Vec<_> = state
        .patients
        .iter()
        .filter(|p| name_matches(p.patient_name.as_deref(), &query.name))
        .map(|p| p.value().clone())
        .collect();
    rows.sort_by_key(|p| p.seq);
    envelope(paginate(rows, query.page, query.page_size), "")
}

pub async fn patient(State(state): State<StubState>, Query(query): Query<PatientIdQuery>) -> ApiResult {
    let patient = state
        .patients
        .get(&query.id)
        .map(|p| p.value().clone())
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Patient not found"))?;
    envelope(patient, "")
}

pub async fn toggle_patient(State(state): State<StubState>, Query(query): Query<ToggleQuery>) -> ApiResult {
    let mut patient = state
        .patients
        .get_mut(&query.id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Patient not found"))?;
    patient.is_blocked = !patient.is_blocked;
    let message = if patient.is_blocked {
        "Patient blocked successfully"
    } else {
        "Patient unblocked successfully"
    };
    envelope(message, message)
}

pub async fn doctors(State(state): State<StubState>, Query(query): Query<ListQuery>) -> ApiResult {
    let mut rows: Vec<_> = state
        .doctors
        .iter()
        .filter(|d| name_matches(d.doctor_name.as_deref(), &query.name))
        .map(|d| d.value().clone())
        .collect();
    rows.sort_by_key(|d| d.seq);
    envelope(paginate(rows, query.page, query.page_size), "")
}

pub async fn doctor(State(state): State<StubState>, Query(query): Query<DoctorIdQuery>) -> ApiResult {
    let doctor = state
        .doctors
        .get(&query.id)
        .map(|d| d.value().clone())
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Doctor not found"))?;
    envelope(doctor, "")
}

pub async fn toggle_doctor(State(state): State<StubState>, Query(query): Query<ToggleQuery>) -> ApiResult {
    let mut doctor = state
        .doctors
        .get_mut(&query.id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Doctor not found"))?;
    doctor.is_blocked = !doctor.is_blocked;
    let message = if doctor.is_blocked {
        "Doctor blocked successfully"
    } else {
        "Doctor unblocked successfully"
    };
    envelope(message, message)
}
