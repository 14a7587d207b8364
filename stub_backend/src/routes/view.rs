use axum::{
    routing::{get, patch},
    Router,
};

use crate::handlers::view_handlers::{dashboard, doctor, doctors, patient, patients, toggle_doctor, toggle_patient};
use crate::state::StubState;

pub fn view_routes() -> Router<StubState> {
    Router::new()
        .route("/AdminView/admin-dashboard", get(dashboard))
        .route("/AdminView/patients", get(patients))
        .route("/AdminView/patient-id", get(patient))
        .route("/AdminView/patient/block-unblock", patch(toggle_patient))
        .route("/AdminView/doctors", get(doctors))
        .route("/AdminView/dr-by-id", get(doctor))
        .route("/AdminView/dr-block/unblock", patch(toggle_doctor))
}
