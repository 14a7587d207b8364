use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;

use crate::handlers::jwt::generate_token;
use crate::models::records::{DoctorRecord, LicenseRequest, PatientRecord, PaymentRecord};

pub const ADMIN_ID: &str = "admin-1";
pub const ADMIN_EMAIL: &str = "admin@clinic.test";
pub const ADMIN_PASSWORD: &str = "Adm1n!pass";
pub const DEFAULT_JWT_SECRET: &str = "stub-backend-secret";

// Fixtures only; production hashes use bcrypt::DEFAULT_COST.
const HASH_COST: u32 = 4;

/// A failure queued for the next request to one path.
#[derive(Clone, Debug)]
pub struct QueuedFailure {
    pub status: u16,
    pub message: String,
}

#[derive(Clone, Debug)]
pub struct StubState {
    pub admin_email: Arc<String>,
    pub admin_hash: Arc<String>,
    pub jwt_secret: Arc<String>,
    pub patients: Arc<DashMap<String, PatientRecord>>,
    pub doctors: Arc<DashMap<String, DoctorRecord>>,
    pub requests: Arc<DashMap<String, LicenseRequest>>,
    pub payments: Arc<Vec<PaymentRecord>>,
    hits: Arc<DashMap<String, usize>>,
    delays: Arc<DashMap<String, Duration>>,
    failures: Arc<DashMap<String, QueuedFailure>>,
}

impl StubState {
    pub fn new() -> anyhow::Result<Self> {
        Self::with_admin(ADMIN_EMAIL, ADMIN_PASSWORD, DEFAULT_JWT_SECRET)
    }

    /// Empty state whose single admin account uses the given credentials.
    pub fn with_admin(email: &str, password: &str, jwt_secret: &str) -> anyhow::Result<Self> {
        Ok(StubState {
            admin_email: Arc::new(email.to_string()),
            admin_hash: Arc::new(bcrypt::hash(password, HASH_COST)?),
            jwt_secret: Arc::new(jwt_secret.to_string()),
            patients: Arc::new(DashMap::new()),
            doctors: Arc::new(DashMap::new()),
            requests: Arc::new(DashMap::new()),
            payments: Arc::new(Vec::new()),
            hits: Arc::new(DashMap::new()),
            delays: Arc::new(DashMap::new()),
            failures: Arc::new(DashMap::new()),
        })
    }

    /// 14 patients, 8 doctors, 7 pending licenses (`d1`..`d7`) and 9 payments.
    pub fn seeded() -> anyhow::Result<Self> {
        Self::new()?.with_fixtures()
    }

    pub fn with_fixtures(mut self) -> anyhow::Result<Self> {
        let state = &mut self;
        for (seq, patient) in seed_patients().into_iter().enumerate() {
            state.patients.insert(patient.patient_id.clone(), PatientRecord { seq, ..patient });
        }
        for (seq, doctor) in seed_doctors().into_iter().enumerate() {
            state.doctors.insert(doctor.id.clone(), DoctorRecord { seq, ..doctor });
        }
        for (seq, request) in seed_requests().into_iter().enumerate() {
            state.requests.insert(request.id.clone(), LicenseRequest { seq, ..request });
        }
        state.payments = Arc::new(seed_payments());
        Ok(self)
    }

    /// A valid admin token that expires `ttl_secs` from now (negative for one already expired).
    pub fn issue_token(&self, ttl_secs: i64) -> jsonwebtoken::errors::Result<String> {
        generate_token(&self.jwt_secret, ADMIN_ID, chrono::Duration::seconds(ttl_secs))
    }

    pub fn record_hit(&self, path: &str) {
        *self.hits.entry(path.to_string()).or_insert(0) += 1;
    }

    /// Requests that reached `path`, including ones answered with a queued failure.
    pub fn hits(&self, path: &str) -> usize {
        self.hits.get(path).map_or(0, |count| *count)
    }

    pub fn set_delay(&self, path: &str, delay: Duration) {
        self.delays.insert(path.to_string(), delay);
    }

    pub fn delay_for(&self, path: &str) -> Option<Duration> {
        self.delays.get(path).map(|delay| *delay)
    }

    /// The next request to `path` is answered with `status` and `{ "message": message }`.
    pub fn fail_next(&self, path: &str, status: u16, message: &str) {
        self.failures.insert(
            path.to_string(),
            QueuedFailure {
                status,
                message: message.to_string(),
            },
        );
    }

    pub fn take_failure(&self, path: &str) -> Option<QueuedFailure> {
        self.failures.remove(path).map(|(_, failure)| failure)
    }
}

fn seed_patients() -> Vec<PatientRecord> {
    let names = [
        Some("Ayse Demir"),
        Some("Mehmet Yilmaz"),
        Some("Alice Brown"),
        Some("Can Ozturk"),
        Some("Zeynep Kaya"),
        Some("Bob Stone"),
        Some("Elif Sahin"),
        Some("Alina Petrova"),
        Some("Murat Celik"),
        Some("Selin Arslan"),
        Some("Kemal Aydin"),
        Some("Deniz Koc"),
        Some("Hakan Polat"),
        None,
    ];
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let n = i as i64 + 1;
            PatientRecord {
                seq: 0,
                patient_id: format!("p{}", n),
                patient_name: name.map(str::to_string),
                email: format!("patient{}@mail.test", n),
                is_blocked: n % 5 == 0,
                total_appoinments_taken: n + 2,
                toatal_appoinments_completed: n,
                toatal_appoinments_pending: 2,
                toatal_spended: n as f64 * 150.0,
                your_profit: n as f64 * 15.0,
            }
        })
        .collect()
}

fn seed_doctors() -> Vec<DoctorRecord> {
    let doctors = [
        ("Dr. Emre Kaplan", "Cardiology", "MD", "male"),
        ("Dr. Leyla Aksoy", "Dermatology", "MD", "female"),
        ("Dr. John Carter", "Neurology", "PhD", "male"),
        ("Dr. Nur Yildiz", "Pediatrics", "MD", "female"),
        ("Dr. Omer Tas", "Orthopedics", "MS", "male"),
        ("Dr. Sara Lind", "Oncology", "MD", "female"),
        ("Dr. Ali Vural", "Radiology", "MBBS", "male"),
        ("Dr. Ece Gunes", "Psychiatry", "MD", "female"),
    ];
    doctors
        .iter()
        .enumerate()
        .map(|(i, (name, specialization, qualification, gender))| {
            let n = i as i64 + 1;
            DoctorRecord {
                seq: 0,
                id: format!("doc{}", n),
                doctor_name: Some(name.to_string()),
                specialization: Some(specialization.to_string()),
                qualification: Some(qualification.to_string()),
                phone: (n % 3 != 0).then(|| format!("+90555000{:04}", n)),
                email: format!("doctor{}@clinic.test", n),
                profile: None,
                gender: Some(gender.to_string()),
                field_experience: (n != 8).then_some(n as u32 * 2),
                is_blocked: n == 4,
                your_profit: n as f64 * 320.0,
                total_appoinments_taken: n * 10,
                toatal_appoinments_completed: n * 8,
                toatal_appoinments_pending: n * 2,
            }
        })
        .collect()
}

fn seed_requests() -> Vec<LicenseRequest> {
    let applicants = [
        ("Dr. Kerem Bal", "General Surgery"),
        ("Dr. Mina Ates", "Cardiology"),
        ("Dr. Tom Reed", "Dermatology"),
        ("Dr. Aylin Er", "Neurology"),
        ("Dr. Baris Uz", "Pediatrics"),
        ("Dr. Ida Holm", "Radiology"),
        ("Dr. Cem Ak", "Urology"),
    ];
    applicants
        .iter()
        .enumerate()
        .map(|(i, (name, specialization))| LicenseRequest {
            seq: 0,
            id: format!("d{}", i + 1),
            doctor_name: name.to_string(),
            email: format!("applicant{}@clinic.test", i + 1),
            medical_license_number: format!("LIC-{:05}", 1000 + i),
            specialization: specialization.to_string(),
        })
        .collect()
}

fn seed_payments() -> Vec<PaymentRecord> {
    let statuses = ["Completed", "completed", "Pending", "Completed", "Failed", "pending", "Completed", "Completed", "Failed"];
    statuses
        .iter()
        .enumerate()
        .map(|(i, status)| {
            let n = i + 1;
            PaymentRecord {
                id: format!("pay{}", n),
                patient_name: format!("Patient {}", n),
                appointment_date: format!("2024-05-{:02}", n),
                appointment_time: format!("{:02}:30", 8 + n),
                amount: 100.0 + n as f64 * 25.0,
                payment_method: if n % 2 == 0 { "card" } else { "upi" }.to_string(),
                payment_status: status.to_string(),
                transaction_id: status.eq_ignore_ascii_case("completed").then(|| format!("txn_{:04}", n)),
                email: Some(format!("patient{}@mail.test", n)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_each_collection() {
        let state = StubState::seeded().unwrap();
        assert_eq!(state.patients.len(), 14);
        assert_eq!(state.doctors.len(), 8);
        assert!(state.requests.contains_key("d1"));
        assert_eq!(state.payments.len(), 9);
        assert!(bcrypt::verify(ADMIN_PASSWORD, &state.admin_hash).unwrap());
    }

    #[test]
    fn queued_failure_fires_once() {
        let state = StubState::new().unwrap();
        state.fail_next("/AdminView/patients", 500, "boom");
        assert_eq!(state.take_failure("/AdminView/patients").map(|f| f.status), Some(500));
        assert!(state.take_failure("/AdminView/patients").is_none());
    }
}
