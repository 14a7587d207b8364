use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Page;

// Wire names keep the backend's own spellings ("appoinments", "toatal", "deatils").

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(rename = "patient_id", default)]
    pub id: String,
    #[serde(rename = "patient_name", default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "isBlocked", default)]
    pub is_blocked: bool,
    #[serde(rename = "total_appoinments_taken", alias = "total_appointments_taken", default)]
    pub appointments_taken: i64,
    #[serde(
        rename = "toatal_appoinments_completed",
        alias = "total_appointments_completed",
        default
    )]
    pub appointments_completed: i64,
    #[serde(
        rename = "toatal_appoinments_pending",
        alias = "total_appointments_pending",
        default
    )]
    pub appointments_pending: i64,
    #[serde(rename = "toatal_spended", alias = "total_spended", default)]
    pub total_spent: f64,
    #[serde(rename = "your_profit", default)]
    pub profit: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    #[serde(alias = "Id", default)]
    pub id: String,
    #[serde(rename = "doctor_name", default)]
    pub name: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub qualification: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: String,
    /// Profile image reference.
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(rename = "field_experience", default)]
    pub experience_years: Option<u32>,
    #[serde(rename = "isBlocked", default)]
    pub is_blocked: bool,
    #[serde(rename = "your_profit", default)]
    pub profit: f64,
    #[serde(rename = "total_appoinments_taken", alias = "total_appointments_taken", default)]
    pub appointments_taken: i64,
    #[serde(
        rename = "toatal_appoinments_completed",
        alias = "total_appointments_completed",
        default
    )]
    pub appointments_completed: i64,
    #[serde(
        rename = "toatal_appoinments_pending",
        alias = "total_appointments_pending",
        default
    )]
    pub appointments_pending: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationRequest {
    pub id: String,
    pub doctor_name: String,
    pub email: String,
    pub medical_license_number: String,
    pub specialization: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Completed,
    Pending,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Completed => "completed",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PaymentStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// The backend is inconsistent about casing ("Completed", "completed").
impl<'de> Deserialize<'de> for PaymentStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.to_ascii_lowercase().as_str() {
            "completed" => Ok(PaymentStatus::Completed),
            "pending" => Ok(PaymentStatus::Pending),
            "failed" => Ok(PaymentStatus::Failed),
            _ => Err(serde::de::Error::unknown_variant(
                &raw,
                &["completed", "pending", "failed"],
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: String,
    #[serde(default)]
    pub patient_name: String,
    #[serde(rename = "appointmentDate", default)]
    pub appointment_date: String,
    #[serde(rename = "appointmentTime", default)]
    pub appointment_time: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(rename = "paymentMethod", default)]
    pub payment_method: String,
    #[serde(rename = "paymentStatus")]
    pub status: PaymentStatus,
    #[serde(rename = "transactionId", default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    #[serde(default)]
    pub profit: f64,
    #[serde(default)]
    pub sales: f64,
    #[serde(rename = "total_appoinments_taken", alias = "total_appointments_taken", default)]
    pub appointments_taken: i64,
    #[serde(
        rename = "toatal_appoinments_completed",
        alias = "total_appointments_completed",
        default
    )]
    pub appointments_completed: i64,
    #[serde(
        rename = "toatal_appoinments_pending",
        alias = "total_appointments_pending",
        default
    )]
    pub appointments_pending: i64,
    #[serde(default)]
    pub payment_pending: i64,
    #[serde(default)]
    pub payment_failed: i64,
    #[serde(rename = "payment_deatils", alias = "payment_details", default)]
    pub payments: Page<PaymentRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginGrant {
    pub access_token: String,
    pub refresh_token: String,
    pub email: String,
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn patient_reads_backend_spellings_and_tolerates_gaps() {
        let patient: Patient = serde_json::from_value(json!({
            "patient_id": "p1",
            "patient_name": null,
            "email": "ayse@example.com",
            "isBlocked": true,
            "total_appoinments_taken": 4,
            "toatal_appoinments_completed": 3,
            "toatal_spended": 120.5
        }))
        .unwrap();

        assert_eq!(patient.id, "p1");
        assert_eq!(patient.name, None);
        assert!(patient.is_blocked);
        assert_eq!(patient.appointments_taken, 4);
        assert_eq!(patient.appointments_completed, 3);
        assert_eq!(patient.appointments_pending, 0);
        assert_eq!(patient.total_spent, 120.5);
    }

    #[test]
    fn doctor_accepts_capitalised_id() {
        let doctor: Doctor = serde_json::from_value(json!({
            "Id": "d7",
            "doctor_name": "Dr. Kaya",
            "field_experience": 12,
            "isBlocked": false
        }))
        .unwrap();

        assert_eq!(doctor.id, "d7");
        assert_eq!(doctor.experience_years, Some(12));
    }

    #[test]
    fn payment_status_is_case_insensitive_but_closed() {
        let status: PaymentStatus = serde_json::from_value(json!("Completed")).unwrap();
        assert_eq!(status, PaymentStatus::Completed);
        assert!(serde_json::from_value::<PaymentStatus>(json!("refunded")).is_err());
    }

    #[test]
    fn dashboard_defaults_missing_payment_page() {
        let summary: DashboardSummary = serde_json::from_value(json!({ "profit": 10.0 })).unwrap();
        assert_eq!(summary.profit, 10.0);
        assert!(summary.payments.items.is_empty());
        assert_eq!(summary.payments.total_pages, 0);
    }
}
