use serde::Serialize;

// Serialized with the production backend's field names, typos included.

#[derive(Clone, Serialize, Debug)]
pub struct PatientRecord {
    #[serde(skip)]
    pub seq: usize,
    pub patient_id: String,
    pub patient_name: Option<String>,
    pub email: String,
    #[serde(rename = "isBlocked")]
    pub is_blocked: bool,
    pub total_appoinments_taken: i64,
    pub toatal_appoinments_completed: i64,
    pub toatal_appoinments_pending: i64,
    pub toatal_spended: f64,
    pub your_profit: f64,
}

#[derive(Clone, Serialize, Debug)]
pub struct DoctorRecord {
    #[serde(skip)]
    pub seq: usize,
    #[serde(rename = "Id")]
    pub id: String,
    pub doctor_name: Option<String>,
    pub specialization: Option<String>,
    pub qualification: Option<String>,
    pub phone: Option<String>,
    pub email: String,
    pub profile: Option<String>,
    pub gender: Option<String>,
    pub field_experience: Option<u32>,
    #[serde(rename = "isBlocked")]
    pub is_blocked: bool,
    pub your_profit: f64,
    pub total_appoinments_taken: i64,
    pub toatal_appoinments_completed: i64,
    pub toatal_appoinments_pending: i64,
}

#[derive(Clone, Serialize, Debug)]
pub struct LicenseRequest {
    #[serde(skip)]
    pub seq: usize,
    pub id: String,
    pub doctor_name: String,
    pub email: String,
    pub medical_license_number: String,
    pub specialization: String,
}

#[derive(Clone, Serialize, Debug)]
pub struct PaymentRecord {
    pub id: String,
    pub patient_name: String,
    #[serde(rename = "appointmentDate")]
    pub appointment_date: String,
    #[serde(rename = "appointmentTime")]
    pub appointment_time: String,
    pub amount: f64,
    #[serde(rename = "paymentMethod")]
    pub payment_method: String,
    #[serde(rename = "paymentStatus")]
    pub payment_status: String,
    #[serde(rename = "transactionId")]
    pub transaction_id: Option<String>,
    pub email: Option<String>,
}
