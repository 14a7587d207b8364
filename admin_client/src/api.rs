//! Typed calls for every backend endpoint the console uses.
//!
//! Identity and doctor verification live on the auth service
//! (`/AdminAuth/*`); everything else is on the business service (`/AdminView/*`).

use serde_json::json;

use crate::config::ClientConfig;
use crate::error::{AdminError, AdminResult};
use crate::http::HttpClient;
use crate::models::{Credentials, DashboardSummary, Doctor, LoginGrant, Patient, VerificationRequest};
use crate::session::SessionHandle;
use crate::{Page, ServerMessage};

#[derive(Clone)]
pub struct AdminApi {
    auth: HttpClient,
    business: HttpClient,
}

fn paging(page: u32, page_size: u32) -> [(&'static str, String); 2] {
    [("pageNumber", page.to_string()), ("pageSize", page_size.to_string())]
}

impl AdminApi {
    pub fn new(config: &ClientConfig, session: SessionHandle) -> AdminResult<Self> {
        Ok(Self {
            auth: HttpClient::new("auth", config.auth_base_url.clone(), session.clone())?,
            business: HttpClient::new("business", config.business_base_url.clone(), session)?,
        })
    }

    pub async fn login(&self, credentials: &Credentials) -> AdminResult<LoginGrant> {
        const PATH: &str = "/AdminAuth/login";
        let body = json!({ "email": credentials.email, "password": credentials.password });
        self.auth
            .post_anonymous::<LoginGrant>(PATH, &body)
            .await?
            .data
            .ok_or_else(|| AdminError::Decode {
                endpoint: PATH.to_string(),
                reason: "login response has no data".to_string(),
            })
    }

    pub async fn pending_verifications(&self, page: u32, page_size: u32) -> AdminResult<Page<VerificationRequest>> {
        let envelope = self
            .auth
            .get("/AdminAuth/all-dr-verify-pending", &paging(page, page_size))
            .await?;
        Ok(envelope.data.unwrap_or_default())
    }

    pub async fn approve_license(&self, dr_id: &str) -> AdminResult<ServerMessage> {
        let body = json!({ "drId": dr_id });
        let envelope = self.auth.patch("/AdminAuth/dr-license-approve", &[], Some(&body)).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    pub async fn reject_license(&self, dr_id: &str) -> AdminResult<ServerMessage> {
        let body = json!({ "drId": dr_id });
        let envelope = self.auth.patch("/AdminAuth/dr-license-reject", &[], Some(&body)).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    pub async fn dashboard(&self, page: u32, page_size: u32) -> AdminResult<DashboardSummary> {
        let envelope = self
            .business
            .get("/AdminView/admin-dashboard", &paging(page, page_size))
            .await?;
        Ok(envelope.data.unwrap_or_default())
    }

    pub async fn patients(&self, name: &str, page: u32, page_size: u32) -> AdminResult<Page<Patient>> {
        let [page, size] = paging(page, page_size);
        let query = [("name", name.to_string()), page, size];
        let envelope = self.business.get("/AdminView/patients", &query).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    pub async fn patient(&self, id: &str) -> AdminResult<Patient> {
        let envelope = self
            .business
            .get("/AdminView/patient-id", &[("Id", id.to_string())])
            .await?;
        Ok(envelope.data.unwrap_or_default())
    }

    pub async fn toggle_patient_block(&self, id: &str) -> AdminResult<ServerMessage> {
        let envelope = self
            .business
            .patch("/AdminView/patient/block-unblock", &[("id", id.to_string())], None)
            .await?;
        Ok(envelope.data.unwrap_or_default())
    }

    pub async fn doctors(&self, name: &str, page: u32, page_size: u32) -> AdminResult<Page<Doctor>> {
        let [page, size] = paging(page, page_size);
        let query = [("name", name.to_string()), page, size];
        let envelope = self.business.get("/AdminView/doctors", &query).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    pub async fn doctor(&self, id: &str) -> AdminResult<Doctor> {
        let envelope = self
            .business
            .get("/AdminView/dr-by-id", &[("drId", id.to_string())])
            .await?;
        Ok(envelope.data.unwrap_or_default())
    }

    pub async fn toggle_doctor_block(&self, id: &str) -> AdminResult<ServerMessage> {
        let envelope = self
            .business
            .patch("/AdminView/dr-block/unblock", &[("id", id.to_string())], None)
            .await?;
        Ok(envelope.data.unwrap_or_default())
    }
}
