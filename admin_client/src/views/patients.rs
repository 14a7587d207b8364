use futures::future::{BoxFuture, FutureExt};

use crate::api::AdminApi;
use crate::cache::QueryKey;
use crate::config::PATIENTS_PAGE_SIZE;
use crate::error::AdminResult;
use crate::keys;
use crate::models::Patient;
use crate::mutation::MutationMessages;
use crate::views::resource::{Resource, ResourceDetail, ResourceList};
use crate::{Page, ServerMessage};

pub const NO_PATIENTS: &str = "No patients found";

pub type PatientsList = ResourceList<Patient>;
pub type PatientDetail = ResourceDetail<Patient>;

impl Resource for Patient {
    const EMPTY: &'static str = NO_PATIENTS;
    const TOGGLE_MESSAGES: MutationMessages = MutationMessages {
        success: "Patient status updated successfully",
        failure: "Failed to update patient status",
    };

    fn list_key(page: u32, name: &str) -> QueryKey {
        keys::patients(page, name)
    }

    fn all() -> QueryKey {
        keys::all_patients()
    }

    fn detail_key(id: &str) -> QueryKey {
        keys::patient(id)
    }

    fn fetch_page(api: AdminApi, name: String, page: u32) -> BoxFuture<'static, AdminResult<Page<Self>>> {
        async move { api.patients(&name, page, PATIENTS_PAGE_SIZE).await }.boxed()
    }

    fn fetch_one(api: AdminApi, id: String) -> BoxFuture<'static, AdminResult<Self>> {
        async move { api.patient(&id).await }.boxed()
    }

    fn toggle_block(api: AdminApi, id: String) -> BoxFuture<'static, AdminResult<ServerMessage>> {
        async move { api.toggle_patient_block(&id).await }.boxed()
    }

    fn is_blocked(&self) -> bool {
        self.is_blocked
    }
}
