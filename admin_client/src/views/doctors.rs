use futures::future::{BoxFuture, FutureExt};

use crate::api::AdminApi;
use crate::cache::QueryKey;
use crate::config::DOCTORS_PAGE_SIZE;
use crate::error::AdminResult;
use crate::keys;
use crate::models::Doctor;
use crate::mutation::MutationMessages;
use crate::views::resource::{Resource, ResourceDetail, ResourceList};
use crate::{Page, ServerMessage};

pub const NO_DOCTORS: &str = "No doctors found";

pub type DoctorsList = ResourceList<Doctor>;
pub type DoctorDetail = ResourceDetail<Doctor>;

impl Resource for Doctor {
    const EMPTY: &'static str = NO_DOCTORS;
    const TOGGLE_MESSAGES: MutationMessages = MutationMessages {
        success: "Doctor status updated successfully",
        failure: "Failed to update doctor status",
    };

    fn list_key(page: u32, name: &str) -> QueryKey {
        keys::doctors(page, name)
    }

    fn all() -> QueryKey {
        keys::all_doctors()
    }

    fn detail_key(id: &str) -> QueryKey {
        keys::doctor(id)
    }

    fn fetch_page(api: AdminApi, name: String, page: u32) -> BoxFuture<'static, AdminResult<Page<Self>>> {
        async move { api.doctors(&name, page, DOCTORS_PAGE_SIZE).await }.boxed()
    }

    fn fetch_one(api: AdminApi, id: String) -> BoxFuture<'static, AdminResult<Self>> {
        async move { api.doctor(&id).await }.boxed()
    }

    fn toggle_block(api: AdminApi, id: String) -> BoxFuture<'static, AdminResult<ServerMessage>> {
        async move { api.toggle_doctor_block(&id).await }.boxed()
    }

    fn is_blocked(&self) -> bool {
        self.is_blocked
    }
}
