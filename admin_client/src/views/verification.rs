use crate::api::AdminApi;
use crate::cache::QueryObserver;
use crate::config::REQUESTS_PAGE_SIZE;
use crate::error::AdminResult;
use crate::keys;
use crate::models::VerificationRequest;
use crate::mutation::{MutationExecutor, MutationMessages};
use crate::views::render::{list_view, ListView, PaginationRule};
use crate::{AppContext, Page, ServerMessage};

pub const NO_REQUESTS: &str = "No verification requests available.";

const APPROVE_MESSAGES: MutationMessages = MutationMessages {
    success: "Doctor license approved",
    failure: "Failed to approve doctor license",
};

const REJECT_MESSAGES: MutationMessages = MutationMessages {
    success: "Doctor license rejected",
    failure: "Failed to reject doctor license",
};

/// Pending doctor-license requests with an approve/reject modal.
pub struct VerificationRequests {
    api: AdminApi,
    page: u32,
    observer: QueryObserver<Page<VerificationRequest>>,
    approve: MutationExecutor,
    reject: MutationExecutor,
    selected: Option<VerificationRequest>,
}

impl VerificationRequests {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            api: ctx.api.clone(),
            page: 1,
            observer: QueryObserver::new(ctx.cache.clone()),
            approve: MutationExecutor::new(ctx.cache.clone(), ctx.notifier.clone(), APPROVE_MESSAGES),
            reject: MutationExecutor::new(ctx.cache.clone(), ctx.notifier.clone(), REJECT_MESSAGES),
            selected: None,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub async fn load(&self) -> ListView<VerificationRequest> {
        let page = self.page;
        let api = self.api.clone();
        self.observer
            .mount(keys::requests(page), move || {
                let api = api.clone();
                async move { api.pending_verifications(page, REQUESTS_PAGE_SIZE).await }
            })
            .await;
        self.render()
    }

    pub fn render(&self) -> ListView<VerificationRequest> {
        list_view(&self.observer.state(), self.page, NO_REQUESTS, PaginationRule::AnyItems)
    }

    pub fn open(&mut self, request: VerificationRequest) {
        self.selected = Some(request);
    }

    pub fn close(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&VerificationRequest> {
        self.selected.as_ref()
    }

    pub fn is_modal_open(&self) -> bool {
        self.selected.is_some()
    }

    pub fn is_approving(&self) -> bool {
        self.approve.is_pending()
    }

    pub fn is_rejecting(&self) -> bool {
        self.reject.is_pending()
    }

    pub async fn approve(&mut self, dr_id: &str) -> AdminResult<ServerMessage> {
        let api = self.api.clone();
        let id = dr_id.to_string();
        let result = self
            .approve
            .mutate(&[keys::all_requests()], move || async move { api.approve_license(&id).await })
            .await;
        if result.is_ok() {
            self.close();
        }
        result
    }

    pub async fn reject(&mut self, dr_id: &str) -> AdminResult<ServerMessage> {
        let api = self.api.clone();
        let id = dr_id.to_string();
        let result = self
            .reject
            .mutate(&[keys::all_requests()], move || async move { api.reject_license(&id).await })
            .await;
        if result.is_ok() {
            self.close();
        }
        result
    }
}
