use crate::api::AdminApi;
use crate::cache::QueryObserver;
use crate::config::DASHBOARD_PAGE_SIZE;
use crate::keys;
use crate::models::{DashboardSummary, PaymentRecord};
use crate::AppContext;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardPage {
    pub summary: DashboardSummary,
    pub page: u32,
    pub show_pagination: bool,
}

impl DashboardPage {
    pub fn payments(&self) -> &[PaymentRecord] {
        &self.summary.payments.items
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView {
    Loading,
    Error(String),
    Ready(DashboardPage),
}

/// Revenue and appointment totals with a paginated payments table.
pub struct Dashboard {
    api: AdminApi,
    page: u32,
    observer: QueryObserver<DashboardSummary>,
    selected: Option<PaymentRecord>,
}

impl Dashboard {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            api: ctx.api.clone(),
            page: 1,
            observer: QueryObserver::new(ctx.cache.clone()),
            selected: None,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub async fn load(&self) -> DashboardView {
        let page = self.page;
        let api = self.api.clone();
        self.observer
            .mount(keys::dashboard(page), move || {
                let api = api.clone();
                async move { api.dashboard(page, DASHBOARD_PAGE_SIZE).await }
            })
            .await;
        self.render()
    }

    pub fn render(&self) -> DashboardView {
        let state = self.observer.state();
        if let Some(error) = state.error {
            return DashboardView::Error(error);
        }
        match state.data {
            Some(summary) => DashboardView::Ready(DashboardPage {
                show_pagination: summary.payments.total_pages > 1,
                summary: (*summary).clone(),
                page: self.page,
            }),
            None => DashboardView::Loading,
        }
    }

    /// Opens the detail panel for a row of the payments table.
    pub fn select_payment(&mut self, payment_id: &str) -> Option<&PaymentRecord> {
        self.selected = match self.observer.state().data {
            Some(summary) => summary.payments.items.iter().find(|p| p.id == payment_id).cloned(),
            None => None,
        };
        self.selected.as_ref()
    }

    pub fn selected_payment(&self) -> Option<&PaymentRecord> {
        self.selected.as_ref()
    }

    pub fn close_payment(&mut self) {
        self.selected = None;
    }
}
