//! List and detail containers for records an admin can block or unblock.

use futures::future::BoxFuture;
use tokio::sync::watch;

use crate::api::AdminApi;
use crate::cache::{QueryKey, QueryObserver, QueryState};
use crate::error::AdminResult;
use crate::mutation::{MutationExecutor, MutationMessages};
use crate::views::render::{detail_view, list_view, DetailView, ListView, PaginationRule, ToggleButton};
use crate::views::search::SearchPager;
use crate::{AppContext, Page, ServerMessage};

/// A searchable, paginated record type with a block/unblock switch.
pub trait Resource: Clone + Send + Sync + 'static {
    /// Shown instead of the table when a page has no rows.
    const EMPTY: &'static str;
    const TOGGLE_MESSAGES: MutationMessages;

    fn list_key(page: u32, name: &str) -> QueryKey;
    /// Prefix covering every list page and search.
    fn all() -> QueryKey;
    fn detail_key(id: &str) -> QueryKey;

    fn fetch_page(api: AdminApi, name: String, page: u32) -> BoxFuture<'static, AdminResult<Page<Self>>>;
    fn fetch_one(api: AdminApi, id: String) -> BoxFuture<'static, AdminResult<Self>>;
    fn toggle_block(api: AdminApi, id: String) -> BoxFuture<'static, AdminResult<ServerMessage>>;

    fn is_blocked(&self) -> bool;
}

pub struct ResourceList<R: Resource> {
    api: AdminApi,
    search: SearchPager,
    observer: QueryObserver<Page<R>>,
}

impl<R: Resource> ResourceList<R> {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            api: ctx.api.clone(),
            search: SearchPager::new(),
            observer: QueryObserver::new(ctx.cache.clone()),
        }
    }

    pub fn search(&self) -> &SearchPager {
        &self.search
    }

    pub fn search_mut(&mut self) -> &mut SearchPager {
        &mut self.search
    }

    pub fn set_page(&mut self, page: u32) {
        self.search.set_page(page);
    }

    /// Shows the current page and search; stays mounted, so it refreshes
    /// itself whenever a mutation invalidates it.
    pub async fn load(&self) -> ListView<R> {
        let page = self.search.page();
        let name = self.search.name().to_string();
        let key = R::list_key(page, &name);
        let api = self.api.clone();
        self.observer
            .mount(key, move || R::fetch_page(api.clone(), name.clone(), page))
            .await;
        self.render()
    }

    pub fn state(&self) -> QueryState<Page<R>> {
        self.observer.state()
    }

    pub fn updates(&self) -> watch::Receiver<u64> {
        self.observer.updates()
    }

    pub fn render(&self) -> ListView<R> {
        list_view(&self.observer.state(), self.search.page(), R::EMPTY, PaginationRule::MultiplePages)
    }
}

pub struct ResourceDetail<R: Resource> {
    id: String,
    api: AdminApi,
    observer: QueryObserver<R>,
    toggle: MutationExecutor,
}

impl<R: Resource> ResourceDetail<R> {
    pub fn new(ctx: &AppContext, id: &str) -> Self {
        Self {
            id: id.to_string(),
            api: ctx.api.clone(),
            observer: QueryObserver::new(ctx.cache.clone()),
            toggle: MutationExecutor::new(ctx.cache.clone(), ctx.notifier.clone(), R::TOGGLE_MESSAGES),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub async fn load(&self) -> DetailView<R> {
        let api = self.api.clone();
        let id = self.id.clone();
        self.observer
            .mount(R::detail_key(&self.id), move || R::fetch_one(api.clone(), id.clone()))
            .await;
        self.render()
    }

    pub fn updates(&self) -> watch::Receiver<u64> {
        self.observer.updates()
    }

    pub fn render(&self) -> DetailView<R> {
        detail_view(&self.observer.state())
    }

    pub fn toggle_button(&self) -> ToggleButton {
        let blocked = self.observer.state().data.is_some_and(|r| r.is_blocked());
        ToggleButton::for_blocked(blocked, self.toggle.is_pending())
    }

    /// Flips the blocked flag; this record and every list page refetch.
    pub async fn toggle_block(&self) -> AdminResult<ServerMessage> {
        let api = self.api.clone();
        let id = self.id.clone();
        self.toggle
            .mutate(&[R::detail_key(&self.id), R::all()], move || R::toggle_block(api, id))
            .await
    }
}
