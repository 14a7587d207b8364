use crate::cache::QueryState;
use crate::Page;

#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub total_pages: u32,
    pub show_pagination: bool,
}

/// What a list container shows in place of its table.
#[derive(Debug, Clone, PartialEq)]
pub enum ListView<T> {
    Loading,
    Error(String),
    Empty(&'static str),
    Ready(ListPage<T>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailView<T> {
    Loading,
    Error(String),
    Ready(T),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationRule {
    /// Controls appear only when there is somewhere else to go.
    MultiplePages,
    /// Controls appear whenever the page has rows.
    AnyItems,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleButton {
    pub label: &'static str,
    pub disabled: bool,
}

impl ToggleButton {
    pub fn for_blocked(is_blocked: bool, pending: bool) -> Self {
        Self {
            label: match (is_blocked, pending) {
                (true, true) => "Unblocking...",
                (false, true) => "Blocking...",
                (true, false) => "Unblock",
                (false, false) => "Block",
            },
            disabled: pending,
        }
    }
}

pub fn list_view<T: Clone>(
    state: &QueryState<Page<T>>,
    page: u32,
    empty: &'static str,
    rule: PaginationRule,
) -> ListView<T> {
    if let Some(error) = &state.error {
        return ListView::Error(error.clone());
    }
    let Some(data) = &state.data else {
        return ListView::Loading;
    };
    if data.items.is_empty() {
        return ListView::Empty(empty);
    }
    let show_pagination = match rule {
        PaginationRule::MultiplePages => data.total_pages > 1,
        PaginationRule::AnyItems => true,
    };
    ListView::Ready(ListPage {
        items: data.items.clone(),
        page,
        total_pages: data.total_pages,
        show_pagination,
    })
}

pub fn detail_view<T: Clone>(state: &QueryState<T>) -> DetailView<T> {
    if let Some(error) = &state.error {
        return DetailView::Error(error.clone());
    }
    match &state.data {
        Some(data) => DetailView::Ready((**data).clone()),
        None => DetailView::Loading,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn state(page: Option<Page<u8>>, error: Option<&str>) -> QueryState<Page<u8>> {
        QueryState {
            is_loading: page.is_none() && error.is_none(),
            data: page.map(Arc::new),
            is_fetching: false,
            error: error.map(str::to_owned),
        }
    }

    #[test]
    fn errors_win_over_stale_rows() {
        let s = state(Some(Page { items: vec![1], total_pages: 1 }), Some("boom"));
        assert_eq!(list_view(&s, 1, "none", PaginationRule::AnyItems), ListView::Error("boom".into()));
    }

    #[test]
    fn empty_page_is_not_an_error() {
        let s = state(Some(Page::default()), None);
        assert_eq!(list_view(&s, 1, "No patients found", PaginationRule::MultiplePages), ListView::Empty("No patients found"));
        assert_eq!(list_view::<u8>(&state(None, None), 1, "x", PaginationRule::AnyItems), ListView::Loading);
    }

    #[test]
    fn pagination_rules() {
        let single = state(Some(Page { items: vec![1], total_pages: 1 }), None);
        let ListView::Ready(page) = list_view(&single, 1, "", PaginationRule::MultiplePages) else {
            panic!("expected rows");
        };
        assert!(!page.show_pagination);
        let ListView::Ready(page) = list_view(&single, 1, "", PaginationRule::AnyItems) else {
            panic!("expected rows");
        };
        assert!(page.show_pagination);
    }

    #[test]
    fn toggle_button_follows_flag_and_pending() {
        assert_eq!(ToggleButton::for_blocked(true, false), ToggleButton { label: "Unblock", disabled: false });
        assert_eq!(ToggleButton::for_blocked(false, true), ToggleButton { label: "Blocking...", disabled: true });
    }
}
