pub mod auth_handlers;
pub mod jwt;
pub mod view_handlers;

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub type ApiError = (StatusCode, Json<Value>);
pub type ApiResult = Result<Json<Value>, ApiError>;

pub fn error(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "message": message })))
}

/// Wraps a payload the way every endpoint answers: `{ "data": ..., "message": ... }`.
pub fn envelope<T: Serialize>(data: T, message: &str) -> ApiResult {
    let data = serde_json::to_value(data)
        .map_err(|_| error(StatusCode::INTERNAL_SERVER_ERROR, "Serialization error"))?;
    Ok(Json(json!({ "data": data, "message": message })))
}

fn first_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    10
}

#[derive(Deserialize, Debug)]
pub struct ListQuery {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "pageNumber", default = "first_page")]
    pub page: u32,
    #[serde(rename = "pageSize", default = "default_page_size")]
    pub page_size: u32,
}

/// `{ items, total_pages }` for 1-based `page`; past-the-end pages are empty.
pub fn paginate<T: Serialize>(mut items: Vec<T>, page: u32, page_size: u32) -> Value {
    let size = page_size.max(1) as usize;
    let total_pages = items.len().div_ceil(size);
    let start = (page.max(1) as usize - 1).saturating_mul(size);
    let rows: Vec<T> = if start < items.len() {
        items.drain(start..).take(size).collect()
    } else {
        Vec::new()
    };
    json!({ "items": rows, "total_pages": total_pages })
}

pub fn name_matches(name: Option<&str>, filter: &str) -> bool {
    let filter = filter.trim().to_lowercase();
    filter.is_empty() || name.is_some_and(|n| n.to_lowercase().contains(&filter))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginates_with_ceiling_page_count() {
        let page = paginate((1..=14).collect::<Vec<u32>>(), 3, 6);
        assert_eq!(page["total_pages"], 3);
        assert_eq!(page["items"], json!([13, 14]));

        let past_end = paginate(vec![1, 2], 4, 6);
        assert_eq!(past_end["items"], json!([]));
        assert_eq!(past_end["total_pages"], 1);
    }

    #[test]
    fn name_filter_ignores_case() {
        assert!(name_matches(Some("Alice Brown"), "ALI"));
        assert!(!name_matches(None, "ali"));
        assert!(name_matches(None, ""));
    }
}
