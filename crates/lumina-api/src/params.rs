use crate::ApiError;
use std::collections::HashMap;

/// Sentinel category value that disables the category filter.
pub const CATEGORY_ALL: &str = "All";

pub const SEARCH_MAX_LEN: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListBooksParams {
    /// Case-insensitive substring matched against title OR author.
    pub search: Option<String>,
    /// Exact-match category filter; `None` when absent or `"All"`.
    pub category: Option<String>,
}

pub fn parse_list_books_params(
    query: &HashMap<String, String>,
) -> Result<ListBooksParams, ApiError> {
    let search = match query.get("search") {
        Some(raw) if !raw.trim().is_empty() => {
            if raw.len() > SEARCH_MAX_LEN {
                return Err(ApiError::validation(format!(
                    "search exceeds max length {SEARCH_MAX_LEN}"
                )));
            }
            Some(raw.trim().to_string())
        }
        _ => None,
    };
    let category = match query.get("category") {
        Some(raw) if !raw.trim().is_empty() && raw.trim() != CATEGORY_ALL => {
            Some(raw.trim().to_string())
        }
        _ => None,
    };
    Ok(ListBooksParams { search, category })
}
