//! Paginated list responses

use serde::{Deserialize, Serialize};

/// Pagination metadata returned alongside list data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    #[serde(default)]
    pub total: u64,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    /// The backend sends 0 for an empty list
    #[serde(default)]
    pub total_pages: u32,
}

fn default_page() -> u32 {
    1
}

impl PageMeta {
    pub fn new(total: u64, page: u32, limit: u32) -> Self {
        let total_pages = if limit > 0 {
            total.div_ceil(limit as u64) as u32
        } else {
            1
        };
        Self {
            total,
            page,
            limit,
            total_pages,
        }
    }

    /// Page count for display: never below 1
    pub fn page_count(&self) -> u32 {
        self.total_pages.max(1)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count()
    }
}

/// List response: `{ "data": [...], "meta": {...} }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        Self {
            data,
            meta: PageMeta::new(total, page, limit),
        }
    }

    /// Single page response (no pagination)
    pub fn single_page(data: Vec<T>) -> Self {
        let total = data.len() as u64;
        Self {
            meta: PageMeta::new(total, 1, total as u32),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginated_response() {
        let resp = PaginatedResponse::new(vec!["a", "b", "c"], 95, 2, 10);
        assert_eq!(resp.meta.total, 95);
        assert_eq!(resp.meta.page, 2);
        assert_eq!(resp.meta.total_pages, 10);
        assert!(resp.meta.has_next());
    }

    #[test]
    fn test_empty_list_page_count() {
        let meta: PageMeta = serde_json::from_str(r#"{"total":0,"totalPages":0}"#).unwrap();
        assert_eq!(meta.page, 1);
        assert_eq!(meta.page_count(), 1);
        assert!(!meta.has_next());
    }

    #[test]
    fn test_single_page() {
        let resp = PaginatedResponse::single_page(vec![1, 2]);
        assert_eq!(resp.meta.total_pages, 1);
        assert_eq!(resp.meta.limit, 2);
    }
}
