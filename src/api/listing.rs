//! List responses: flat arrays or paged envelopes.
//!
//! Some endpoints answer with a bare JSON array, others with a Spring-style
//! page (`{content, totalElements, totalPages, number}`). The shape is decided
//! once here and normalized into a [`Page`].

use serde::{Deserialize, Serialize};

/// Default page size, matching the server's default.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    /// Zero-based page number
    #[serde(default)]
    pub number: u32,
}

impl<T> Page<T> {
    pub fn is_first(&self) -> bool {
        self.number == 0
    }

    pub fn is_last(&self) -> bool {
        self.number.saturating_add(1) >= self.total_pages
    }
}

/// Either list shape the server may send.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Paged(Page<T>),
    Flat(Vec<T>),
}

impl<T> Listing<T> {
    /// Normalize into a page. A flat list is a single page numbered as requested.
    pub fn into_page(self, requested_page: u32) -> Page<T> {
        match self {
            Listing::Paged(page) => page,
            Listing::Flat(items) => Page {
                total_elements: items.len() as u64,
                total_pages: 1,
                number: requested_page,
                content: items,
            },
        }
    }

    /// Drop pagination metadata.
    pub fn into_items(self) -> Vec<T> {
        match self {
            Listing::Paged(page) => page.content,
            Listing::Flat(items) => items,
        }
    }
}

/// Pagination parameters for list calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    /// Sort property; `None` leaves ordering to the server
    pub sort: Option<String>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: Some("id".to_string()),
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            ..Self::default()
        }
    }

    pub fn with_sort(mut self, sort: Option<String>) -> Self {
        self.sort = sort;
        self
    }
}
