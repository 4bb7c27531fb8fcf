//! Paging types for repository reads

use serde::{Deserialize, Serialize};

/// Sort direction for paged queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

/// A page request: zero-based page number, page size, optional sort field.
///
/// Sort fields are whitelisted by each repository; an unknown field falls
/// back to `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort_by: Option<String>,
    pub direction: SortDirection,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            sort_by: None,
            direction: SortDirection::Ascending,
        }
    }

    pub fn sorted_by(page: u32, size: u32, field: &str, direction: SortDirection) -> Self {
        Self {
            page,
            size,
            sort_by: Some(field.to_string()),
            direction,
        }
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, 20)
    }
}

/// A page of results with total-count metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: i64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: i64) -> Self {
        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn total_pages(&self) -> i64 {
        if self.size == 0 {
            0
        } else {
            (self.total_elements + i64::from(self.size) - 1) / i64::from(self.size)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_page_times_size() {
        let request = PageRequest::new(3, 25);
        assert_eq!(request.offset(), 75);
        assert_eq!(request.limit(), 25);
    }

    #[test]
    fn total_pages_rounds_up() {
        let request = PageRequest::new(0, 10);
        let page: Page<i32> = Page::new(vec![], &request, 21);
        assert_eq!(page.total_pages(), 3);
    }
}
