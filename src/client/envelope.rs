//! Response Envelopes
//!
//! Every Trackle endpoint wraps its payload in the same envelope. Lists
//! carry pagination metadata alongside it.

use serde::{Deserialize, Serialize};

use super::error::ErrorResponse;

/// Default page size used by the backend when none is given
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Largest page size the backend accepts
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Uniform response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default = "none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

// Keeps `T: Default` off the derived impl.
fn none<T>() -> Option<T> {
    None
}

impl<T> ApiResponse<T> {
    /// Envelope for a successful call with a payload
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
            status: None,
        }
    }

    /// Envelope for a 2xx reply that had no body at all
    pub(crate) fn empty() -> Self {
        Self {
            success: true,
            message: String::new(),
            data: None,
            error: None,
            status: None,
        }
    }

    /// Take the payload, or describe why there is none.
    ///
    /// A `success=false` envelope never yields data, even if the server
    /// sent some.
    pub fn into_data(self) -> Result<T, ErrorResponse> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err(ErrorResponse::new(
                if self.message.is_empty() {
                    "Response contained no data".to_string()
                } else {
                    self.message
                },
                "missing data",
                self.status.unwrap_or(0),
            )),
            (false, _) => Err(ErrorResponse::new(
                self.message,
                self.error.unwrap_or_default(),
                self.status.unwrap_or(0),
            )),
        }
    }
}

/// Envelope for list endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default = "none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
    pub total: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> PaginatedResponse<T> {
    /// Build a successful page, deriving the page counters from `total`
    pub fn from_page(message: impl Into<String>, data: T, pagination: Pagination) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
            page: pagination.page,
            limit: pagination.limit,
            total_pages: pagination.total_pages,
            total: pagination.total,
            has_next: pagination.has_next,
            has_prev: pagination.has_prev,
        }
    }

    /// Pagination metadata as reported by the server
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            limit: self.limit,
            total: self.total,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }

    /// Drop the pagination fields
    pub fn into_response(self) -> ApiResponse<T> {
        ApiResponse {
            success: self.success,
            message: self.message,
            data: self.data,
            error: self.error,
            status: None,
        }
    }
}

/// Page counters for a list result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    /// Derive the counters from a 1-based page, a page size and a total.
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let total_pages = total.div_ceil(u64::from(limit));

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: u64::from(page) < total_pages,
            has_prev: page > 1,
        }
    }

    /// Whether the server-reported counters agree with each other
    pub fn is_consistent(&self) -> bool {
        *self == Self::new(self.page, self.limit, self.total)
    }
}

/// A 1-based page selection for list wrappers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_PAGE_LIMIT),
        }
    }

    /// Same page size, one page further
    pub fn next(self) -> Self {
        Self::new(self.page.saturating_add(1), self.limit)
    }

    /// `page=..&limit=..` pairs
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![("page", self.page.to_string()), ("limit", self.limit.to_string())]
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pagination_middle_page() {
        let p = Pagination::new(2, 10, 25);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next);
        assert!(p.has_prev);
    }

    #[test]
    fn test_pagination_single_page() {
        let p = Pagination::new(1, 10, 5);
        assert_eq!(p.total_pages, 1);
        assert!(!p.has_next);
        assert!(!p.has_prev);
    }

    #[test]
    fn test_pagination_empty_and_last_page() {
        let empty = Pagination::new(1, 10, 0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next);

        let last = Pagination::new(3, 10, 30);
        assert_eq!(last.total_pages, 3);
        assert!(!last.has_next);
        assert!(last.has_prev);
    }

    #[test]
    fn test_pagination_clamps_page_and_limit() {
        let p = Pagination::new(0, 0, 4);
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 1);
        assert_eq!(p.total_pages, 4);
    }

    #[test]
    fn test_page_request_defaults_and_bounds() {
        assert_eq!(PageRequest::default(), PageRequest { page: 1, limit: 10 });
        assert_eq!(PageRequest::new(0, 500), PageRequest { page: 1, limit: 100 });
        assert_eq!(PageRequest::new(2, 20).next().page, 3);
    }

    #[test]
    fn test_envelope_with_missing_data() {
        let resp: ApiResponse<Vec<u32>> =
            serde_json::from_value(json!({"success": true, "message": "Deleted"})).unwrap();
        assert!(resp.success);
        assert_eq!(resp.data, None);

        let err = resp.into_data().unwrap_err();
        assert_eq!(err.message, "Deleted");
    }

    #[test]
    fn test_into_data_refuses_failed_envelope() {
        let resp: ApiResponse<u32> = serde_json::from_value(json!({
            "success": false,
            "message": "Template not found",
            "error": "not found",
            "data": 7
        }))
        .unwrap();

        let err = resp.into_data().unwrap_err();
        assert_eq!(err.message, "Template not found");
        assert_eq!(err.error, "not found");
        assert!(!err.success);
    }

    #[test]
    fn test_paginated_envelope_parses_backend_shape() {
        let resp: PaginatedResponse<Vec<String>> = serde_json::from_value(json!({
            "success": true,
            "message": "Exercises retrieved successfully",
            "data": ["Squat", "Deadlift"],
            "page": 2,
            "limit": 10,
            "total_pages": 3,
            "total": 25,
            "has_next": true,
            "has_prev": true
        }))
        .unwrap();

        let pagination = resp.pagination();
        assert!(pagination.is_consistent());
        assert_eq!(pagination, Pagination::new(2, 10, 25));
        assert_eq!(resp.into_response().data.unwrap().len(), 2);
    }
}
