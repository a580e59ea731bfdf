use serde::{Deserialize, Serialize};

/// Uniform response envelope: `{success, data, message?}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
        }
    }
}

/// Pagination metadata carried next to paginated data. Keys are camelCase
/// to match the client contract.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let total_pages = if limit > 0 { (total + limit - 1) / limit } else { 0 };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

/// `page`/`limit` query params. Limit is clamped, offset derived.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}
fn default_limit() -> i64 {
    20
}

impl PageQuery {
    pub fn clamped(&self) -> (i64, i64, i64) {
        let page = self.page.max(1);
        let limit = self.limit.clamp(1, 100);
        let offset = (page - 1) * limit;
        (page, limit, offset)
    }
}

#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T: Serialize> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, pagination: Pagination) -> Self {
        Self {
            success: true,
            data,
            pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_omits_absent_message() {
        let json = serde_json::to_string(&ApiResponse::ok(42)).unwrap();
        assert_eq!(json, r#"{"success":true,"data":42}"#);
    }

    #[test]
    fn envelope_carries_message() {
        let json =
            serde_json::to_string(&ApiResponse::with_message(1, "created")).unwrap();
        assert!(json.contains("\"message\":\"created\""));
    }

    #[test]
    fn pagination_uses_camel_case_total_pages() {
        let json = serde_json::to_string(&Pagination::new(2, 10, 45)).unwrap();
        assert!(json.contains("\"totalPages\":5"));
        assert!(json.contains("\"page\":2"));
    }

    #[test]
    fn page_query_clamps() {
        let q = PageQuery { page: 0, limit: 1000 };
        assert_eq!(q.clamped(), (1, 100, 0));
        let q = PageQuery { page: 2, limit: 10 };
        assert_eq!(q.clamped(), (2, 10, 10));
    }

    #[test]
    fn pagination_rounds_up_partial_pages() {
        assert_eq!(Pagination::new(1, 10, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 10, 1).total_pages, 1);
        assert_eq!(Pagination::new(1, 10, 10).total_pages, 1);
        assert_eq!(Pagination::new(1, 10, 11).total_pages, 2);
    }
}
