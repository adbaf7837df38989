use serde::{Deserialize, Serialize};

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

/// `page` / `limit` query parameters accepted by every list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Pagination {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }
}

/// Standard list envelope.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, pagination: &Pagination, total: i64) -> Self {
        Self {
            items,
            page: pagination.page(),
            limit: pagination.limit(),
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = Pagination::default();
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), 20);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_limit_clamped_to_max() {
        let p = Pagination {
            page: Some(2),
            limit: Some(500),
        };
        assert_eq!(p.limit(), 100);
        assert_eq!(p.offset(), 100);
    }

    #[test]
    fn test_nonpositive_values_normalized() {
        let p = Pagination {
            page: Some(0),
            limit: Some(-5),
        };
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), 1);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_offset_for_later_page() {
        let p = Pagination {
            page: Some(3),
            limit: Some(25),
        };
        assert_eq!(p.offset(), 50);
    }
}
