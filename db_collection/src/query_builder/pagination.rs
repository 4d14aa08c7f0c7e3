/// LIMIT / OFFSET of a statement
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Pagination {
    pub fn new() -> Self {
        Self::default()
    }

    /// Window for a 1-based page number. Pages below 1 are treated as 1 and
    /// the offset saturates at `i64::MAX`.
    pub fn page(page_size: i64, page: i64) -> Self {
        let page = page.max(1);
        Self {
            limit: Some(page_size),
            offset: Some((page - 1).saturating_mul(page_size)),
        }
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.limit.is_none() && self.offset.is_none()
    }
}
