//! Feed paging.

/// Rows per feed page when the client does not ask for a size.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Largest page a client may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// One page of a list, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub per_page: u32,
    pub page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PAGE_SIZE,
            page: 1,
        }
    }
}

impl PageRequest {
    /// Build from optional query values. Missing values take the defaults and
    /// out-of-range values are pulled back into range.
    pub fn from_query(per_page: Option<u32>, page: Option<u32>) -> Self {
        Self {
            per_page: per_page.unwrap_or(DEFAULT_PAGE_SIZE),
            page: page.unwrap_or(1),
        }
        .clamped()
    }

    pub fn clamped(self) -> Self {
        Self {
            per_page: self.per_page.clamp(1, MAX_PAGE_SIZE),
            page: self.page.max(1),
        }
    }

    /// Rows to skip before this page.
    pub fn offset(self) -> u64 {
        let p = self.clamped();
        u64::from(p.page - 1) * u64::from(p.per_page)
    }

    pub fn limit(self) -> u64 {
        u64::from(self.clamped().per_page)
    }
}
