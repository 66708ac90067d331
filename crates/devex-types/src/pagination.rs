use serde::{Deserialize, Serialize};

/// Page/page-size parameters for listing operations.
///
/// Pages are 1-based. Defaults: page 1, page size 10. A `page_size` of zero
/// is treated as the default by [`Pagination::normalized`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
}

pub const DEFAULT_PAGE_SIZE: usize = 10;

impl Pagination {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self { page, page_size }
    }

    /// First page with the given size.
    pub fn first(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size,
        }
    }

    /// Clamp degenerate values: page 0 becomes 1, size 0 becomes the default.
    pub fn normalized(self) -> Self {
        Self {
            page: self.page.max(1),
            page_size: if self.page_size == 0 {
                DEFAULT_PAGE_SIZE
            } else {
                self.page_size
            },
        }
    }

    /// Number of records to skip before this page.
    pub fn skip(&self) -> usize {
        let p = self.normalized();
        (p.page - 1) * p.page_size
    }

    /// Whether a page after this one exists, under the total-count policy:
    /// true iff the total matching count exceeds the records consumed
    /// through this page.
    pub fn has_next(&self, total: usize, returned: usize) -> bool {
        total > self.skip() + returned
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results plus the next-page flag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    /// Total records matching the query, across all pages.
    pub total: usize,
    pub has_next: bool,
}

impl<T> Paged<T> {
    /// Assemble a page, deriving `has_next` from the total count.
    pub fn new(items: Vec<T>, total: usize, pagination: &Pagination) -> Self {
        let has_next = pagination.has_next(total, items.len());
        Self {
            items,
            total,
            has_next,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Map the items, keeping the page bookkeeping.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paged<U> {
        Paged {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            has_next: self.has_next,
        }
    }
}
