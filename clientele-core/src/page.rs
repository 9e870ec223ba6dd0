//! Pagination types.
//!
//! A [`PageRequest`] names one 0-indexed slice of a result set, optionally sorted.
//! Backends answer it with a [`Page`] carrying the slice plus navigation metadata.

use serde::{Deserialize, Serialize};

use crate::{
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Query, Sort},
};

/// A single page of paginated results.
///
/// # Example
///
/// ```ignore
/// use clientele_core::page::Page;
///
/// let page: Page<String> = Page::builder(vec!["item1".to_string()])
///     .with_count(100)
///     .with_next_page(Some(1))
///     .build();
///
/// assert_eq!(page.items.len(), 1);
/// assert_eq!(page.count, 100);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// The items contained in this page.
    pub items: Vec<T>,
    /// Total count of items across all pages.
    pub count: usize,
    /// The next page number (if more pages exist).
    pub next_page: Option<usize>,
    /// The previous page number (if this is not the first page).
    pub previous_page: Option<usize>,
}

impl<T> Page<T> {
    pub fn builder(items: Vec<T>) -> PageBuilder<T> {
        PageBuilder::new(items)
    }

    /// Maps every item of this page, keeping the navigation metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            count: self.count,
            next_page: self.next_page,
            previous_page: self.previous_page,
        }
    }

    /// Consumes the page, returning only its items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            count: 0,
            next_page: None,
            previous_page: None,
        }
    }
}

/// Builder for constructing [`Page`] instances.
pub struct PageBuilder<T> {
    items: Vec<T>,
    count: usize,
    next_page: Option<usize>,
    previous_page: Option<usize>,
}

impl<T> PageBuilder<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            count: 0,
            next_page: None,
            previous_page: None,
        }
    }

    /// Sets the total count of items across all pages.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Sets the next page number (or `None` if this is the last page).
    pub fn with_next_page(mut self, next_page: Option<usize>) -> Self {
        self.next_page = next_page;
        self
    }

    /// Sets the previous page number (or `None` if this is the first page).
    pub fn with_previous_page(mut self, previous_page: Option<usize>) -> Self {
        self.previous_page = previous_page;
        self
    }

    pub fn build(self) -> Page<T> {
        Page {
            items: self.items,
            count: self.count,
            next_page: self.next_page,
            previous_page: self.previous_page,
        }
    }
}

/// A request for one page of a result set.
///
/// Pages are 0-indexed: page 0 is the first page. The offset of a page is
/// `page * size`. `size` is always at least 1.
///
/// # Example
///
/// ```ignore
/// use clientele_core::{page::PageRequest, query::Sort};
///
/// let request = PageRequest::sorted(2, 20, vec![Sort::asc("lastName")])?;
/// assert_eq!(request.offset(), 40);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PageRequest {
    page: usize,
    size: usize,
    sort: Vec<Sort>,
}

impl PageRequest {
    /// Creates an unsorted page request.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::InvalidPageRequest`] if `size` is zero.
    pub fn of(page: usize, size: usize) -> DocumentStoreResult<Self> {
        Self::sorted(page, size, Vec::new())
    }

    /// Creates a page request whose results are ordered by `sort`.
    ///
    /// An empty `sort` is equivalent to [`PageRequest::of`].
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::InvalidPageRequest`] if `size` is zero.
    pub fn sorted(page: usize, size: usize, sort: Vec<Sort>) -> DocumentStoreResult<Self> {
        if size == 0 {
            return Err(DocumentStoreError::InvalidPageRequest(
                "page size must be at least one".to_string(),
            ));
        }

        Ok(Self { page, size, sort })
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn sort(&self) -> &[Sort] {
        &self.sort
    }

    /// Number of items to skip before this page starts.
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }

    /// Builds the store query selecting this page.
    pub fn to_query(&self) -> Query {
        Query::builder()
            .offset(self.offset())
            .limit(self.size)
            .sort_by(self.sort.iter().cloned())
            .build()
    }

    /// Wraps the items fetched for this page, given the total number of items
    /// across all pages.
    pub fn to_page<T>(&self, items: Vec<T>, total: usize) -> Page<T> {
        let end = self.offset().saturating_add(items.len());

        Page::builder(items)
            .with_count(total)
            .with_next_page(if end < total { Some(self.page + 1) } else { None })
            .with_previous_page(if self.page > 0 { Some(self.page - 1) } else { None })
            .build()
    }
}
