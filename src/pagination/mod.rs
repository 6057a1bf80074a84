//! Pagination handling for the Smartsheet API.
//!
//! Listings are page-number based: a request carries `page` and `pageSize`
//! and the response reports `pageNumber` and `totalPages`.

use crate::errors::SmartsheetResult;
use crate::serialization::PagedResult;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Pagination parameters for list requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    /// Page to return, starting at 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Number of items per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    /// Return every item in one page; `page` and `pageSize` are ignored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_all: Option<bool>,
}

impl PaginationParams {
    /// Creates new pagination parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests every item in a single page.
    pub fn all() -> Self {
        Self {
            include_all: Some(true),
            ..Self::default()
        }
    }

    /// Sets the page number.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }
}

/// Walks a paged listing one page at a time.
///
/// The fetch function receives the parameters for the next page. Iteration
/// ends after the page whose number reaches `totalPages`.
pub struct PageIterator<T, F>
where
    F: FnMut(PaginationParams) -> SmartsheetResult<PagedResult<T>>,
{
    fetch_fn: F,
    params: PaginationParams,
    done: bool,
    _marker: PhantomData<T>,
}

impl<T, F> PageIterator<T, F>
where
    F: FnMut(PaginationParams) -> SmartsheetResult<PagedResult<T>>,
{
    /// Creates a new page iterator starting at page 1.
    pub fn new(fetch_fn: F) -> Self {
        Self::with_params(PaginationParams::new(), fetch_fn)
    }

    /// Creates a page iterator with an initial page size or page.
    pub fn with_params(params: PaginationParams, fetch_fn: F) -> Self {
        Self {
            fetch_fn,
            params: PaginationParams {
                page: Some(params.page.unwrap_or(1)),
                include_all: None,
                ..params
            },
            done: false,
            _marker: PhantomData,
        }
    }

    /// Fetches the next page of results.
    pub fn next_page(&mut self) -> SmartsheetResult<Option<PagedResult<T>>> {
        if self.done {
            return Ok(None);
        }

        let page = match (self.fetch_fn)(self.params) {
            Ok(page) => page,
            Err(e) => {
                self.done = true;
                return Err(e);
            }
        };

        let requested = self.params.page.unwrap_or(1);
        let next = page.page_number.saturating_add(1);
        if page.has_next_page() && next > requested {
            self.params.page = Some(next);
        } else {
            self.done = true;
        }

        Ok(Some(page))
    }

    /// Collects all remaining items from all pages.
    pub fn collect_all(&mut self) -> SmartsheetResult<Vec<T>> {
        let mut all_items = Vec::new();

        while let Some(page) = self.next_page()? {
            all_items.extend(page.data);
        }

        Ok(all_items)
    }

    /// Returns true if there are more pages to fetch.
    pub fn has_next(&self) -> bool {
        !self.done
    }
}

impl<T, F> Iterator for PageIterator<T, F>
where
    F: FnMut(PaginationParams) -> SmartsheetResult<PagedResult<T>>,
{
    type Item = SmartsheetResult<PagedResult<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_page().transpose()
    }
}
