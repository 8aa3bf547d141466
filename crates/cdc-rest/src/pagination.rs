//! Paged endpoint collection

use std::future::Future;
use tracing::{debug, warn};

use crate::error::RestResult;

/// One page of a paged endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Total number of items reported by the server
    pub total: usize,
    /// Items on this page
    pub items: Vec<T>,
}

impl<T> Page<T> {
    /// Create a page
    pub fn new(total: usize, items: Vec<T>) -> Self {
        Self { total, items }
    }
}

/// Fetch pages 0, 1, 2, ... until the total reported by the first page is
/// reached
///
/// The first error aborts the collection. A page with no items ends it early,
/// so a server reporting a total it never delivers cannot loop forever.
pub async fn collect_pages<T, F, Fut>(mut fetch: F) -> RestResult<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = RestResult<Page<T>>>,
{
    let first = fetch(0).await?;
    let total = first.total;
    let mut items = first.items;
    let mut page = 0;

    while items.len() < total {
        page += 1;
        let next = fetch(page).await?;
        if next.items.is_empty() {
            warn!(page, collected = items.len(), total, "empty page before total reached");
            break;
        }
        items.extend(next.items);
    }

    debug!(pages = page + 1, collected = items.len(), "pagination complete");
    Ok(items)
}
