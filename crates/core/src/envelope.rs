//! Paginated result envelope returned by every catalogue list query.

use serde::{Deserialize, Serialize};

use crate::query::QueryPlan;

/// `{ items, totalItems, totalPages, page }`.
///
/// `items.len()` never exceeds the page size of the query that produced it.
/// Totals always describe the filtered set, not the whole catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub items: Vec<T>,
    pub total_items: i64,
    pub total_pages: i64,
    pub page: i64,
}

impl<T> Envelope<T> {
    /// Wrap one page of results for `plan`, given the filtered total.
    pub fn new(items: Vec<T>, total_items: i64, plan: &QueryPlan) -> Self {
        Self {
            items,
            total_items,
            total_pages: plan.total_pages(total_items),
            page: plan.page,
        }
    }

    /// An empty result for `page`.
    pub fn empty(page: i64) -> Self {
        Self {
            items: Vec::new(),
            total_items: 0,
            total_pages: 1,
            page,
        }
    }

    /// Normalize a legacy bare-array response into a single-page envelope.
    pub fn from_bare(items: Vec<T>) -> Self {
        let total_items = items.len() as i64;
        Self {
            items,
            total_items,
            total_pages: 1,
            page: 1,
        }
    }

    /// Transform the items, keeping the pagination metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Envelope<U> {
        Envelope {
            items: self.items.into_iter().map(f).collect(),
            total_items: self.total_items,
            total_pages: self.total_pages,
            page: self.page,
        }
    }
}
