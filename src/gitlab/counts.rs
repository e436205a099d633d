//! Count Strategies
//!
//! The platform exposes exact totals for most collections through the
//! `X-Total` header. Some aggregates (comment and approval counts) only exist
//! per item, so they are summed over a bounded number of pages. Collections
//! larger than `page_size * max_pages` items are undercounted; that is
//! accepted in exchange for a fixed worst-case request cost per repository.

use super::error::FetchResult;
use super::pagination::{fetch_page, PageRequest, MAX_PAGE_SIZE};
use super::transport::Transport;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_PAGE_SIZE: u32 = MAX_PAGE_SIZE;
pub const DEFAULT_MAX_PAGES: u32 = 10;

/// Page budget for bounded summation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountLimits {
    pub page_size: u32,
    pub max_pages: u32,
}

impl Default for CountLimits {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl CountLimits {
    pub fn new(page_size: u32, max_pages: u32) -> Self {
        Self {
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            max_pages: max_pages.max(1),
        }
    }

    /// Most items a bounded summation will ever look at
    pub fn item_budget(&self) -> u64 {
        self.page_size as u64 * self.max_pages as u64
    }
}

/// Result of a bounded summation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SumOutcome {
    pub total: u64,
    /// Items remain beyond the page budget, so `total` is a lower bound
    pub truncated: bool,
}

/// Exact collection size from a single `per_page=1` request.
///
/// Returns 0 when the header is missing or the request fails; the item array
/// in the body is never used as a fallback.
pub async fn header_count(
    transport: &dyn Transport,
    path: &str,
    extra: &[(String, String)],
) -> u64 {
    let mut query: Vec<(String, String)> = extra.to_vec();
    query.push(("page".to_string(), "1".to_string()));
    query.push(("per_page".to_string(), "1".to_string()));

    match transport.get(path, &query).await {
        Ok(response) => match response.total_count() {
            Some(total) => total,
            None => {
                log::debug!("No total header for {}", path);
                0
            }
        },
        Err(e) => {
            log::debug!("Header count for {} unavailable: {}", path, e);
            0
        }
    }
}

/// Sum `field(item)` over at most `limits.max_pages` pages.
///
/// Stops early on an empty or short page. Any page failure is returned as an
/// error; no partial sum is reported. Sums saturate at `u64::MAX`.
pub async fn bounded_sum<F>(
    transport: &dyn Transport,
    path: &str,
    extra: &[(String, String)],
    limits: CountLimits,
    field: F,
) -> FetchResult<SumOutcome>
where
    F: Fn(&Value) -> u64 + Send + Sync,
{
    let (total, truncated) = bounded_fold(transport, path, extra, limits, 0u64, |total, item| {
        total.saturating_add(field(item))
    })
    .await?;
    Ok(SumOutcome { total, truncated })
}

/// Fold every item of at most `limits.max_pages` pages into `acc`.
///
/// Returns the accumulator and whether items remain beyond the budget. When
/// the last budgeted page is full, one single-item request past the budget
/// decides that; if that request fails the result is marked truncated.
pub async fn bounded_fold<A, F>(
    transport: &dyn Transport,
    path: &str,
    extra: &[(String, String)],
    limits: CountLimits,
    mut acc: A,
    fold: F,
) -> FetchResult<(A, bool)>
where
    A: Send,
    F: Fn(A, &Value) -> A + Send + Sync,
{
    let mut request = PageRequest::first(limits.page_size);

    for page_index in 1..=limits.max_pages {
        let page = fetch_page(transport, path, request, extra).await?;
        if page.is_empty() {
            return Ok((acc, false));
        }

        acc = page.items.iter().fold(acc, &fold);

        if page.is_last(request) {
            return Ok((acc, false));
        }
        if page_index == limits.max_pages {
            break;
        }
        request = request.next();
    }

    let truncated = items_beyond_budget(transport, path, extra, limits).await;
    if truncated {
        log::debug!(
            "Summation over {} stopped at {} pages; total is a lower bound",
            path,
            limits.max_pages
        );
    }
    Ok((acc, truncated))
}

async fn items_beyond_budget(
    transport: &dyn Transport,
    path: &str,
    extra: &[(String, String)],
    limits: CountLimits,
) -> bool {
    let next_item = limits.item_budget().saturating_add(1);
    let Ok(page_number) = u32::try_from(next_item) else {
        return true;
    };
    match fetch_page(transport, path, PageRequest::new(page_number, 1), extra).await {
        Ok(page) => !page.is_empty(),
        Err(e) => {
            log::debug!("End check for {} failed: {}", path, e);
            true
        }
    }
}

/// True when a one-item listing returns at least one item
pub async fn has_any(
    transport: &dyn Transport,
    path: &str,
    extra: &[(String, String)],
) -> FetchResult<bool> {
    let page = fetch_page(transport, path, PageRequest::first(1), extra).await?;
    Ok(!page.is_empty())
}

/// Non-negative integer field; anything else counts as 0
pub fn numeric_field(name: &'static str) -> impl Fn(&Value) -> u64 + Send + Sync {
    move |item: &Value| item.get(name).and_then(Value::as_u64).unwrap_or(0)
}

/// Length of an array field; anything else counts as 0
pub fn array_len_field(name: &'static str) -> impl Fn(&Value) -> u64 + Send + Sync {
    move |item: &Value| {
        item.get(name)
            .and_then(Value::as_array)
            .map(|a| a.len() as u64)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_limits_clamp() {
        let limits = CountLimits::new(500, 0);
        assert_eq!(limits.page_size, MAX_PAGE_SIZE);
        assert_eq!(limits.max_pages, 1);
        assert_eq!(CountLimits::default().item_budget(), 1000);
    }

    #[test]
    fn test_numeric_field() {
        let notes = numeric_field("user_notes_count");
        assert_eq!(notes(&json!({"user_notes_count": 4})), 4);
        assert_eq!(notes(&json!({"user_notes_count": -2})), 0);
        assert_eq!(notes(&json!({"user_notes_count": "4"})), 0);
        assert_eq!(notes(&json!({})), 0);
    }

    #[test]
    fn test_array_len_field() {
        let approvals = array_len_field("approved_by");
        assert_eq!(approvals(&json!({"approved_by": [{}, {}]})), 2);
        assert_eq!(approvals(&json!({"approved_by": null})), 0);
        assert_eq!(approvals(&json!({"upvotes": 9})), 0);
    }
}
