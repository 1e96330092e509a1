//! # Cursor Pagination
//!
//! Keyset pagination over time-ordered entities, shared by every list-read
//! operation. Pages walk backward in time: rows are fetched strictly older
//! than the cursor, descending by the key field. This bounds worst-case scan
//! cost and avoids the shifting-page problem offset pagination has under
//! concurrent inserts.
//!
//! Stores fetch `limit + 1` rows and hand them to [`paginate`], which decides
//! `has_more` and derives the next cursor from the last returned row.

use crate::constants::defaults;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Caller-supplied paging parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageRequest {
    /// Maximum rows to return; `None` means [`defaults::PAGE_LIMIT`].
    pub limit: Option<usize>,
    /// Return only rows strictly older than this key value.
    pub cursor: Option<DateTime<Utc>>,
}

impl PageRequest {
    pub fn new(limit: Option<usize>, cursor: Option<DateTime<Utc>>) -> Self {
        Self { limit, cursor }
    }

    /// Effective page size, never zero.
    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(defaults::PAGE_LIMIT).max(1)
    }
}

/// One page of a descending time-ordered listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorPage<T> {
    pub data: Vec<T>,
    /// Key of the last returned row when more rows exist, else `None`.
    pub next_cursor: Option<DateTime<Utc>>,
    pub has_more: bool,
}

impl<T> CursorPage<T> {
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            next_cursor: None,
            has_more: false,
        }
    }
}

/// Shape a `limit + 1` fetch into a page.
///
/// `rows` must already be ordered descending by the key field; `key` extracts
/// that field from a row.
pub fn paginate<T, F>(mut rows: Vec<T>, limit: usize, key: F) -> CursorPage<T>
where
    F: Fn(&T) -> DateTime<Utc>,
{
    let has_more = rows.len() > limit;
    if has_more {
        rows.truncate(limit);
    }
    let next_cursor = if has_more { rows.last().map(&key) } else { None };

    CursorPage {
        data: rows,
        next_cursor,
        has_more,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn full_page_carries_cursor_of_last_row() {
        // Six rows fetched for limit 5, descending keys.
        let rows: Vec<DateTime<Utc>> = (0..6).map(|i| ts(100 - i)).collect();
        let page = paginate(rows, 5, |row| *row);

        assert_eq!(page.data.len(), 5);
        assert!(page.has_more);
        assert_eq!(page.next_cursor, Some(ts(96)));
    }

    #[test]
    fn short_page_has_no_cursor() {
        let rows = vec![ts(3), ts(2)];
        let page = paginate(rows, 5, |row| *row);

        assert_eq!(page.data.len(), 2);
        assert!(!page.has_more);
        assert_eq!(page.next_cursor, None);
    }

    #[test]
    fn exact_limit_fetch_is_the_last_page() {
        let rows = vec![ts(3), ts(2), ts(1)];
        let page = paginate(rows, 3, |row| *row);

        assert!(!page.has_more);
        assert_eq!(page.next_cursor, None);
        assert_eq!(page.data.len(), 3);
    }

    #[test]
    fn effective_limit_never_zero() {
        assert_eq!(PageRequest::new(Some(0), None).effective_limit(), 1);
        assert_eq!(PageRequest::default().effective_limit(), defaults::PAGE_LIMIT);
    }
}
