//! Cursor-following bookkeeping
//!
//! The shell owns the network calls; this module decides when to stop.
//! A loop ends when the server returns an empty or absent cursor, repeats the
//! cursor it was just given, or the page cap is reached.

use serde::Serialize;

/// Upper bound on pages fetched by one cursor loop.
pub const MAX_PAGES: usize = 100;

/// One page of a listing call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Cursor for the next page; `None` when the server sent none or `""`.
    pub cursor: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, cursor: impl Into<String>) -> Self {
        let cursor = cursor.into();
        Self {
            items,
            cursor: Some(cursor).filter(|c| !c.trim().is_empty()),
        }
    }
}

/// Why a cursor loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StopReason {
    /// The last page carried no cursor.
    Exhausted,
    /// The server handed back the cursor it was called with.
    RepeatedCursor,
    /// [`MAX_PAGES`] (or the configured cap) was reached.
    PageCap,
    /// A page fetch failed; items collected so far are kept.
    FetchFailed,
}

/// Accumulates items across pages, in arrival order.
#[derive(Debug)]
pub struct CursorLoop<T> {
    items: Vec<T>,
    cursor: Option<String>,
    pages: usize,
    max_pages: usize,
    stopped: Option<StopReason>,
}

impl<T> Default for CursorLoop<T> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<T> CursorLoop<T> {
    /// Start a loop, optionally resuming from a caller-supplied cursor.
    pub fn new(initial_cursor: Option<String>) -> Self {
        Self {
            items: Vec::new(),
            cursor: initial_cursor.filter(|c| !c.is_empty()),
            pages: 0,
            max_pages: MAX_PAGES,
            stopped: None,
        }
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Cursor for the next request, or `None` once the loop is finished.
    ///
    /// The outer `Option` says whether to fetch; the inner one is the cursor
    /// to send (`None` for the first page).
    pub fn next_request(&self) -> Option<Option<&str>> {
        match self.stopped {
            Some(_) => None,
            None => Some(self.cursor.as_deref()),
        }
    }

    /// Record a successfully fetched page.
    pub fn accept(&mut self, page: Page<T>) {
        if self.stopped.is_some() {
            return;
        }

        self.items.extend(page.items);
        self.pages += 1;

        self.stopped = match page.cursor {
            None => Some(StopReason::Exhausted),
            Some(ref next) if self.cursor.as_deref() == Some(next.as_str()) => {
                Some(StopReason::RepeatedCursor)
            }
            Some(_) if self.pages >= self.max_pages => Some(StopReason::PageCap),
            Some(next) => {
                self.cursor = Some(next);
                None
            }
        };
    }

    /// Record a failed page fetch. The partial accumulation is kept.
    pub fn fail(&mut self) {
        if self.stopped.is_none() {
            self.stopped = Some(StopReason::FetchFailed);
        }
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stopped
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}
