//! Incremental loading of a filtered collection, one page at a time.
//!
//! `PagedList` is pure state: it never performs I/O. Callers ask it for a
//! [`PageRequest`], send that request however they like, and hand the
//! outcome back through [`PagedList::complete`] together with the token
//! the request was issued under. Only the most recently issued token is
//! accepted; anything older is reported as [`Completion::Stale`] and
//! leaves the list untouched.

use chrono::{DateTime, Utc};

use crate::models::Page;

/// How a completed page is merged into the list
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadMode {
    /// Initial load: replace items
    Replace,
    /// Scroll-end: append items
    Append,
    /// Pull-to-refresh: replace items, reset to page 1
    Refresh,
}

/// A single filtered + paged request to issue
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub token: u64,
    pub page: u32,
    pub limit: u32,
    pub mode: LoadMode,
}

/// Result of feeding a response back into the list
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Completion {
    /// Token was superseded; nothing changed
    Stale,
    /// Page merged; `received` items arrived
    Loaded { received: usize },
    /// Request failed; state kept its pre-call values
    Failed(String),
}

/// What the view should show for the list
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListPhase {
    Loading,
    Empty,
    Ready,
}

#[derive(Clone, Copy, Debug)]
struct InFlight {
    token: u64,
    page: u32,
    mode: LoadMode,
}

#[derive(Clone, Debug)]
pub struct PagedList<T> {
    items: Vec<T>,
    page: u32,
    total: usize,
    limit: u32,
    is_loading_more: bool,
    is_refreshing: bool,
    completed_once: bool,
    in_flight: Option<InFlight>,
    error: Option<String>,
    fetched_at: Option<DateTime<Utc>>,
}

impl<T> PagedList<T> {
    pub fn new(limit: u32) -> Self {
        PagedList {
            items: Vec::new(),
            page: 1,
            total: 0,
            limit: limit.max(1),
            is_loading_more: false,
            is_refreshing: false,
            completed_once: false,
            in_flight: None,
            error: None,
            fetched_at: None,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn is_loading_more(&self) -> bool {
        self.is_loading_more
    }

    pub fn is_refreshing(&self) -> bool {
        self.is_refreshing
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// When the last page arrived
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// True if `token` is the request the list is waiting on
    pub fn is_pending(&self, token: u64) -> bool {
        self.in_flight.map_or(false, |f| f.token == token)
    }

    /// More pages exist and nothing is loading
    pub fn can_load_more(&self) -> bool {
        self.items.len() < self.total && !self.is_loading_more && !self.is_refreshing
    }

    pub fn phase(&self) -> ListPhase {
        if !self.items.is_empty() {
            ListPhase::Ready
        } else if !self.completed_once || self.is_loading_more || self.is_refreshing {
            ListPhase::Loading
        } else {
            ListPhase::Empty
        }
    }

    /// Start loading `page`. The returned request carries `token`; any
    /// request issued earlier becomes stale.
    pub fn load(&mut self, token: u64, page: u32, mode: LoadMode) -> PageRequest {
        let page = page.max(1);
        match mode {
            LoadMode::Refresh => {
                // a refresh supersedes whatever append was in flight
                self.is_refreshing = true;
                self.is_loading_more = false;
            }
            LoadMode::Replace | LoadMode::Append => self.is_loading_more = true,
        }
        self.in_flight = Some(InFlight { token, page, mode });

        PageRequest {
            token,
            page,
            limit: self.limit,
            mode,
        }
    }

    /// Request the next page if there is one and nothing is loading
    pub fn on_scroll_end(&mut self, token: u64) -> Option<PageRequest> {
        if !self.can_load_more() {
            return None;
        }
        let next = self.page + 1;
        Some(self.load(token, next, LoadMode::Append))
    }

    /// Reload from page 1, regardless of current state
    pub fn on_refresh(&mut self, token: u64) -> PageRequest {
        self.load(token, 1, LoadMode::Refresh)
    }

    /// Apply the outcome of the request issued under `token`
    pub fn complete(&mut self, token: u64, result: Result<Page<T>, String>) -> Completion {
        let flight = match self.in_flight {
            Some(f) if f.token == token => f,
            _ => return Completion::Stale,
        };
        self.in_flight = None;
        self.is_loading_more = false;
        self.is_refreshing = false;
        self.completed_once = true;

        match result {
            Ok(page) => {
                let received = page.items.len();
                match flight.mode {
                    LoadMode::Append => self.items.extend(page.items),
                    LoadMode::Replace | LoadMode::Refresh => self.items = page.items,
                }
                self.page = flight.page;
                self.total = page.total;
                self.error = None;
                self.fetched_at = Some(Utc::now());
                Completion::Loaded { received }
            }
            Err(message) => {
                self.error = Some(message.clone());
                Completion::Failed(message)
            }
        }
    }
}
