//! Per-page view state. A page object is created when the browser navigates
//! to it and dropped when it navigates elsewhere.
//!
//! Every upstream call is described by a ticket. Handlers take the ticket
//! under the session lock, perform the request without the lock, and hand
//! the outcome back to the page, which decides whether it is still current.

pub mod admin;
pub mod home;

use std::sync::atomic::{AtomicU64, Ordering};

use crate::models::LanguageFilter;

static NEXT_SEQ: AtomicU64 = AtomicU64::new(1);

/// Process-unique, so tickets from a replaced page never match the new one.
fn next_seq() -> u64 {
    NEXT_SEQ.fetch_add(1, Ordering::Relaxed)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FetchTicket {
    seq: u64,
    filter: LanguageFilter,
}

impl FetchTicket {
    fn issue(filter: LanguageFilter) -> Self {
        Self { seq: next_seq(), filter }
    }

    pub fn filter(&self) -> LanguageFilter {
        self.filter
    }
}
