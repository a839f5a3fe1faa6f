use tracing::{debug, warn};

use super::FetchTicket;
use crate::{
    error::ApiResult,
    models::{LanguageFilter, Movie},
};

pub const FETCH_ERROR: &str = "Failed to fetch movies. Please try again later.";

/// Public listing, optionally narrowed to one language.
#[derive(Debug)]
pub struct HomePage {
    movies: Vec<Movie>,
    loading: bool,
    error: Option<&'static str>,
    selected: LanguageFilter,
    latest: Option<u64>,
}

impl HomePage {
    /// A freshly mounted page is loading until its first fetch lands.
    pub fn new(selected: LanguageFilter) -> Self {
        Self { movies: Vec::new(), loading: true, error: None, selected, latest: None }
    }

    #[cfg(test)]
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    pub fn selected_language(&self) -> LanguageFilter {
        self.selected
    }

    pub fn section_title(&self) -> String {
        self.selected.section_title()
    }

    /// Movies to render: nothing while a request is in flight or after a
    /// failed one.
    pub fn visible_movies(&self) -> Option<&[Movie]> {
        (!self.loading && self.error.is_none()).then_some(self.movies.as_slice())
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        let ticket = FetchTicket::issue(self.selected);
        self.latest = Some(ticket.seq);
        self.loading = true;
        ticket
    }

    /// Re-selecting the active language refreshes the listing.
    pub fn select_language(&mut self, filter: LanguageFilter) -> FetchTicket {
        debug!(language = filter.query_value(), "home filter selected");
        self.selected = filter;
        self.begin_fetch()
    }

    pub fn clear_filter(&mut self) -> FetchTicket {
        self.select_language(LanguageFilter::All)
    }

    /// Applies a listing result. Returns false when a newer fetch has been
    /// issued since `ticket`; the result is then dropped.
    pub fn finish_fetch(&mut self, ticket: FetchTicket, result: ApiResult<Vec<Movie>>) -> bool {
        if self.latest != Some(ticket.seq) {
            debug!(language = ticket.filter.query_value(), "dropping stale home listing");
            return false;
        }

        self.loading = false;
        match result {
            Ok(mut movies) => {
                movies.retain(|m| ticket.filter.matches(m));
                self.movies = movies;
                self.error = None;
            },
            Err(err) => {
                warn!(error = %err, language = ticket.filter.query_value(), "failed to fetch movies");
                self.error = Some(FETCH_ERROR);
            },
        }
        true
    }
}
