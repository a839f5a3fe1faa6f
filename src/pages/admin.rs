use jiff::{SignedDuration, Timestamp, civil::Date};
use tracing::{debug, warn};

use super::{FetchTicket, next_seq};
use crate::{
    error::ApiResult,
    form::{FormError, MovieForm},
    models::{LanguageFilter, Movie, MovieId, MovieInput},
};

pub const FETCH_ERROR: &str = "Failed to fetch movies";
pub const SAVE_ERROR: &str = "Failed to save movie";
pub const DELETE_ERROR: &str = "Failed to delete movie";

pub const ADDED: &str = "Movie added successfully!";
pub const UPDATED: &str = "Movie updated successfully!";
pub const DELETED: &str = "Movie deleted successfully!";

pub const SUCCESS_TTL: SignedDuration = SignedDuration::from_secs(3);

#[derive(Clone, Debug)]
pub struct FormState {
    /// `None` means the form creates a new movie.
    pub editing: Option<Movie>,
    pub form: MovieForm,
    pub alert: Option<FormError>,
}

#[derive(Clone, Debug)]
pub enum AdminView {
    List,
    Form(FormState),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Mutation {
    Create(MovieInput),
    Update(MovieId, MovieInput),
}

#[derive(Debug)]
pub struct MutationTicket {
    page_id: u64,
    mutation: Mutation,
}

impl MutationTicket {
    pub fn mutation(&self) -> &Mutation {
        &self.mutation
    }
}

#[derive(Debug)]
pub struct DeleteTicket {
    page_id: u64,
    id: MovieId,
}

impl DeleteTicket {
    pub fn id(&self) -> &MovieId {
        &self.id
    }
}

#[derive(Debug)]
struct SuccessMessage {
    text: &'static str,
    shown_at: Timestamp,
}

/// Full collection with create, update and delete.
///
/// Mutation results are applied to the local list directly; the collection
/// is only re-fetched when the page is mounted again.
#[derive(Debug)]
pub struct AdminPage {
    page_id: u64,
    movies: Vec<Movie>,
    loading: bool,
    error: Option<&'static str>,
    view: AdminView,
    success: Option<SuccessMessage>,
    pending_delete: Option<MovieId>,
    latest_fetch: Option<u64>,
}

impl Default for AdminPage {
    fn default() -> Self {
        Self::new()
    }
}

impl AdminPage {
    pub fn new() -> Self {
        Self {
            page_id: next_seq(),
            movies: Vec::new(),
            loading: true,
            error: None,
            view: AdminView::List,
            success: None,
            pending_delete: None,
            latest_fetch: None,
        }
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    pub fn view(&self) -> &AdminView {
        &self.view
    }

    pub fn pending_delete(&self) -> Option<&Movie> {
        let id = self.pending_delete.as_ref()?;
        self.movies.iter().find(|m| &m.id == id)
    }

    pub fn section_title(&self) -> String {
        format!("All Movies ({})", self.movies.len())
    }

    /// The current success message, if it was set less than three seconds
    /// before `now`.
    pub fn success_message(&self, now: Timestamp) -> Option<&'static str> {
        let msg = self.success.as_ref()?;
        (now.duration_since(msg.shown_at) < SUCCESS_TTL).then_some(msg.text)
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        let ticket = FetchTicket::issue(LanguageFilter::All);
        self.latest_fetch = Some(ticket.seq);
        self.loading = true;
        ticket
    }

    pub fn finish_fetch(&mut self, ticket: FetchTicket, result: ApiResult<Vec<Movie>>) -> bool {
        if self.latest_fetch != Some(ticket.seq) {
            debug!("dropping stale admin listing");
            return false;
        }

        self.loading = false;
        match result {
            Ok(movies) => {
                self.movies = movies;
                self.error = None;
            },
            Err(err) => {
                warn!(error = %err, "failed to fetch movies");
                self.error = Some(FETCH_ERROR);
            },
        }
        true
    }

    pub fn open_create(&mut self, today: Date) {
        self.pending_delete = None;
        self.view = AdminView::Form(FormState {
            editing: None,
            form: MovieForm::blank(today),
            alert: None,
        });
    }

    /// Returns false if `id` is not in the local collection.
    pub fn open_edit(&mut self, id: &MovieId) -> bool {
        let Some(movie) = self.movies.iter().find(|m| &m.id == id).cloned() else {
            return false;
        };
        self.pending_delete = None;
        self.view = AdminView::Form(FormState {
            form: MovieForm::from_movie(&movie),
            editing: Some(movie),
            alert: None,
        });
        true
    }

    pub fn cancel_form(&mut self) {
        self.view = AdminView::List;
    }

    /// Validates the submitted values. On failure the values stay in the
    /// form together with the alert and no ticket is issued.
    pub fn submit_form(&mut self, form: MovieForm, today: Date) -> Option<MutationTicket> {
        let AdminView::Form(state) = &mut self.view else {
            return None;
        };

        let validated = form.validate(today);
        state.form = form;
        match validated {
            Err(err) => {
                debug!(error = %err, "movie form rejected");
                state.alert = Some(err);
                None
            },
            Ok(input) => {
                state.alert = None;
                let mutation = match &state.editing {
                    Some(movie) => Mutation::Update(movie.id.clone(), input),
                    None => Mutation::Create(input),
                };
                Some(MutationTicket { page_id: self.page_id, mutation })
            },
        }
    }

    pub fn finish_mutation(&mut self, ticket: MutationTicket, result: ApiResult<Movie>) -> bool {
        if ticket.page_id != self.page_id {
            debug!("dropping mutation result for a replaced admin page");
            return false;
        }

        let saved = match result {
            Ok(movie) => movie,
            Err(err) => {
                warn!(error = %err, "failed to save movie");
                self.error = Some(SAVE_ERROR);
                return true;
            },
        };

        let text = match ticket.mutation {
            Mutation::Create(_) => {
                match self.movies.iter_mut().find(|m| m.id == saved.id) {
                    Some(existing) => *existing = saved,
                    None => self.movies.push(saved),
                }
                ADDED
            },
            Mutation::Update(id, _) => {
                match self.movies.iter_mut().find(|m| m.id == id) {
                    Some(existing) => *existing = saved,
                    None => {
                        debug!(id = %id, "updated movie was not in the local list");
                        self.movies.push(saved);
                    },
                }
                UPDATED
            },
        };

        self.invalidate_fetch();
        self.view = AdminView::List;
        self.error = None;
        self.show_success(text);
        true
    }

    /// Records a delete request awaiting confirmation. Nothing is sent yet.
    pub fn request_delete(&mut self, id: &MovieId) -> bool {
        if !self.movies.iter().any(|m| &m.id == id) {
            return false;
        }
        self.pending_delete = Some(id.clone());
        true
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub fn confirm_delete(&mut self) -> Option<DeleteTicket> {
        let id = self.pending_delete.take()?;
        Some(DeleteTicket { page_id: self.page_id, id })
    }

    pub fn finish_delete(&mut self, ticket: DeleteTicket, result: ApiResult<()>) -> bool {
        if ticket.page_id != self.page_id {
            debug!("dropping delete result for a replaced admin page");
            return false;
        }

        match result {
            Ok(()) => {
                self.movies.retain(|m| m.id != ticket.id);
                self.invalidate_fetch();
                self.error = None;
                self.show_success(DELETED);
            },
            Err(err) => {
                warn!(error = %err, id = %ticket.id, "failed to delete movie");
                self.error = Some(DELETE_ERROR);
            },
        }
        true
    }

    /// A listing issued before a local change was applied no longer
    /// reflects the collection and must not overwrite it.
    fn invalidate_fetch(&mut self) {
        if self.latest_fetch.take().is_some() {
            debug!("outstanding admin listing superseded by a local change");
        }
        self.loading = false;
    }

    fn show_success(&mut self, text: &'static str) {
        self.success = Some(SuccessMessage { text, shown_at: Timestamp::now() });
    }
}
