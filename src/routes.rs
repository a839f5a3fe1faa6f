use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Form, Path, Query, State},
    http::{HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use jiff::{Timestamp, civil::Date};
use serde::Deserialize;
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, warn};

use crate::{
    AppState,
    api::MovieApi,
    error::AppResult,
    form::MovieForm,
    models::{LanguageFilter, MovieId},
    pages::admin::{AdminPage, Mutation},
    templates,
};

const ADMIN_VIEW: &str = "/admin/view";

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/home/movies", get(home_movies))
        .route("/admin", get(admin))
        .route("/admin/movies", get(admin_movies))
        .route("/admin/view", get(admin_view))
        .route("/admin/form", post(admin_submit))
        .route("/admin/form/new", post(admin_open_create))
        .route("/admin/form/edit/{id}", post(admin_open_edit))
        .route("/admin/form/cancel", post(admin_cancel_form))
        .route("/admin/movies/{id}/delete", post(admin_request_delete))
        .route("/admin/delete/confirm", post(admin_confirm_delete))
        .route("/admin/delete/cancel", post(admin_cancel_delete))
        .route("/health", get(health))
        .fallback(not_found)
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug, Deserialize)]
pub struct LanguageQuery {
    language: Option<String>,
}

fn today() -> Date {
    jiff::Zoned::now().into()
}

/// Wraps a `#content` replacement for the Datastar client.
fn fragment_response(body: String) -> Response {
    let mut resp = Html(body).into_response();
    resp.headers_mut().insert("datastar-selector", HeaderValue::from_static("#content"));
    resp.headers_mut().insert("datastar-mode", HeaderValue::from_static("outer"));
    resp
}

pub async fn home(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(q): Query<LanguageQuery>,
) -> AppResult<(CookieJar, Html<String>)> {
    let filter = LanguageFilter::parse(q.language.as_deref()).map_err(anyhow::Error::new)?;

    let (jar, session) = state.sessions.resolve(jar).await;
    session.lock().await.navigate_home(filter);

    Ok((jar, Html(templates::home_page(filter))))
}

pub async fn home_movies(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(q): Query<LanguageQuery>,
) -> Response {
    let requested = match q.language.as_deref().map(|raw| LanguageFilter::parse(Some(raw))) {
        Some(Err(err)) => return fragment_response(templates::error_fragment(&err.to_string())),
        Some(Ok(filter)) => Some(filter),
        None => None,
    };

    let (jar, session) = state.sessions.resolve(jar).await;
    let ticket = {
        let mut session = session.lock().await;
        let home = session.home_or_navigate(requested.unwrap_or_default());
        match requested {
            Some(LanguageFilter::All) => home.clear_filter(),
            Some(filter) => home.select_language(filter),
            None => home.begin_fetch(),
        }
    };

    let result = state.api.list(ticket.filter()).await;

    let mut guard = session.lock().await;
    let Some(home) = guard.home_mut() else {
        debug!("home page was left before its listing arrived");
        return (jar, StatusCode::NO_CONTENT).into_response();
    };
    home.finish_fetch(ticket, result);
    (jar, fragment_response(templates::home_fragment(home))).into_response()
}

pub async fn admin(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    let (jar, session) = state.sessions.resolve(jar).await;
    session.lock().await.navigate_admin();
    (jar, Html(templates::admin_page_loading()))
}

pub async fn admin_movies(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let (jar, session) = state.sessions.resolve(jar).await;
    let ticket = session.lock().await.admin_or_navigate().begin_fetch();

    let result = state.api.list(ticket.filter()).await;

    let mut guard = session.lock().await;
    let Some(admin) = guard.admin_mut() else {
        debug!("admin page was left before its listing arrived");
        return (jar, StatusCode::NO_CONTENT).into_response();
    };
    admin.finish_fetch(ticket, result);
    (jar, fragment_response(templates::admin_fragment(admin, Timestamp::now()))).into_response()
}

pub async fn admin_view(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let (jar, session) = state.sessions.resolve(jar).await;
    let guard = session.lock().await;
    match guard.admin() {
        Some(admin) => (jar, Html(templates::admin_page(admin, Timestamp::now()))).into_response(),
        None => (jar, Redirect::to("/admin")).into_response(),
    }
}

/// Applies a local change to the live admin page and redirects back to it.
/// Without one the browser is sent through a fresh mount.
async fn update_admin(
    state: &AppState,
    jar: CookieJar,
    change: impl FnOnce(&mut AdminPage),
) -> Response {
    let (jar, session) = state.sessions.resolve(jar).await;
    let mut guard = session.lock().await;
    match guard.admin_mut() {
        Some(admin) => {
            change(admin);
            (jar, Redirect::to(ADMIN_VIEW)).into_response()
        },
        None => (jar, Redirect::to("/admin")).into_response(),
    }
}

pub async fn admin_open_create(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    update_admin(&state, jar, |admin| admin.open_create(today())).await
}

pub async fn admin_open_edit(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Response {
    let id = MovieId::from(id);
    update_admin(&state, jar, |admin| {
        if !admin.open_edit(&id) {
            debug!(id = %id, "edit requested for unknown movie");
        }
    })
    .await
}

pub async fn admin_cancel_form(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    update_admin(&state, jar, AdminPage::cancel_form).await
}

pub async fn admin_submit(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<MovieForm>,
) -> Response {
    let (jar, session) = state.sessions.resolve(jar).await;
    let ticket = {
        let mut guard = session.lock().await;
        let Some(admin) = guard.admin_mut() else {
            return (jar, Redirect::to("/admin")).into_response();
        };
        admin.submit_form(form, today())
    };
    let Some(ticket) = ticket else {
        return (jar, Redirect::to(ADMIN_VIEW)).into_response();
    };

    let result = match ticket.mutation() {
        Mutation::Create(input) => state.api.create(input).await,
        Mutation::Update(id, input) => state.api.update(id, input).await,
    };

    if let Some(admin) = session.lock().await.admin_mut() {
        admin.finish_mutation(ticket, result);
    }
    (jar, Redirect::to(ADMIN_VIEW)).into_response()
}

pub async fn admin_request_delete(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Response {
    let id = MovieId::from(id);
    update_admin(&state, jar, |admin| {
        if !admin.request_delete(&id) {
            debug!(id = %id, "delete requested for unknown movie");
        }
    })
    .await
}

pub async fn admin_cancel_delete(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    update_admin(&state, jar, AdminPage::cancel_delete).await
}

pub async fn admin_confirm_delete(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let (jar, session) = state.sessions.resolve(jar).await;
    let ticket = {
        let mut guard = session.lock().await;
        let Some(admin) = guard.admin_mut() else {
            return (jar, Redirect::to("/admin")).into_response();
        };
        admin.confirm_delete()
    };
    let Some(ticket) = ticket else {
        return (jar, Redirect::to(ADMIN_VIEW)).into_response();
    };

    let result = state.api.delete(ticket.id()).await;

    if let Some(admin) = session.lock().await.admin_mut() {
        admin.finish_delete(ticket, result);
    }
    (jar, Redirect::to(ADMIN_VIEW)).into_response()
}

pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    let sessions = state.sessions.len().await;
    let upstream_url = state.config.api_base_url.as_str();

    match state.api.health().await {
        Ok(upstream) => Json(json!({
            "status": "ok",
            "upstream": upstream,
            "upstream_url": upstream_url,
            "sessions": sessions,
        }))
        .into_response(),
        Err(err) => {
            warn!(error = %err, "movie API health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "upstream": "unreachable",
                    "upstream_url": upstream_url,
                    "sessions": sessions,
                })),
            )
                .into_response()
        },
    }
}

pub async fn not_found() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html(templates::not_found_page()))
}
