//! Fakes shared by the unit tests: an in-memory `MovieApi` and a REST server
//! that behaves like the upstream movie API.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    api::MovieApi,
    error::{ApiError, ApiResult},
    models::{Language, LanguageFilter, Movie, MovieId, MovieInput},
};

pub fn sample_movie(id: &str, title: &str, language: Language) -> Movie {
    Movie {
        id: MovieId::from(id),
        title: title.to_string(),
        language,
        url: Some(format!("https://watch.example/{id}")),
        image_url: Some(format!("https://img.example/{id}.jpg")),
        release_date: jiff::civil::date(2023, 3, 10),
    }
}

pub fn sample_input(title: &str, language: Language) -> MovieInput {
    MovieInput {
        title: title.to_string(),
        language,
        url: Some("https://watch.example/new".to_string()),
        image_url: None,
        release_date: jiff::civil::date(2024, 1, 26),
    }
}

fn seed_records() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "title": "A",
            "language": "hindi",
            "url": "https://watch.example/a",
            "image_url": "https://img.example/a.jpg",
            "release_date": "2023-01-01"
        }),
        json!({
            "id": 2,
            "title": "B",
            "language": "marathi",
            "url": "https://watch.example/b",
            "image_url": "",
            "release_date": "2022-06-15T08:00:00"
        }),
        json!({
            "id": 3,
            "title": "C",
            "language": "punjabi",
            "url": "",
            "image_url": "",
            "release_date": "2021-11-05"
        }),
    ]
}

/// `MovieApi` backed by a vector, counting every call.
pub struct InMemoryApi {
    movies: Mutex<Vec<Movie>>,
    next_id: AtomicUsize,
    calls: AtomicUsize,
    fail: AtomicBool,
}

impl InMemoryApi {
    pub fn new(movies: Vec<Movie>) -> Self {
        let next_id = movies.len() + 100;
        Self {
            movies: Mutex::new(movies),
            next_id: AtomicUsize::new(next_id),
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        }
    }

    pub fn seeded() -> Self {
        Self::new(vec![
            sample_movie("1", "A", Language::Hindi),
            sample_movie("2", "B", Language::Marathi),
            sample_movie("3", "C", Language::Punjabi),
        ])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail_requests(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn enter(&self) -> ApiResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(ApiError::Status { status: 500 });
        }
        Ok(())
    }
}

impl MovieApi for InMemoryApi {
    async fn list(&self, filter: LanguageFilter) -> ApiResult<Vec<Movie>> {
        self.enter()?;
        let movies = self.movies.lock().unwrap();
        Ok(movies.iter().filter(|m| filter.matches(m)).cloned().collect())
    }

    async fn get(&self, id: &MovieId) -> ApiResult<Movie> {
        self.enter()?;
        let movies = self.movies.lock().unwrap();
        movies.iter().find(|m| &m.id == id).cloned().ok_or(ApiError::Status { status: 404 })
    }

    async fn create(&self, movie: &MovieInput) -> ApiResult<Movie> {
        self.enter()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        let created = Movie {
            id: MovieId::from(id),
            title: movie.title.clone(),
            language: movie.language,
            url: movie.url.clone(),
            image_url: movie.image_url.clone(),
            release_date: movie.release_date,
        };
        self.movies.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: &MovieId, movie: &MovieInput) -> ApiResult<Movie> {
        self.enter()?;
        let mut movies = self.movies.lock().unwrap();
        let existing =
            movies.iter_mut().find(|m| &m.id == id).ok_or(ApiError::Status { status: 404 })?;
        existing.title = movie.title.clone();
        existing.language = movie.language;
        existing.url = movie.url.clone();
        existing.image_url = movie.image_url.clone();
        existing.release_date = movie.release_date;
        Ok(existing.clone())
    }

    async fn delete(&self, id: &MovieId) -> ApiResult<()> {
        self.enter()?;
        let mut movies = self.movies.lock().unwrap();
        let before = movies.len();
        movies.retain(|m| &m.id != id);
        if movies.len() == before {
            return Err(ApiError::Status { status: 404 });
        }
        Ok(())
    }
}

struct FakeDb {
    movies: Vec<Value>,
    next_id: i64,
}

struct Shared {
    db: Mutex<FakeDb>,
    fail: AtomicBool,
}

/// Upstream REST API stand-in listening on an ephemeral local port.
pub struct FakeServer {
    base_url: String,
    shared: Arc<Shared>,
}

impl FakeServer {
    pub async fn spawn_seeded() -> Self {
        Self::spawn(seed_records()).await
    }

    pub async fn spawn(movies: Vec<Value>) -> Self {
        let next_id = movies.iter().filter_map(|m| m["id"].as_i64()).max().unwrap_or(0) + 1;
        let shared = Arc::new(Shared {
            db: Mutex::new(FakeDb { movies, next_id }),
            fail: AtomicBool::new(false),
        });

        let app = Router::new()
            .route("/api/health", get(health))
            .route("/api/movies", get(list_movies).post(create_movie))
            .route("/api/movies/{id}", get(get_movie).put(update_movie).delete(delete_movie))
            .with_state(shared.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url: format!("http://{addr}/api"), shared }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn fail_requests(&self, fail: bool) {
        self.shared.fail.store(fail, Ordering::SeqCst);
    }

    pub fn titles(&self) -> Vec<String> {
        let db = self.shared.db.lock().unwrap();
        db.movies.iter().filter_map(|m| m["title"].as_str().map(str::to_string)).collect()
    }
}

fn unavailable() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "unavailable" }))).into_response()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Movie not found" }))).into_response()
}

async fn health(State(shared): State<Arc<Shared>>) -> Response {
    if shared.fail.load(Ordering::SeqCst) {
        return unavailable();
    }
    Json(json!({ "status": "healthy" })).into_response()
}

#[derive(Deserialize)]
struct ListQuery {
    language: Option<String>,
}

async fn list_movies(State(shared): State<Arc<Shared>>, Query(q): Query<ListQuery>) -> Response {
    if shared.fail.load(Ordering::SeqCst) {
        return unavailable();
    }
    let db = shared.db.lock().unwrap();
    let movies: Vec<Value> = match q.language {
        Some(lang) => db
            .movies
            .iter()
            .filter(|m| m["language"].as_str().is_some_and(|l| l.eq_ignore_ascii_case(&lang)))
            .cloned()
            .collect(),
        None => db.movies.clone(),
    };
    Json(movies).into_response()
}

async fn get_movie(State(shared): State<Arc<Shared>>, Path(id): Path<i64>) -> Response {
    if shared.fail.load(Ordering::SeqCst) {
        return unavailable();
    }
    let db = shared.db.lock().unwrap();
    match db.movies.iter().find(|m| m["id"].as_i64() == Some(id)) {
        Some(movie) => Json(movie.clone()).into_response(),
        None => not_found(),
    }
}

async fn create_movie(State(shared): State<Arc<Shared>>, Json(body): Json<Value>) -> Response {
    if shared.fail.load(Ordering::SeqCst) {
        return unavailable();
    }
    let missing = |key: &str| body[key].as_str().is_none_or(str::is_empty);
    if missing("title") || missing("language") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Title and language are required" })),
        )
            .into_response();
    }

    let mut db = shared.db.lock().unwrap();
    let movie = json!({
        "id": db.next_id,
        "title": body["title"],
        "language": body["language"],
        "url": body.get("url").cloned().unwrap_or(json!("")),
        "image_url": body.get("image_url").cloned().unwrap_or(json!("")),
        "release_date": body.get("release_date").cloned().unwrap_or(json!("2024-01-01")),
    });
    db.next_id += 1;
    db.movies.push(movie.clone());
    (StatusCode::CREATED, Json(movie)).into_response()
}

async fn update_movie(
    State(shared): State<Arc<Shared>>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if shared.fail.load(Ordering::SeqCst) {
        return unavailable();
    }
    let mut db = shared.db.lock().unwrap();
    let Some(movie) = db.movies.iter_mut().find(|m| m["id"].as_i64() == Some(id)) else {
        return not_found();
    };
    for key in ["title", "language", "url", "image_url", "release_date"] {
        if let Some(value) = body.get(key) {
            movie[key] = value.clone();
        }
    }
    Json(movie.clone()).into_response()
}

async fn delete_movie(State(shared): State<Arc<Shared>>, Path(id): Path<i64>) -> Response {
    if shared.fail.load(Ordering::SeqCst) {
        return unavailable();
    }
    let mut db = shared.db.lock().unwrap();
    let before = db.movies.len();
    db.movies.retain(|m| m["id"].as_i64() != Some(id));
    if db.movies.len() == before {
        return not_found();
    }
    Json(json!({ "message": "Movie deleted successfully" })).into_response()
}
