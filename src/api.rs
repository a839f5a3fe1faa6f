use std::future::Future;

use serde::Deserialize;
use tracing::{debug, warn};
use wreq::header::{ACCEPT, USER_AGENT};

use crate::{
    error::{ApiError, ApiResult},
    models::{LanguageFilter, Movie, MovieId, MovieInput},
};

const CLIENT_AGENT: &str = concat!("cinehub/", env!("CARGO_PKG_VERSION"));

/// The movie collection resource as seen by the pages.
pub trait MovieApi: Send + Sync {
    fn list(&self, filter: LanguageFilter) -> impl Future<Output = ApiResult<Vec<Movie>>> + Send;

    fn get(&self, id: &MovieId) -> impl Future<Output = ApiResult<Movie>> + Send;

    fn create(&self, movie: &MovieInput) -> impl Future<Output = ApiResult<Movie>> + Send;

    fn update(
        &self,
        id: &MovieId,
        movie: &MovieInput,
    ) -> impl Future<Output = ApiResult<Movie>> + Send;

    fn delete(&self, id: &MovieId) -> impl Future<Output = ApiResult<()>> + Send;
}

/// HTTP client for the `/movies` REST resource.
///
/// One request per call. No retries, no caching and no timeout beyond
/// whatever the transport imposes.
pub struct ApiClient {
    client: wreq::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(client: wreq::Client, base_url: String) -> Self {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub async fn health(&self) -> ApiResult<String> {
        let url = format!("{}/health", self.base_url);
        let resp = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, CLIENT_AGENT)
            .send()
            .await?
            .error_for_status()?;
        let body: HealthResponse = resp.json().await.map_err(ApiError::Decode)?;
        Ok(body.status)
    }

    fn collection_url(&self) -> String {
        format!("{}/movies", self.base_url)
    }

    fn movie_url(&self, id: &MovieId) -> String {
        format!("{}/movies/{}", self.base_url, urlencoding::encode(id.as_str()))
    }
}

impl MovieApi for ApiClient {
    async fn list(&self, filter: LanguageFilter) -> ApiResult<Vec<Movie>> {
        debug!(language = filter.query_value(), "listing movies");

        let mut req = self
            .client
            .get(self.collection_url())
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, CLIENT_AGENT);
        if let Some(lang) = filter.language() {
            req = req.query(&[("language", lang.as_str())]);
        }

        let resp = req.send().await?.error_for_status()?;
        let records: Vec<serde_json::Value> = resp.json().await.map_err(ApiError::Decode)?;
        Ok(decode_listing(records))
    }

    async fn get(&self, id: &MovieId) -> ApiResult<Movie> {
        debug!(id = %id, "fetching movie");

        let resp = self
            .client
            .get(self.movie_url(id))
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, CLIENT_AGENT)
            .send()
            .await?
            .error_for_status()?;
        resp.json().await.map_err(ApiError::Decode)
    }

    async fn create(&self, movie: &MovieInput) -> ApiResult<Movie> {
        debug!(title = %movie.title, language = %movie.language, "creating movie");

        let resp = self
            .client
            .post(self.collection_url())
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, CLIENT_AGENT)
            .json(movie)
            .send()
            .await?
            .error_for_status()?;
        resp.json().await.map_err(ApiError::Decode)
    }

    async fn update(&self, id: &MovieId, movie: &MovieInput) -> ApiResult<Movie> {
        debug!(id = %id, title = %movie.title, "updating movie");

        let resp = self
            .client
            .put(self.movie_url(id))
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, CLIENT_AGENT)
            .json(movie)
            .send()
            .await?
            .error_for_status()?;
        resp.json().await.map_err(ApiError::Decode)
    }

    async fn delete(&self, id: &MovieId) -> ApiResult<()> {
        debug!(id = %id, "deleting movie");

        self.client
            .delete(self.movie_url(id))
            .header(USER_AGENT, CLIENT_AGENT)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Keeps every record that decodes. The backend stores whatever it is sent,
/// so one malformed row must not hide the rest of the catalog.
fn decode_listing(records: Vec<serde_json::Value>) -> Vec<Movie> {
    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<Movie>(record.clone()) {
            Ok(movie) => Some(movie),
            Err(err) => {
                warn!(error = %err, id = %record["id"], "skipping malformed movie record");
                None
            },
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}
