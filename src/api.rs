use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

/// A single movie record as served by `GET /movies`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub tconst: String,
    pub title: String,
    pub genres: Option<Vec<String>>,
    pub release_year: Option<i32>,
    pub runtime: Option<u32>,
    pub rating: Option<f64>,
    pub poster: Option<String>,
}

impl Movie {
    pub fn has_poster(&self) -> bool {
        self.poster.as_deref().is_some_and(|p| !p.is_empty())
    }

    pub fn imdb_link(&self) -> String {
        format!("https://imdb.com/title/{}", self.tconst)
    }
}

/// Body of `GET /movies`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoviesPage {
    pub movies: Vec<Movie>,
    pub count: u64,
}

/// One entry of `GET /posters`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoviePoster {
    pub tconst: String,
    pub poster: Option<String>,
}

/// Query parameters for `GET /movies`. Absent filters are never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MovieQuery {
    pub title: Option<String>,
    pub genres: Vec<String>,
    pub runtime_min: Option<u32>,
    pub runtime_max: Option<u32>,
    /// `"<field> <ASC|DESC>"`
    pub sort: String,
    pub page: usize,
}

impl MovieQuery {
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            pairs.push(("title", title.to_string()));
        }
        for genre in &self.genres {
            pairs.push(("genres[]", genre.clone()));
        }
        if let Some(min) = self.runtime_min {
            pairs.push(("runtimeMin", min.to_string()));
        }
        if let Some(max) = self.runtime_max {
            pairs.push(("runtimeMax", max.to_string()));
        }
        pairs.push(("sort", self.sort.clone()));
        pairs.push(("page", self.page.to_string()));
        pairs
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request failed with status code {status}")]
    Status { status: u16, message: Option<String> },

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Build a status error, lifting a `message`/`error` field out of a JSON body.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                ["message", "error"]
                    .iter()
                    .find_map(|k| v.get(*k).and_then(|m| m.as_str()).map(str::to_string))
            })
            .filter(|m| !m.is_empty());
        ApiError::Status { status, message }
    }

    /// Text shown to the user in place of the movie grid.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message: Some(m), .. } => m.clone(),
            other => other.to_string(),
        }
    }
}

/// Read-only queries against the catalog service.
pub trait CatalogApi: Send + Sync + 'static {
    fn list_movies(
        &self,
        query: &MovieQuery,
    ) -> impl Future<Output = Result<MoviesPage, ApiError>> + Send;

    fn list_genres(&self) -> impl Future<Output = Result<Vec<String>, ApiError>> + Send;

    fn list_posters(
        &self,
        ids: &[String],
    ) -> impl Future<Output = Result<Vec<MoviePoster>, ApiError>> + Send;
}

/// `CatalogApi` over HTTP GET with reqwest. No retries, no caching.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalog {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        debug!(%url, params = query.len(), "GET");

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status.as_u16(), &body));
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl CatalogApi for HttpCatalog {
    async fn list_movies(&self, query: &MovieQuery) -> Result<MoviesPage, ApiError> {
        self.get_json("movies", &query.to_query_pairs()).await
    }

    async fn list_genres(&self) -> Result<Vec<String>, ApiError> {
        self.get_json("genres", &[]).await
    }

    async fn list_posters(&self, ids: &[String]) -> Result<Vec<MoviePoster>, ApiError> {
        let pairs: Vec<(&str, String)> = ids.iter().map(|id| ("tconsts[]", id.clone())).collect();
        self.get_json("posters", &pairs).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pairs_omit_absent_filters() {
        let query = MovieQuery {
            sort: "title ASC".to_string(),
            ..Default::default()
        };
        assert_eq!(
            query.to_query_pairs(),
            vec![("sort", "title ASC".to_string()), ("page", "0".to_string())]
        );
    }

    #[test]
    fn query_pairs_repeat_genres() {
        let query = MovieQuery {
            title: Some("alien".to_string()),
            genres: vec!["Horror".to_string(), "Sci-Fi".to_string()],
            runtime_min: Some(90),
            runtime_max: Some(120),
            sort: "rating DESC".to_string(),
            page: 3,
        };
        let pairs = query.to_query_pairs();
        assert_eq!(pairs[0], ("title", "alien".to_string()));
        assert_eq!(pairs[1], ("genres[]", "Horror".to_string()));
        assert_eq!(pairs[2], ("genres[]", "Sci-Fi".to_string()));
        assert_eq!(pairs[3], ("runtimeMin", "90".to_string()));
        assert_eq!(pairs[4], ("runtimeMax", "120".to_string()));
        assert_eq!(pairs[6], ("page", "3".to_string()));
    }

    #[test]
    fn empty_title_is_not_sent() {
        let query = MovieQuery {
            title: Some(String::new()),
            sort: "title ASC".to_string(),
            ..Default::default()
        };
        assert!(query.to_query_pairs().iter().all(|(k, _)| *k != "title"));
    }

    #[test]
    fn movie_deserializes_with_nulls() {
        let json = r#"{"tconst":"tt0000001","title":"Carmencita","genres":null,
            "releaseYear":1894,"runtime":null,"rating":5.7,"poster":null}"#;
        let movie: Movie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.release_year, Some(1894));
        assert_eq!(movie.runtime, None);
        assert!(!movie.has_poster());
        assert_eq!(movie.imdb_link(), "https://imdb.com/title/tt0000001");
    }

    #[test]
    fn empty_poster_counts_as_absent() {
        let json = r#"{"tconst":"tt1","title":"A","poster":""}"#;
        let movie: Movie = serde_json::from_str(json).unwrap();
        assert!(!movie.has_poster());
    }

    #[test]
    fn status_error_prefers_body_message() {
        let err = ApiError::from_status(500, r#"{"message":"database offline"}"#);
        assert_eq!(err.user_message(), "database offline");

        let err = ApiError::from_status(502, "<html>bad gateway</html>");
        assert_eq!(err.user_message(), "Request failed with status code 502");
    }

    #[test]
    fn single_genre_is_sent_in_array_form() {
        let api = HttpCatalog::new("http://localhost:8000/api", Duration::from_secs(1)).unwrap();
        let query = MovieQuery {
            genres: vec!["Drama".to_string()],
            sort: "title ASC".to_string(),
            ..Default::default()
        };
        let request = api
            .client
            .get(api.endpoint("movies"))
            .query(&query.to_query_pairs())
            .build()
            .unwrap();
        let pairs: Vec<(String, String)> = request.url().query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("genres[]".to_string(), "Drama".to_string()));
        assert!(pairs.iter().all(|(key, _)| key != "genres"));
    }

    #[test]
    fn endpoint_joins_base_and_path() {
        let api = HttpCatalog::new("http://localhost:8000/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(api.endpoint("movies"), "http://localhost:8000/api/movies");
    }
}
