//! TMDB REST API provider.

use async_trait::async_trait;
use marquee_core::{MediaKind, TmdbConfig};
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::CatalogProvider;
use crate::errors::MediaSearchError;
use crate::types::{CatalogEntry, MovieDetails, Video};

/// Catalog provider backed by the TMDB v3 API.
#[derive(Debug, Clone)]
pub struct TmdbProvider {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl TmdbProvider {
    /// Creates a provider from configuration.
    ///
    /// # Errors
    /// - `MediaSearchError::MissingApiKey` - No non-blank API key configured
    /// - `MediaSearchError::ProviderError` - Base URL does not parse
    /// - `MediaSearchError::NetworkError` - HTTP client could not be built
    pub fn new(config: &TmdbConfig) -> Result<Self, MediaSearchError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(MediaSearchError::MissingApiKey)?
            .to_string();

        let base_url =
            Url::parse(&config.base_url).map_err(|e| MediaSearchError::ProviderError {
                reason: format!("Invalid TMDB base URL '{}': {e}", config.base_url),
            })?;
        if base_url.cannot_be_a_base() {
            return Err(MediaSearchError::ProviderError {
                reason: format!("TMDB base URL '{}' cannot carry a path", config.base_url),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| MediaSearchError::NetworkError {
                reason: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// Appends `segments` to the base URL path, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(
        &self,
        segments: &[&str],
        params: &[(&str, &str)],
    ) -> Result<(String, reqwest::Response), MediaSearchError> {
        let url = self.endpoint(segments);
        let path = url.path().to_string();
        tracing::debug!(%path, "TMDB request");

        let response = self
            .client
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| MediaSearchError::NetworkError {
                reason: format!("TMDB request to {path} failed: {e}"),
            })?;

        Ok((path, response))
    }

    async fn read_json<T: DeserializeOwned>(
        path: &str,
        response: reqwest::Response,
    ) -> Result<T, MediaSearchError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(MediaSearchError::ProviderError {
                reason: "TMDB API key is invalid or missing".to_string(),
            });
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MediaSearchError::ProviderError {
                reason: "TMDB rate limit exceeded, please try again later".to_string(),
            });
        }
        if !status.is_success() {
            return Err(MediaSearchError::ProviderError {
                reason: format!("TMDB {path} returned HTTP {status}"),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| MediaSearchError::ParseError {
                reason: format!("Failed to parse TMDB response from {path}: {e}"),
            })
    }

    /// Fetches a per-title resource, reporting a 404 as `NotFound`.
    async fn get_title<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        id: u64,
        kind: MediaKind,
    ) -> Result<T, MediaSearchError> {
        let (path, response) = self.send(segments, &[]).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(MediaSearchError::NotFound {
                kind: kind.as_str().to_string(),
                id,
            });
        }
        Self::read_json(&path, response).await
    }
}

#[async_trait]
impl CatalogProvider for TmdbProvider {
    async fn search(
        &self,
        query: &str,
        kind: MediaKind,
    ) -> Result<Vec<CatalogEntry>, MediaSearchError> {
        let (path, response) = self
            .send(&["search", kind.as_str()], &[("query", query)])
            .await?;
        let page: TmdbPage<TmdbSearchItem> = Self::read_json(&path, response)
            .await
            .map_err(|e| match e {
                MediaSearchError::ProviderError { reason } => MediaSearchError::SearchFailed {
                    query: query.to_string(),
                    reason,
                },
                other => other,
            })?;

        tracing::debug!(query, %kind, results = page.results.len(), "TMDB search complete");
        Ok(page
            .results
            .into_iter()
            .map(|item| item.into_entry(kind))
            .collect())
    }

    async fn details(&self, id: u64, kind: MediaKind) -> Result<MovieDetails, MediaSearchError> {
        let id_segment = id.to_string();
        let details: TmdbDetails = self
            .get_title(&[kind.as_str(), id_segment.as_str()], id, kind)
            .await?;
        Ok(details.into_details(kind))
    }

    async fn videos(&self, id: u64, kind: MediaKind) -> Result<Vec<Video>, MediaSearchError> {
        let id_segment = id.to_string();
        let page: TmdbPage<TmdbVideo> = self
            .get_title(&[kind.as_str(), id_segment.as_str(), "videos"], id, kind)
            .await?;
        Ok(page.results.into_iter().map(Video::from).collect())
    }
}

/// Treats empty strings the same as absent fields.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Deserialize)]
struct TmdbPage<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

/// Search hit. Movies carry `title`/`release_date`, TV carries `name`/`first_air_date`.
#[derive(Debug, Deserialize)]
struct TmdbSearchItem {
    id: u64,
    title: Option<String>,
    name: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    media_type: Option<String>,
    #[serde(default)]
    genre_ids: Vec<u32>,
}

impl TmdbSearchItem {
    fn into_entry(self, requested: MediaKind) -> CatalogEntry {
        let media_kind = self
            .media_type
            .as_deref()
            .and_then(|t| t.parse().ok())
            .unwrap_or(requested);

        CatalogEntry {
            id: self.id,
            title: non_empty(self.title)
                .or(non_empty(self.name))
                .unwrap_or_else(|| "Untitled".to_string()),
            overview: non_empty(self.overview),
            poster_path: non_empty(self.poster_path),
            release_date: non_empty(self.release_date).or(non_empty(self.first_air_date)),
            media_kind,
            genre_ids: self.genre_ids,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TmdbGenre {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TmdbDetails {
    id: u64,
    title: Option<String>,
    name: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    #[serde(default)]
    genres: Vec<TmdbGenre>,
    runtime: Option<u32>,
    #[serde(default)]
    episode_run_time: Vec<u32>,
    vote_average: Option<f32>,
}

impl TmdbDetails {
    fn into_details(self, kind: MediaKind) -> MovieDetails {
        MovieDetails {
            id: self.id,
            title: non_empty(self.title)
                .or(non_empty(self.name))
                .unwrap_or_else(|| "Untitled".to_string()),
            overview: non_empty(self.overview),
            poster_path: non_empty(self.poster_path),
            release_date: non_empty(self.release_date).or(non_empty(self.first_air_date)),
            media_kind: kind,
            genres: self.genres.into_iter().map(|g| g.name).collect(),
            runtime_minutes: self
                .runtime
                .or_else(|| self.episode_run_time.first().copied()),
            vote_average: self.vote_average,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TmdbVideo {
    key: String,
    #[serde(default)]
    site: String,
    #[serde(rename = "type", default)]
    video_type: String,
    name: Option<String>,
}

impl From<TmdbVideo> for Video {
    fn from(video: TmdbVideo) -> Self {
        Video {
            key: video.key,
            site: video.site,
            video_type: video.video_type,
            name: video.name,
        }
    }
}
