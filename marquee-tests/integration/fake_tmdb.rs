//! Local stand-in for the TMDB v3 API.
//!
//! Serves a fixed catalog over axum on an ephemeral port and records every
//! search query it receives.

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use marquee_core::MarqueeConfig;
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const API_KEY: &str = "test-key";
/// Search query that makes the fake answer with HTTP 500.
pub const FAILING_QUERY: &str = "explode";
/// Movie whose video listing fails with HTTP 500.
pub const BROKEN_VIDEOS_ID: u64 = 604;

#[derive(Clone, Default)]
struct FakeState {
    searches: Arc<Mutex<Vec<(String, String)>>>,
}

fn movies() -> Vec<Value> {
    vec![
        json!({
            "id": 603, "title": "The Matrix", "release_date": "1999-03-30",
            "poster_path": "/matrix.jpg", "genre_ids": [28, 878],
            "overview": "Set in the 22nd century, The Matrix tells the story of a computer hacker who joins a group of underground insurgents fighting the vast and powerful computers who now rule the earth."
        }),
        json!({
            "id": 604, "title": "The Matrix Reloaded", "release_date": "2003-05-15",
            "poster_path": "/reloaded.jpg", "genre_ids": [28, 12],
            "overview": "Six months after the events depicted in The Matrix."
        }),
        json!({
            "id": 605, "title": "The Matrix Revolutions", "release_date": "2003-11-05",
            "poster_path": null, "genre_ids": [28], "overview": ""
        }),
        json!({
            "id": 11, "title": "Star Wars: A New Hope", "release_date": "1977-05-25",
            "poster_path": "/new-hope.jpg", "genre_ids": [12, 28, 878],
            "overview": "Princess Leia is captured and held hostage by the evil Imperial forces."
        }),
    ]
}

fn shows() -> Vec<Value> {
    vec![json!({
        "id": 1399, "name": "Game of Thrones", "first_air_date": "2011-04-17",
        "poster_path": "/got.jpg", "genre_ids": [18, 10765],
        "overview": "Seven noble families fight for control of the mythical land of Westeros."
    })]
}

fn authorized(params: &HashMap<String, String>) -> Result<(), StatusCode> {
    if params.get("api_key").map(String::as_str) == Some(API_KEY) {
        Ok(())
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

fn title_of(item: &Value) -> &str {
    item.get("title")
        .or_else(|| item.get("name"))
        .and_then(Value::as_str)
        .unwrap_or_default()
}

async fn search(
    State(state): State<FakeState>,
    Path(kind): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    authorized(&params)?;
    let query = params.get("query").cloned().unwrap_or_default();
    state.searches.lock().push((kind.clone(), query.clone()));

    if query == FAILING_QUERY {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    let catalog = match kind.as_str() {
        "movie" => movies(),
        "tv" => shows(),
        _ => return Err(StatusCode::NOT_FOUND),
    };
    let needle = query.to_lowercase();
    let results: Vec<Value> = catalog
        .into_iter()
        .filter(|item| title_of(item).to_lowercase().contains(&needle))
        .collect();

    Ok(Json(json!({ "page": 1, "results": results })))
}

async fn details(
    Path((kind, id)): Path<(String, u64)>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    authorized(&params)?;
    match (kind.as_str(), id) {
        ("movie", 603) => Ok(Json(json!({
            "id": 603, "title": "The Matrix", "release_date": "1999-03-30",
            "poster_path": "/matrix.jpg", "overview": null, "runtime": 136,
            "vote_average": 8.2,
            "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}]
        }))),
        ("tv", 1399) => Ok(Json(json!({
            "id": 1399, "name": "Game of Thrones", "first_air_date": "2011-04-17",
            "poster_path": "/got.jpg", "episode_run_time": [60],
            "overview": "Seven noble families fight for control of the mythical land of Westeros.",
            "genres": [{"id": 18, "name": "Drama"}]
        }))),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

async fn videos(
    Path((kind, id)): Path<(String, u64)>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    authorized(&params)?;
    if id == BROKEN_VIDEOS_ID {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    let results = match (kind.as_str(), id) {
        ("movie", 603) => json!([
            {"key": "teaser603", "site": "YouTube", "type": "Teaser", "name": "Teaser"},
            {"key": "vimeo603", "site": "Vimeo", "type": "Trailer", "name": "Vimeo cut"},
            {"key": "m8e-FF8MsqU", "site": "YouTube", "type": "Trailer", "name": "Official Trailer"}
        ]),
        ("tv", 1399) => json!([
            {"key": "KPLWWIOCOOQ", "site": "YouTube", "type": "Trailer", "name": "Season 1"}
        ]),
        _ => json!([]),
    };

    Ok(Json(json!({ "id": id, "results": results })))
}

/// Running fake server. Aborted on drop.
pub struct FakeTmdb {
    pub base_url: String,
    state: FakeState,
    server: JoinHandle<()>,
}

impl FakeTmdb {
    pub async fn start() -> Self {
        let state = FakeState::default();
        let app = Router::new()
            .route("/search/{kind}", get(search))
            .route("/{kind}/{id}", get(details))
            .route("/{kind}/{id}/videos", get(videos))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
            server,
        }
    }

    /// Configuration pointing at this server, with zero suggestion delays.
    pub fn config(&self) -> MarqueeConfig {
        MarqueeConfig::for_testing(&self.base_url)
    }

    /// `(kind, query)` pairs received by the search endpoint, in order.
    pub fn searches(&self) -> Vec<(String, String)> {
        self.state.searches.lock().clone()
    }
}

impl Drop for FakeTmdb {
    fn drop(&mut self) {
        self.server.abort();
    }
}
