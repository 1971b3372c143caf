//! Catalog behavior against the fake TMDB server.

use marquee_core::{MarqueeConfig, MediaKind};
use marquee_search::types::MISSING_OVERVIEW;
use marquee_search::{MediaSearchError, MovieCatalog};

use crate::fake_tmdb::{BROKEN_VIDEOS_ID, FAILING_QUERY, FakeTmdb};

fn catalog(server: &FakeTmdb) -> MovieCatalog {
    MovieCatalog::from_config(&server.config().tmdb).unwrap()
}

#[tokio::test]
async fn test_search_returns_upstream_order() {
    let server = FakeTmdb::start().await;
    let results = catalog(&server)
        .search("matrix", MediaKind::Movie, None)
        .await
        .unwrap();

    let titles: Vec<&str> = results.iter().map(|entry| entry.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "The Matrix",
            "The Matrix Reloaded",
            "The Matrix Revolutions"
        ]
    );
    assert_eq!(results[0].release_year(), Some(1999));
    assert_eq!(results[2].poster_path, None);
    assert_eq!(results[2].overview, None);
    assert_eq!(
        server.searches(),
        vec![("movie".to_string(), "matrix".to_string())]
    );
}

#[tokio::test]
async fn test_genre_filter_applies_to_results() {
    let server = FakeTmdb::start().await;
    let results = catalog(&server)
        .search("matrix", MediaKind::Movie, Some(878))
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, 603);
}

#[tokio::test]
async fn test_blank_query_searches_default() {
    let server = FakeTmdb::start().await;
    let results = catalog(&server)
        .search("", MediaKind::Movie, None)
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Star Wars: A New Hope");
    assert_eq!(server.searches()[0].1, "new");
}

#[tokio::test]
async fn test_tv_search_uses_name_and_first_air_date() {
    let server = FakeTmdb::start().await;
    let results = catalog(&server)
        .search("thrones", MediaKind::Tv, None)
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Game of Thrones");
    assert_eq!(results[0].media_kind, MediaKind::Tv);
    assert_eq!(results[0].release_date.as_deref(), Some("2011-04-17"));
    assert_eq!(server.searches()[0].0, "tv");
}

#[tokio::test]
async fn test_grid_skips_posterless_and_degrades_trailer_errors() {
    let server = FakeTmdb::start().await;
    let cards = catalog(&server)
        .grid("matrix", MediaKind::Movie, None)
        .await
        .unwrap();

    assert_eq!(cards.len(), 2);

    let matrix = &cards[0];
    assert_eq!(matrix.poster_url, "https://image.tmdb.org/t/p/w500/matrix.jpg");
    assert_eq!(
        matrix.trailer.as_deref(),
        Some("https://www.youtube.com/embed/m8e-FF8MsqU")
    );
    assert!(matrix.overview_excerpt.ends_with("..."));
    assert_eq!(matrix.overview_excerpt.chars().count(), 103);

    let reloaded = &cards[1];
    assert_eq!(reloaded.id, BROKEN_VIDEOS_ID);
    assert_eq!(reloaded.trailer, None);
    assert_eq!(
        reloaded.overview_excerpt,
        "Six months after the events depicted in The Matrix."
    );
}

#[tokio::test]
async fn test_selected_movie_combines_details_and_trailer() {
    let server = FakeTmdb::start().await;
    let catalog = catalog(&server);

    let movie = catalog.selected_movie(603, MediaKind::Movie).await.unwrap();
    assert_eq!(movie.title, "The Matrix");
    assert_eq!(movie.overview, MISSING_OVERVIEW);
    assert_eq!(
        movie.poster_url.as_deref(),
        Some("https://image.tmdb.org/t/p/w500/matrix.jpg")
    );

    let show = catalog.selected_movie(1399, MediaKind::Tv).await.unwrap();
    assert_eq!(show.title, "Game of Thrones");
    assert_eq!(show.release_date.as_deref(), Some("2011-04-17"));
    assert_eq!(
        show.trailer.as_deref(),
        Some("https://www.youtube.com/embed/KPLWWIOCOOQ")
    );

    let details = catalog.details(1399, MediaKind::Tv).await.unwrap();
    assert_eq!(details.runtime_minutes, Some(60));
}

#[tokio::test]
async fn test_unknown_title_is_not_found() {
    let server = FakeTmdb::start().await;
    let result = catalog(&server).details(999, MediaKind::Movie).await;

    assert!(matches!(
        result,
        Err(MediaSearchError::NotFound { id: 999, .. })
    ));
}

#[tokio::test]
async fn test_upstream_failure_is_search_failed() {
    let server = FakeTmdb::start().await;
    let result = catalog(&server)
        .search(FAILING_QUERY, MediaKind::Movie, None)
        .await;

    assert!(matches!(
        result,
        Err(MediaSearchError::SearchFailed { ref query, .. }) if query == FAILING_QUERY
    ));
}

#[tokio::test]
async fn test_rejected_api_key_reported() {
    let server = FakeTmdb::start().await;
    let mut config = server.config();
    config.tmdb.api_key = Some("wrong-key".to_string());

    let catalog = MovieCatalog::from_config(&config.tmdb).unwrap();
    match catalog.search("matrix", MediaKind::Movie, None).await {
        Err(MediaSearchError::SearchFailed { reason, .. }) => {
            assert!(reason.contains("invalid"), "unexpected reason: {reason}");
        }
        other => panic!("expected search failure, got {other:?}"),
    }
}

#[test]
fn test_missing_api_key_rejected() {
    let mut config = MarqueeConfig::default();
    config.tmdb.api_key = None;

    assert!(matches!(
        MovieCatalog::from_config(&config.tmdb),
        Err(MediaSearchError::MissingApiKey)
    ));
}
