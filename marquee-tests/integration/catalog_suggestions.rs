//! Suggestion controller driven by the TMDB catalog end to end.

use std::sync::Arc;

use marquee_core::suggest::{DropdownContent, DropdownView, Key, spawn_suggestion_controller};
use marquee_core::{ControllerEvent, MediaKind, SuggestionControllerHandle, SuggestionSource};
use marquee_search::MovieCatalog;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::fake_tmdb::{FAILING_QUERY, FakeTmdb};

fn spawn(
    server: &FakeTmdb,
) -> (
    MovieCatalog,
    SuggestionControllerHandle,
    UnboundedReceiver<ControllerEvent>,
) {
    let config = server.config();
    let catalog = MovieCatalog::from_config(&config.tmdb).unwrap();
    let source: Arc<dyn SuggestionSource> = Arc::new(catalog.clone());
    let (handle, events) = spawn_suggestion_controller(config.suggest, source);
    (catalog, handle, events)
}

#[tokio::test]
async fn test_typing_shows_catalog_suggestions() {
    let server = FakeTmdb::start().await;
    let (catalog, handle, _events) = spawn(&server);

    handle.input_changed("matrix").await.unwrap();
    let state = handle.settled().await.unwrap();

    assert!(state.dropdown.visible);
    assert_eq!(state.dropdown.highlighted, None);
    let years: Vec<Option<u16>> = state
        .dropdown
        .items()
        .iter()
        .map(|item| item.release_year)
        .collect();
    assert_eq!(years, vec![Some(1999), Some(2003), Some(2003)]);

    let DropdownView::Suggestions(rows) =
        DropdownView::from_state(&state.dropdown, catalog.image_base_url())
    else {
        panic!("expected suggestion rows");
    };
    assert_eq!(rows[0].annotation, "1999 (Movie)");
    assert_eq!(rows[0].image_url, "https://image.tmdb.org/t/p/w92/matrix.jpg");
    assert_eq!(rows[2].image_url, "placeholder-poster.jpg");
}

#[tokio::test]
async fn test_keyboard_selection_resolves_details() {
    let server = FakeTmdb::start().await;
    let (catalog, handle, mut events) = spawn(&server);

    handle.input_changed("matrix").await.unwrap();
    handle.settled().await.unwrap();
    handle.key_down(Key::ArrowDown).await.unwrap();
    handle.key_down(Key::Enter).await.unwrap();

    let Some(ControllerEvent::Selected(suggestion)) = events.recv().await else {
        panic!("expected a selection");
    };
    assert_eq!(suggestion.display_title, "The Matrix");

    let state = handle.snapshot().await.unwrap();
    assert_eq!(state.input, "The Matrix");
    assert!(!state.dropdown.visible);
    assert!(state.dropdown.items().is_empty());

    let movie = catalog.select_suggestion(&suggestion).await;
    assert_eq!(movie.id, 603);
    assert_eq!(
        movie.trailer.as_deref(),
        Some("https://www.youtube.com/embed/m8e-FF8MsqU")
    );
}

#[tokio::test]
async fn test_enter_without_highlight_runs_full_search() {
    let server = FakeTmdb::start().await;
    let (catalog, handle, mut events) = spawn(&server);

    handle.set_genre(Some(878)).await.unwrap();
    handle.input_changed("matrix").await.unwrap();
    handle.settled().await.unwrap();
    handle.key_down(Key::Enter).await.unwrap();

    let Some(ControllerEvent::SearchRequested(request)) = events.recv().await else {
        panic!("expected a search request");
    };
    assert_eq!(request.query, "matrix");
    assert_eq!(request.genre, Some(878));

    let cards = catalog
        .grid(&request.query, request.kind, request.genre)
        .await
        .unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].title, "The Matrix");
}

#[tokio::test]
async fn test_upstream_failure_and_empty_results_render_inline() {
    let server = FakeTmdb::start().await;
    let (_catalog, handle, _events) = spawn(&server);

    handle.input_changed(FAILING_QUERY).await.unwrap();
    let state = handle.settled().await.unwrap();
    assert!(state.dropdown.visible);
    assert_eq!(
        state.dropdown.content,
        DropdownContent::Error("Could not load suggestions".to_string())
    );

    handle.input_changed("zzz").await.unwrap();
    let state = handle.settled().await.unwrap();
    assert!(state.dropdown.visible);
    assert_eq!(state.dropdown.content, DropdownContent::NoResults);
}

#[tokio::test]
async fn test_content_kind_switch_queries_tv() {
    let server = FakeTmdb::start().await;
    let (_catalog, handle, _events) = spawn(&server);

    handle.set_content_kind(MediaKind::Tv).await.unwrap();
    handle.input_changed("game").await.unwrap();
    let state = handle.settled().await.unwrap();

    assert_eq!(state.dropdown.items().len(), 1);
    assert_eq!(state.dropdown.items()[0].media_kind, MediaKind::Tv);
    assert_eq!(
        server.searches(),
        vec![("tv".to_string(), "game".to_string())]
    );
}

#[tokio::test]
async fn test_short_query_never_reaches_upstream() {
    let server = FakeTmdb::start().await;
    let (_catalog, handle, _events) = spawn(&server);

    handle.input_changed("m").await.unwrap();
    let state = handle.settled().await.unwrap();

    assert!(!state.dropdown.visible);
    assert!(server.searches().is_empty());
}
