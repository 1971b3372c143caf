//! Actor implementation for the suggestion controller.

use std::sync::Arc;

use futures::StreamExt;
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

use super::commands::ControllerCommand;
use super::controller::{ControllerSnapshot, FetchRequest, SuggestionController};
use super::handle::SuggestionControllerHandle;
use super::types::{ControllerEvent, SourceError, Suggestion, SuggestionSource};
use crate::config::SuggestConfig;

type FetchFuture = BoxFuture<'static, (u64, Result<Vec<Suggestion>, SourceError>)>;

/// Spawns a suggestion controller actor and returns its handle and event stream.
///
/// The actor owns the controller, both timers and every in-flight fetch, and
/// processes commands, timer expiries and fetch completions one at a time.
/// Selections and search requests arrive on the returned receiver.
///
/// # Examples
/// ```rust,no_run
/// # #[tokio::main]
/// # async fn main() {
/// use std::sync::Arc;
/// use marquee_core::config::SuggestConfig;
/// use marquee_core::suggest::spawn_suggestion_controller;
/// # use marquee_core::suggest::{MediaKind, SourceError, Suggestion, SuggestionSource};
/// # #[derive(Debug)]
/// # struct Catalog;
/// # #[async_trait::async_trait]
/// # impl SuggestionSource for Catalog {
/// #     async fn suggest(&self, _: &str, _: MediaKind) -> Result<Vec<Suggestion>, SourceError> {
/// #         Ok(Vec::new())
/// #     }
/// # }
///
/// let (handle, _events) = spawn_suggestion_controller(SuggestConfig::default(), Arc::new(Catalog));
/// handle.input_changed("batman").await.unwrap();
/// let state = handle.settled().await.unwrap();
/// println!("{} suggestions", state.dropdown.items().len());
/// # }
/// ```
pub fn spawn_suggestion_controller(
    config: SuggestConfig,
    source: Arc<dyn SuggestionSource>,
) -> (
    SuggestionControllerHandle,
    mpsc::UnboundedReceiver<ControllerEvent>,
) {
    let (sender, receiver) = mpsc::channel(100);
    let (event_sender, event_receiver) = mpsc::unbounded_channel();
    let controller = SuggestionController::new(config);

    tokio::spawn(async move {
        run_actor_loop(controller, source, receiver, event_sender).await;
    });

    (SuggestionControllerHandle::new(sender), event_receiver)
}

/// Runs the main actor loop until the handle side closes or shutdown is requested.
async fn run_actor_loop(
    mut controller: SuggestionController,
    source: Arc<dyn SuggestionSource>,
    mut receiver: mpsc::Receiver<ControllerCommand>,
    events: mpsc::UnboundedSender<ControllerEvent>,
) {
    tracing::debug!("Suggestion controller actor started");

    let mut fetches: FuturesUnordered<FetchFuture> = FuturesUnordered::new();
    let mut settle_waiters: Vec<oneshot::Sender<ControllerSnapshot>> = Vec::new();

    loop {
        let debounce_deadline = controller.debounce_deadline();
        let hide_deadline = controller.hide_deadline();

        tokio::select! {
            biased;

            command = receiver.recv() => {
                let Some(command) = command else { break };
                if !handle_command(&mut controller, command, &events, &mut settle_waiters) {
                    break;
                }
            }
            _ = sleep_until_deadline(debounce_deadline) => {
                if let Some(request) = controller.fire_debounce(Instant::now()) {
                    fetches.push(start_fetch(&source, request));
                }
            }
            _ = sleep_until_deadline(hide_deadline) => {
                controller.fire_hide(Instant::now());
            }
            Some((seq, result)) = fetches.next(), if !fetches.is_empty() => {
                controller.apply_fetch(seq, result);
            }
        }

        if !settle_waiters.is_empty() && controller.is_settled() {
            let snapshot = controller.snapshot();
            for waiter in settle_waiters.drain(..) {
                let _ = waiter.send(snapshot.clone());
            }
        }
    }

    tracing::debug!("Suggestion controller actor stopped");
}

/// Handles a single command. Returns true to continue processing, false to shutdown.
fn handle_command(
    controller: &mut SuggestionController,
    command: ControllerCommand,
    events: &mpsc::UnboundedSender<ControllerEvent>,
    settle_waiters: &mut Vec<oneshot::Sender<ControllerSnapshot>>,
) -> bool {
    let event = match command {
        ControllerCommand::InputChanged { text } => {
            controller.on_input_changed(&text, Instant::now());
            None
        }
        ControllerCommand::KeyDown { key } => controller.on_key_down(key),
        ControllerCommand::ItemHover { index } => {
            controller.on_item_hover(index);
            None
        }
        ControllerCommand::ItemActivate { index } => controller.on_item_activate(index),
        ControllerCommand::Focus => {
            controller.on_focus();
            None
        }
        ControllerCommand::FocusLost => {
            controller.on_focus_lost(Instant::now());
            None
        }
        ControllerCommand::PointerOutside => {
            controller.on_pointer_outside(Instant::now());
            None
        }
        ControllerCommand::PointerEnterDropdown => {
            controller.on_pointer_enter_dropdown();
            None
        }
        ControllerCommand::SetContentKind { kind } => {
            controller.set_content_kind(kind);
            None
        }
        ControllerCommand::SetGenre { genre } => {
            controller.set_genre(genre);
            None
        }
        ControllerCommand::Snapshot { responder } => {
            let _ = responder.send(controller.snapshot());
            None
        }
        ControllerCommand::WhenSettled { responder } => {
            settle_waiters.push(responder);
            None
        }
        ControllerCommand::Shutdown { responder } => {
            tracing::debug!("Suggestion controller actor shutting down");
            let _ = responder.send(());
            return false;
        }
    };

    if let Some(event) = event {
        tracing::debug!(?event, "Controller event");
        let _ = events.send(event);
    }
    true
}

fn start_fetch(source: &Arc<dyn SuggestionSource>, request: FetchRequest) -> FetchFuture {
    let source = Arc::clone(source);
    Box::pin(async move {
        let result = source.suggest(&request.query, request.kind).await;
        (request.seq, result)
    })
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::suggest::testing::{ScriptedSource, suggestions};
    use crate::suggest::{DropdownContent, Focus, Key, MediaKind, SearchRequest};

    fn spawn(
        source: ScriptedSource,
    ) -> (
        SuggestionControllerHandle,
        mpsc::UnboundedReceiver<ControllerEvent>,
        Arc<ScriptedSource>,
    ) {
        let source = Arc::new(source);
        let (handle, events) = spawn_suggestion_controller(
            SuggestConfig::default(),
            Arc::clone(&source) as Arc<dyn SuggestionSource>,
        );
        (handle, events, source)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_keystrokes_fetches_once() {
        let (handle, _events, source) =
            spawn(ScriptedSource::new().reply("abc", Ok(suggestions(2))));

        handle.input_changed("a").await.unwrap();
        handle.input_changed("ab").await.unwrap();
        handle.input_changed("abc").await.unwrap();
        let state = handle.settled().await.unwrap();

        assert_eq!(source.calls(), vec![("abc".to_string(), MediaKind::Movie)]);
        assert!(state.dropdown.visible);
        assert_eq!(state.dropdown.items().len(), 2);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_waits_for_quiet_period() {
        let (handle, _events, source) = spawn(ScriptedSource::new());

        handle.input_changed("ba").await.unwrap();
        tokio::time::sleep(Duration::from_millis(250)).await;
        handle.input_changed("bat").await.unwrap();
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(source.call_count(), 0);

        let state = handle.settled().await.unwrap();
        assert_eq!(source.calls(), vec![("bat".to_string(), MediaKind::Movie)]);
        assert_eq!(state.dropdown.content, DropdownContent::NoResults);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_stale_response_does_not_overwrite() {
        let source = ScriptedSource::new()
            .reply_after("bat", Duration::from_millis(800), Ok(suggestions(5)))
            .reply_after("batman", Duration::from_millis(10), Ok(suggestions(2)));
        let (handle, _events, source) = spawn(source);

        handle.input_changed("bat").await.unwrap();
        tokio::time::sleep(Duration::from_millis(350)).await;
        assert_eq!(source.call_count(), 1);

        handle.input_changed("batman").await.unwrap();
        let state = handle.settled().await.unwrap();
        assert_eq!(state.dropdown.items().len(), 2);

        tokio::time::sleep(Duration::from_secs(2)).await;
        let state = handle.snapshot().await.unwrap();
        assert_eq!(state.dropdown.items().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keyboard_selection_emits_event() {
        let (handle, mut events, _source) =
            spawn(ScriptedSource::new().reply("bat", Ok(suggestions(7))));

        handle.input_changed("bat").await.unwrap();
        let state = handle.settled().await.unwrap();
        assert_eq!(state.dropdown.items().len(), 5);
        assert_eq!(state.dropdown.highlighted, None);

        for _ in 0..3 {
            handle.key_down(Key::ArrowDown).await.unwrap();
        }
        handle.key_down(Key::Enter).await.unwrap();

        match events.recv().await {
            Some(ControllerEvent::Selected(item)) => assert_eq!(item.id, 2),
            other => panic!("expected selection, got {other:?}"),
        }

        let state = handle.snapshot().await.unwrap();
        assert!(!state.dropdown.visible);
        assert!(state.dropdown.items().is_empty());
        assert_eq!(state.input, "Title 2");
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_without_highlight_requests_search() {
        let (handle, mut events, _source) = spawn(ScriptedSource::new());

        handle.set_content_kind(MediaKind::Tv).await.unwrap();
        handle.set_genre(Some(18)).await.unwrap();
        handle.input_changed("the office").await.unwrap();
        handle.key_down(Key::Enter).await.unwrap();

        assert_eq!(
            events.recv().await,
            Some(ControllerEvent::SearchRequested(SearchRequest {
                query: "the office".to_string(),
                kind: MediaKind::Tv,
                genre: Some(18),
            }))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_source_failure_renders_inline() {
        let failure = SourceError::Unavailable {
            reason: "502 Bad Gateway".to_string(),
        };
        let (handle, _events, _source) =
            spawn(ScriptedSource::new().reply("bad", Err(failure)));

        handle.input_changed("bad").await.unwrap();
        let state = handle.settled().await.unwrap();

        assert!(state.dropdown.visible);
        assert!(matches!(state.dropdown.content, DropdownContent::Error(_)));
        assert!(handle.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_escape_mid_fetch_stays_hidden() {
        let (handle, _events, _source) = spawn(ScriptedSource::new().reply_after(
            "bat",
            Duration::from_millis(500),
            Ok(suggestions(3)),
        ));

        handle.input_changed("bat").await.unwrap();
        tokio::time::sleep(Duration::from_millis(400)).await;
        let state = handle.snapshot().await.unwrap();
        assert!(state.fetch_in_flight);

        handle.key_down(Key::Escape).await.unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;

        let state = handle.snapshot().await.unwrap();
        assert!(!state.dropdown.visible);
        assert_eq!(state.dropdown.highlighted, None);
        assert_eq!(state.focus, Focus::Input);
    }

    #[tokio::test(start_paused = true)]
    async fn test_outside_click_hides_after_grace_period() {
        let (handle, _events, _source) =
            spawn(ScriptedSource::new().reply("bat", Ok(suggestions(3))));

        handle.input_changed("bat").await.unwrap();
        handle.settled().await.unwrap();

        handle.pointer_outside().await.unwrap();
        let state = handle.snapshot().await.unwrap();
        assert!(state.hide_pending);
        assert!(state.dropdown.visible);

        tokio::time::sleep(Duration::from_millis(250)).await;
        let state = handle.snapshot().await.unwrap();
        assert!(!state.dropdown.visible);
        assert_eq!(state.dropdown.items().len(), 3);

        handle.focus().await.unwrap();
        let state = handle.snapshot().await.unwrap();
        assert!(state.dropdown.visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pointer_into_dropdown_keeps_it_open() {
        let (handle, mut events, _source) =
            spawn(ScriptedSource::new().reply("bat", Ok(suggestions(3))));

        handle.input_changed("bat").await.unwrap();
        handle.settled().await.unwrap();

        handle.focus_lost().await.unwrap();
        handle.pointer_enter_dropdown().await.unwrap();
        handle.item_hover(1).await.unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;

        let state = handle.snapshot().await.unwrap();
        assert!(state.dropdown.visible);
        assert_eq!(state.dropdown.highlighted, Some(1));

        handle.item_activate(1).await.unwrap();
        assert!(matches!(
            events.recv().await,
            Some(ControllerEvent::Selected(item)) if item.id == 1
        ));
    }

    #[tokio::test]
    async fn test_shutdown_closes_handle() {
        let (handle, _events, _source) = spawn(ScriptedSource::new());
        assert!(handle.is_running());

        handle.shutdown().await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(!handle.is_running());
        assert!(handle.snapshot().await.is_err());
    }
}
