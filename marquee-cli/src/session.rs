//! Line-driven search box session.
//!
//! Each stdin line is either text typed into the search box or a `:command`
//! standing in for a key press or pointer event. The dropdown is printed
//! after every line once the controller has settled.

use std::sync::Arc;
use std::time::Duration;

use marquee_core::suggest::{
    DropdownView, Key, SuggestionControllerHandle, spawn_suggestion_controller,
};
use marquee_core::{ControllerEvent, MarqueeConfig, MediaKind, Result};
use marquee_search::MovieCatalog;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::commands::{print_selected, search_catalog};

const HELP: &str = "\
Type to search. Commands:
  :down :up :enter :esc    keyboard navigation
  :hover N  :click N       point at or choose suggestion N
  :focus :blur :outside    focus and pointer changes
  :kind movie|tv           switch content kind
  :genre ID|none           filter searches by genre
  :quit                    leave the session";

/// One parsed session line.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionInput {
    Text(String),
    Key(Key),
    Hover(usize),
    Click(usize),
    Focus,
    Blur,
    Outside,
    Kind(MediaKind),
    Genre(Option<u32>),
    Help,
    Quit,
}

/// Parses a session line. Lines not starting with `:` are typed text.
pub fn parse_line(line: &str) -> std::result::Result<SessionInput, String> {
    let Some(command) = line.strip_prefix(':') else {
        return Ok(SessionInput::Text(line.to_string()));
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();
    if parts.next().is_some() {
        return Err(format!("Too many arguments: :{command}"));
    }

    let index = |value: &str| {
        value
            .parse::<usize>()
            .map_err(|_| format!("Invalid suggestion index: {value}"))
    };

    match (name, arg) {
        ("down", None) => Ok(SessionInput::Key(Key::ArrowDown)),
        ("up", None) => Ok(SessionInput::Key(Key::ArrowUp)),
        ("enter", None) => Ok(SessionInput::Key(Key::Enter)),
        ("esc", None) => Ok(SessionInput::Key(Key::Escape)),
        ("hover", Some(value)) => index(value).map(SessionInput::Hover),
        ("click", Some(value)) => index(value).map(SessionInput::Click),
        ("focus", None) => Ok(SessionInput::Focus),
        ("blur", None) => Ok(SessionInput::Blur),
        ("outside", None) => Ok(SessionInput::Outside),
        ("kind", Some(value)) => value.parse().map(SessionInput::Kind),
        ("genre", None | Some("none")) => Ok(SessionInput::Genre(None)),
        ("genre", Some(value)) => value
            .parse()
            .map(|id| SessionInput::Genre(Some(id)))
            .map_err(|_| format!("Invalid genre id: {value}")),
        ("help", None) => Ok(SessionInput::Help),
        ("quit" | "q", None) => Ok(SessionInput::Quit),
        _ => Err(format!("Unknown command: :{command} (try :help)")),
    }
}

async fn apply(handle: &SuggestionControllerHandle, input: SessionInput) -> Result<()> {
    match input {
        SessionInput::Text(text) => handle.input_changed(&text).await?,
        SessionInput::Key(key) => handle.key_down(key).await?,
        SessionInput::Hover(index) => {
            handle.pointer_enter_dropdown().await?;
            handle.item_hover(index).await?;
        }
        SessionInput::Click(index) => handle.item_activate(index).await?,
        SessionInput::Focus => handle.focus().await?,
        SessionInput::Blur => handle.focus_lost().await?,
        SessionInput::Outside => handle.pointer_outside().await?,
        SessionInput::Kind(kind) => handle.set_content_kind(kind).await?,
        SessionInput::Genre(genre) => handle.set_genre(genre).await?,
        SessionInput::Help | SessionInput::Quit => {}
    }
    Ok(())
}

async fn handle_event(catalog: &MovieCatalog, event: ControllerEvent) {
    match event {
        ControllerEvent::Selected(suggestion) => {
            tracing::info!(
                id = suggestion.id,
                title = %suggestion.display_title,
                "Suggestion selected"
            );
            let movie = catalog.select_suggestion(&suggestion).await;
            print_selected(&movie);
        }
        ControllerEvent::SearchRequested(request) => {
            if let Err(error) =
                search_catalog(catalog, &request.query, request.kind, request.genre, false).await
            {
                tracing::warn!(%error, "Search failed");
                println!("{}", error.user_message());
            }
        }
    }
}

/// Runs an interactive search box session on stdin until EOF or `:quit`
///
/// # Errors
/// - `MarqueeError::Controller` - Suggestion controller stopped unexpectedly
/// - `MarqueeError::Io` - Failed to read stdin
pub async fn run_interactive(
    catalog: &MovieCatalog,
    config: &MarqueeConfig,
    kind: MediaKind,
) -> Result<()> {
    let (handle, mut events) =
        spawn_suggestion_controller(config.suggest.clone(), Arc::new(catalog.clone()));
    handle.set_content_kind(kind).await?;
    handle.focus().await?;

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let input = match parse_line(&line) {
            Ok(input) => input,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        match input {
            SessionInput::Quit => break,
            SessionInput::Help => {
                println!("{HELP}");
                continue;
            }
            input => apply(&handle, input).await?,
        }

        let mut state = handle.settled().await?;
        if state.hide_pending {
            tokio::time::sleep(config.suggest.hide_delay + Duration::from_millis(20)).await;
            state = handle.snapshot().await?;
        }
        print!(
            "{}",
            DropdownView::from_state(&state.dropdown, catalog.image_base_url())
        );

        while let Ok(event) = events.try_recv() {
            handle_event(catalog, event).await;
        }
    }

    handle.shutdown().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_lines_are_text() {
        assert_eq!(parse_line("bat").unwrap(), SessionInput::Text("bat".to_string()));
        assert_eq!(parse_line("").unwrap(), SessionInput::Text(String::new()));
        assert_eq!(
            parse_line("star wars").unwrap(),
            SessionInput::Text("star wars".to_string())
        );
    }

    #[test]
    fn test_navigation_commands() {
        assert_eq!(parse_line(":down").unwrap(), SessionInput::Key(Key::ArrowDown));
        assert_eq!(parse_line(":up").unwrap(), SessionInput::Key(Key::ArrowUp));
        assert_eq!(parse_line(":enter").unwrap(), SessionInput::Key(Key::Enter));
        assert_eq!(parse_line(":esc").unwrap(), SessionInput::Key(Key::Escape));
        assert_eq!(parse_line(":hover 2").unwrap(), SessionInput::Hover(2));
        assert_eq!(parse_line(":click 0").unwrap(), SessionInput::Click(0));
    }

    #[test]
    fn test_filter_commands() {
        assert_eq!(parse_line(":kind tv").unwrap(), SessionInput::Kind(MediaKind::Tv));
        assert_eq!(parse_line(":genre 28").unwrap(), SessionInput::Genre(Some(28)));
        assert_eq!(parse_line(":genre none").unwrap(), SessionInput::Genre(None));
        assert_eq!(parse_line(":q").unwrap(), SessionInput::Quit);
    }

    #[test]
    fn test_invalid_commands_rejected() {
        assert!(parse_line(":hover").is_err());
        assert!(parse_line(":hover x").is_err());
        assert!(parse_line(":kind anime").is_err());
        assert!(parse_line(":down 3").is_err());
        assert!(parse_line(":dance").is_err());
    }
}
