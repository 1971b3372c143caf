//! CLI command implementations

use std::sync::Arc;

use clap::Subcommand;
use marquee_core::suggest::{DropdownView, spawn_suggestion_controller};
use marquee_core::{MarqueeConfig, MediaKind, Result};
use marquee_search::{GridCard, MovieCatalog, PlayerSource, SelectedMovie};

use crate::session;

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show the suggestion dropdown for a partial title
    Suggest {
        /// Text typed into the search box
        text: String,
        /// Content kind to suggest
        #[arg(short, long, value_enum, default_value_t = MediaKind::Movie)]
        kind: MediaKind,
    },
    /// Search the catalog and list result cards
    Search {
        /// Search terms (defaults to "new")
        query: Option<String>,
        /// Content kind to search
        #[arg(short, long, value_enum, default_value_t = MediaKind::Movie)]
        kind: MediaKind,
        /// Only keep results tagged with this genre id
        #[arg(short, long)]
        genre: Option<u32>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show details and trailer for one title
    Details {
        /// Catalog id of the title
        id: u64,
        /// Content kind of the title
        #[arg(short, long, value_enum, default_value_t = MediaKind::Movie)]
        kind: MediaKind,
        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Drive the search box line by line from stdin
    Interactive {
        /// Initial content kind
        #[arg(short, long, value_enum, default_value_t = MediaKind::Movie)]
        kind: MediaKind,
    },
}

/// Handle the CLI command
///
/// # Errors
/// Returns appropriate error based on the command that fails
pub async fn handle_command(command: Commands, config: &MarqueeConfig, demo: bool) -> Result<()> {
    let catalog = open_catalog(config, demo)?;

    match command {
        Commands::Suggest { text, kind } => suggest_titles(&catalog, config, &text, kind).await,
        Commands::Search {
            query,
            kind,
            genre,
            json,
        } => {
            let query = query.unwrap_or_default();
            search_catalog(&catalog, &query, kind, genre, json).await
        }
        Commands::Details { id, kind, json } => show_details(&catalog, id, kind, json).await,
        Commands::Interactive { kind } => session::run_interactive(&catalog, config, kind).await,
    }
}

/// Opens the demo catalog or the live TMDB catalog.
///
/// # Errors
/// - `MarqueeError::Configuration` - No TMDB API key configured
/// - `MarqueeError::Catalog` - TMDB client could not be created
fn open_catalog(config: &MarqueeConfig, demo: bool) -> Result<MovieCatalog> {
    if demo {
        tracing::info!("Using built-in demo catalog");
        return Ok(MovieCatalog::new_demo());
    }

    Ok(MovieCatalog::from_config(&config.tmdb)?)
}

/// Types `text` into a fresh search box and prints the dropdown once it settles
///
/// # Errors
/// - `MarqueeError::Controller` - Suggestion controller stopped unexpectedly
pub async fn suggest_titles(
    catalog: &MovieCatalog,
    config: &MarqueeConfig,
    text: &str,
    kind: MediaKind,
) -> Result<()> {
    let (handle, _events) =
        spawn_suggestion_controller(config.suggest.clone(), Arc::new(catalog.clone()));

    handle.set_content_kind(kind).await?;
    handle.input_changed(text).await?;
    let state = handle.settled().await?;
    handle.shutdown().await?;

    match DropdownView::from_state(&state.dropdown, catalog.image_base_url()) {
        DropdownView::Hidden => println!(
            "Type at least {} characters to see suggestions.",
            config.suggest.min_query_chars
        ),
        view => print!("{view}"),
    }

    Ok(())
}

/// Search the catalog and print result cards
///
/// # Errors
/// - `MarqueeError::Catalog` - Search request failed
/// - `MarqueeError::Io` - Failed to encode JSON output
pub async fn search_catalog(
    catalog: &MovieCatalog,
    query: &str,
    kind: MediaKind,
    genre: Option<u32>,
    json: bool,
) -> Result<()> {
    let cards = catalog.grid(query, kind, genre).await?;

    if json {
        let output = serde_json::to_string_pretty(&cards).map_err(std::io::Error::from)?;
        println!("{output}");
        return Ok(());
    }

    let label = if query.trim().is_empty() {
        marquee_search::service::DEFAULT_QUERY
    } else {
        query.trim()
    };
    println!("Results for '{label}' ({})", kind.label());
    println!("{:-<60}", "");

    if cards.is_empty() {
        println!("No results found.");
    }
    for card in &cards {
        print_card(card);
    }

    Ok(())
}

/// Show details and trailer for one title
///
/// # Errors
/// - `MarqueeError::Catalog` - Title not found or lookup failed
/// - `MarqueeError::Io` - Failed to encode JSON output
pub async fn show_details(
    catalog: &MovieCatalog,
    id: u64,
    kind: MediaKind,
    json: bool,
) -> Result<()> {
    let movie = catalog.selected_movie(id, kind).await?;

    if json {
        let output = serde_json::to_string_pretty(&movie).map_err(std::io::Error::from)?;
        println!("{output}");
    } else {
        print_selected(&movie);
    }

    Ok(())
}

fn print_card(card: &GridCard) {
    println!(
        "{} [{}] {}",
        card.title,
        card.id,
        card.release_date.as_deref().unwrap_or("unknown date")
    );
    println!("  {}", card.overview_excerpt);
    println!("  Poster:  {}", card.poster_url);
    if let Some(trailer) = &card.trailer {
        println!("  Trailer: {}", PlayerSource::classify(trailer).playback_url());
    }
}

pub fn print_selected(movie: &SelectedMovie) {
    println!("{} ({})", movie.title, movie.media_kind.label());
    println!("{:-<60}", "");
    if let Some(date) = &movie.release_date {
        println!("Released: {date}");
    }
    if let Some(poster) = &movie.poster_url {
        println!("Poster:   {poster}");
    }
    match &movie.trailer {
        Some(trailer) => println!("Trailer:  {}", PlayerSource::classify(trailer).playback_url()),
        None => println!("Trailer:  not available"),
    }
    println!();
    println!("{}", movie.overview);
}
