//! Marquee Search - Movie and TV catalog over TMDB

#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! Provides catalog search with genre filtering, detail lookups and trailer
//! discovery, and adapts the catalog into a suggestion source for the search
//! box controller in `marquee-core`.

pub mod errors;
pub mod player;
pub mod providers;
pub mod service;
pub mod types;

// Re-export main types
pub use errors::MediaSearchError;
pub use player::{PlayerSource, find_trailer, youtube_embed_url};
pub use providers::{CatalogProvider, DemoProvider, TmdbProvider};
pub use service::MovieCatalog;
pub use types::{CatalogEntry, GridCard, MovieDetails, SelectedMovie, Video};

/// Convenience type alias for Results with MediaSearchError.
pub type Result<T> = std::result::Result<T, MediaSearchError>;
