//! Marquee Core - Search suggestion controller and shared infrastructure
//!
//! This crate provides the interaction layer behind Marquee's search box:
//! the debounced suggestion controller, its dropdown state machine, the actor
//! that drives it on a single event loop, plus configuration and tracing setup
//! shared by the other workspace crates.

pub mod config;
pub mod suggest;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use config::{MarqueeConfig, SuggestConfig, TmdbConfig};
pub use suggest::{
    ControllerError, ControllerEvent, MediaKind, SourceError, Suggestion, SuggestionController,
    SuggestionControllerHandle, SuggestionSource, spawn_suggestion_controller,
};

/// Top-level errors that can bubble up from any Marquee subsystem.
///
/// Suggestion failures never reach this type through the controller; they are
/// rendered inline. These variants cover direct catalog calls and startup.
#[derive(Debug, thiserror::Error)]
pub enum MarqueeError {
    #[error("Suggestion source error: {0}")]
    Source(#[from] SourceError),

    #[error("Controller error: {0}")]
    Controller(#[from] ControllerError),

    #[error("Catalog error: {reason}")]
    Catalog { reason: String },

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MarqueeError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            MarqueeError::Source(e) => e.user_message().to_string(),
            MarqueeError::Controller(_) => "Search box stopped responding".to_string(),
            MarqueeError::Catalog { reason } => format!("Could not load movies: {reason}"),
            MarqueeError::Configuration { reason } => format!("Configuration problem: {reason}"),
            MarqueeError::Io(_) => "Input/output error occurred".to_string(),
        }
    }

    /// Checks if this error is due to user input or setup rather than the upstream API.
    pub fn is_user_error(&self) -> bool {
        matches!(self, MarqueeError::Configuration { .. })
    }
}

pub type Result<T> = std::result::Result<T, MarqueeError>;
