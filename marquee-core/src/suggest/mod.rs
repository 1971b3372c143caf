//! Search suggestion controller
//!
//! Turns raw keystrokes and pointer events into a navigable dropdown of
//! suggestions. [`SuggestionController`] is the synchronous state machine;
//! [`spawn_suggestion_controller`] runs it as an actor that owns the timers
//! and the in-flight fetches on a single event loop.

pub mod actor;
pub mod commands;
pub mod controller;
pub mod handle;
pub mod render;
pub mod state;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod timer;
pub mod types;

pub use actor::spawn_suggestion_controller;
pub use commands::ControllerCommand;
pub use controller::{ControllerSnapshot, FetchRequest, Focus, SuggestionController};
pub use handle::SuggestionControllerHandle;
pub use render::{DropdownView, SuggestionView};
pub use state::{DropdownContent, DropdownState};
pub use timer::TimerSlot;
pub use types::{
    ControllerError, ControllerEvent, Key, MediaKind, SearchRequest, SourceError, Suggestion,
    SuggestionSource,
};
