//! Command definitions for the suggestion controller actor.

use tokio::sync::oneshot;

use super::controller::ControllerSnapshot;
use super::types::{Key, MediaKind};

/// Commands that can be sent to the suggestion controller actor.
///
/// UI events are fire-and-forget; queries carry a response channel. Commands
/// are processed strictly in send order.
#[derive(Debug)]
pub enum ControllerCommand {
    /// The input text changed.
    InputChanged { text: String },
    /// A key was pressed while the widget is on screen.
    KeyDown { key: Key },
    /// Pointer moved over the item at `index`.
    ItemHover { index: usize },
    /// Item at `index` was clicked.
    ItemActivate { index: usize },
    /// The input regained focus.
    Focus,
    /// Focus left the widget.
    FocusLost,
    /// Pointer interaction outside the input and dropdown.
    PointerOutside,
    /// Pointer entered the dropdown.
    PointerEnterDropdown,
    /// Change the content kind filter.
    SetContentKind { kind: MediaKind },
    /// Change the genre filter forwarded with full searches.
    SetGenre { genre: Option<u32> },
    /// Get a copy of the current state.
    Snapshot {
        responder: oneshot::Sender<ControllerSnapshot>,
    },
    /// Reply once no debounce is pending and no fetch is outstanding.
    WhenSettled {
        responder: oneshot::Sender<ControllerSnapshot>,
    },
    /// Shutdown the actor gracefully.
    Shutdown { responder: oneshot::Sender<()> },
}
