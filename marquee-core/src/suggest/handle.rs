//! Handle for communicating with the suggestion controller actor.

use tokio::sync::{mpsc, oneshot};

use super::commands::ControllerCommand;
use super::controller::ControllerSnapshot;
use super::types::{ControllerError, Key, MediaKind};

/// Handle for communicating with the suggestion controller actor.
///
/// Cheap to clone; every clone feeds the same controller, so UI bindings can
/// each hold one.
#[derive(Clone, Debug)]
pub struct SuggestionControllerHandle {
    sender: mpsc::Sender<ControllerCommand>,
}

impl SuggestionControllerHandle {
    /// Creates a new handle with the given command sender.
    pub fn new(sender: mpsc::Sender<ControllerCommand>) -> Self {
        Self { sender }
    }

    /// Reports new input text.
    ///
    /// # Errors
    /// - `ControllerError::Shutdown` - Actor is no longer running
    pub async fn input_changed(&self, text: &str) -> Result<(), ControllerError> {
        self.send(ControllerCommand::InputChanged {
            text: text.to_string(),
        })
        .await
    }

    /// Reports a key press.
    ///
    /// # Errors
    /// - `ControllerError::Shutdown` - Actor is no longer running
    pub async fn key_down(&self, key: Key) -> Result<(), ControllerError> {
        self.send(ControllerCommand::KeyDown { key }).await
    }

    /// Reports the pointer hovering the item at `index`.
    ///
    /// # Errors
    /// - `ControllerError::Shutdown` - Actor is no longer running
    pub async fn item_hover(&self, index: usize) -> Result<(), ControllerError> {
        self.send(ControllerCommand::ItemHover { index }).await
    }

    /// Reports a click on the item at `index`.
    ///
    /// # Errors
    /// - `ControllerError::Shutdown` - Actor is no longer running
    pub async fn item_activate(&self, index: usize) -> Result<(), ControllerError> {
        self.send(ControllerCommand::ItemActivate { index }).await
    }

    /// Reports the input regaining focus.
    ///
    /// # Errors
    /// - `ControllerError::Shutdown` - Actor is no longer running
    pub async fn focus(&self) -> Result<(), ControllerError> {
        self.send(ControllerCommand::Focus).await
    }

    /// Reports focus leaving the widget.
    ///
    /// # Errors
    /// - `ControllerError::Shutdown` - Actor is no longer running
    pub async fn focus_lost(&self) -> Result<(), ControllerError> {
        self.send(ControllerCommand::FocusLost).await
    }

    /// Reports a pointer interaction outside the widget.
    ///
    /// # Errors
    /// - `ControllerError::Shutdown` - Actor is no longer running
    pub async fn pointer_outside(&self) -> Result<(), ControllerError> {
        self.send(ControllerCommand::PointerOutside).await
    }

    /// Reports the pointer entering the dropdown.
    ///
    /// # Errors
    /// - `ControllerError::Shutdown` - Actor is no longer running
    pub async fn pointer_enter_dropdown(&self) -> Result<(), ControllerError> {
        self.send(ControllerCommand::PointerEnterDropdown).await
    }

    /// Changes the content kind used by later fetches.
    ///
    /// # Errors
    /// - `ControllerError::Shutdown` - Actor is no longer running
    pub async fn set_content_kind(&self, kind: MediaKind) -> Result<(), ControllerError> {
        self.send(ControllerCommand::SetContentKind { kind }).await
    }

    /// Changes the genre forwarded with full searches.
    ///
    /// # Errors
    /// - `ControllerError::Shutdown` - Actor is no longer running
    pub async fn set_genre(&self, genre: Option<u32>) -> Result<(), ControllerError> {
        self.send(ControllerCommand::SetGenre { genre }).await
    }

    /// Gets the current controller state.
    ///
    /// Reflects every command sent before it through this or any cloned handle.
    ///
    /// # Errors
    /// - `ControllerError::Shutdown` - Actor is no longer running
    pub async fn snapshot(&self) -> Result<ControllerSnapshot, ControllerError> {
        let (responder, rx) = oneshot::channel();
        self.send(ControllerCommand::Snapshot { responder }).await?;
        rx.await.map_err(|_| ControllerError::Shutdown)
    }

    /// Waits until pending debounce and fetch work has finished, then returns the state.
    ///
    /// # Errors
    /// - `ControllerError::Shutdown` - Actor stopped before settling
    pub async fn settled(&self) -> Result<ControllerSnapshot, ControllerError> {
        let (responder, rx) = oneshot::channel();
        self.send(ControllerCommand::WhenSettled { responder }).await?;
        rx.await.map_err(|_| ControllerError::Shutdown)
    }

    /// Stops the actor.
    ///
    /// # Errors
    /// - `ControllerError::Shutdown` - Actor was already stopped
    pub async fn shutdown(&self) -> Result<(), ControllerError> {
        let (responder, rx) = oneshot::channel();
        self.send(ControllerCommand::Shutdown { responder }).await?;
        rx.await.map_err(|_| ControllerError::Shutdown)
    }

    /// Checks if the actor is still running.
    pub fn is_running(&self) -> bool {
        !self.sender.is_closed()
    }

    async fn send(&self, command: ControllerCommand) -> Result<(), ControllerError> {
        self.sender
            .send(command)
            .await
            .map_err(|_| ControllerError::Shutdown)
    }
}
