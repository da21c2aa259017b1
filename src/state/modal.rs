use super::data::ImageState;
use super::generation::{Epoch, Generation};
use crate::error::ApiError;

/// User actions aimed at the full-size overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalEvent {
    CloseClicked,
    BackdropClicked,
    /// Clicks on the image itself keep the overlay open
    ImageClicked,
    EscapePressed,
}

/// Overlay state
#[derive(Debug, Clone)]
pub enum ModalState {
    Closed,
    Open { filename: String, image: ImageState },
}

/// Request for the full-size image shown in the overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalRequest {
    pub filename: String,
    pub epoch: Epoch,
}

/// The ModalController owns the full-size overlay.
///
/// Its lifecycle is independent of the selection; the dispatcher is the
/// one that also selects the image when the overlay opens.
#[derive(Debug)]
pub struct ModalController {
    state: ModalState,
    generation: Generation,
}

impl ModalController {
    pub fn new() -> Self {
        Self {
            state: ModalState::Closed,
            generation: Generation::new(),
        }
    }

    /// Open (or retarget) the overlay
    pub fn open(&mut self, filename: &str) -> ModalRequest {
        let epoch = self.generation.advance();
        self.state = ModalState::Open {
            filename: filename.to_string(),
            image: ImageState::Loading,
        };
        tracing::debug!(filename = %filename, "opened full-size view");
        ModalRequest {
            filename: filename.to_string(),
            epoch,
        }
    }

    /// Apply a user action; every closing action works from any open state
    pub fn handle(&mut self, event: ModalEvent) {
        match event {
            ModalEvent::CloseClicked | ModalEvent::BackdropClicked | ModalEvent::EscapePressed => {
                if self.is_open() {
                    tracing::debug!(?event, "closed full-size view");
                }
                self.state = ModalState::Closed;
                // Late images for the closed overlay must not resurface
                self.generation.advance();
            }
            ModalEvent::ImageClicked => {}
        }
    }

    /// Commit the full-size image if the overlay still shows that request
    pub fn image_loaded(&mut self, request: &ModalRequest, result: Result<Vec<u8>, ApiError>) -> bool {
        if !self.generation.is_current(request.epoch) {
            return false;
        }
        if let ModalState::Open { image, .. } = &mut self.state {
            if let Err(err) = &result {
                tracing::warn!(filename = %request.filename, error = %err, "failed to load full image");
            }
            *image = ImageState::from_result(result);
            return true;
        }
        false
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ModalState::Open { .. })
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn filename(&self) -> Option<&str> {
        match &self.state {
            ModalState::Open { filename, .. } => Some(filename),
            ModalState::Closed => None,
        }
    }
}

impl Default for ModalController {
    fn default() -> Self {
        Self::new()
    }
}
