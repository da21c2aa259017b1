use super::data::{ImageState, RawMetadata};
use super::generation::{Epoch, Generation};
use crate::error::ApiError;
use crate::metadata::display::MetadataView;

/// Identifies the selection a fetch was issued for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub filename: String,
    pub epoch: Epoch,
}

/// Whether a fetch result was committed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// The selection moved on while the fetch was in flight
    Stale,
}

/// Content of the details panel
#[derive(Debug, Clone, PartialEq)]
pub enum Details {
    /// Nothing selected yet
    Empty,
    Loading,
    Ready(MetadataView),
    Failed(String),
}

/// The SelectionController owns the single details panel.
///
/// Each selection starts a new epoch; metadata and preview results are
/// committed only while their epoch is still current, so the panel can
/// never show data for an image that is no longer selected.
#[derive(Debug)]
pub struct SelectionController {
    selected: Option<String>,
    generation: Generation,
    details: Details,
    preview: Option<ImageState>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self {
            selected: None,
            generation: Generation::new(),
            details: Details::Empty,
            preview: None,
        }
    }

    /// Select an image and mark the panel as loading.
    ///
    /// The caller issues the metadata and preview fetches with the
    /// returned ticket. Re-selecting the current image fetches again.
    pub fn select(&mut self, filename: &str) -> Ticket {
        let epoch = self.generation.advance();
        self.selected = Some(filename.to_string());
        self.details = Details::Loading;
        self.preview = Some(ImageState::Loading);

        tracing::debug!(filename = %filename, ?epoch, "selected image");
        Ticket {
            filename: filename.to_string(),
            epoch,
        }
    }

    /// Commit a metadata response if it belongs to the current selection
    pub fn metadata_loaded(
        &mut self,
        ticket: &Ticket,
        result: Result<RawMetadata, ApiError>,
    ) -> Outcome {
        if !self.generation.is_current(ticket.epoch) {
            tracing::debug!(filename = %ticket.filename, "discarding stale metadata");
            return Outcome::Stale;
        }

        self.details = match result {
            Ok(raw) => Details::Ready(MetadataView::from_raw(&raw)),
            Err(err) => {
                tracing::warn!(filename = %ticket.filename, error = %err, "failed to load metadata");
                Details::Failed(err.to_string())
            }
        };
        Outcome::Applied
    }

    /// Commit a preview image if it belongs to the current selection
    pub fn preview_loaded(&mut self, ticket: &Ticket, result: Result<Vec<u8>, ApiError>) -> Outcome {
        if !self.generation.is_current(ticket.epoch) {
            tracing::debug!(filename = %ticket.filename, "discarding stale preview");
            return Outcome::Stale;
        }

        if let Err(err) = &result {
            tracing::warn!(filename = %ticket.filename, error = %err, "failed to load preview");
        }
        self.preview = Some(ImageState::from_result(result));
        Outcome::Applied
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_selected(&self, filename: &str) -> bool {
        self.selected.as_deref() == Some(filename)
    }

    pub fn epoch(&self) -> Epoch {
        self.generation.current()
    }

    pub fn details(&self) -> &Details {
        &self.details
    }

    pub fn preview(&self) -> Option<&ImageState> {
        self.preview.as_ref()
    }
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metadata(seed: u64) -> RawMetadata {
        let value = json!({
            "prompt": {"3": {"class_type": "KSampler", "inputs": {"seed": seed}}}
        });
        value.as_object().unwrap().clone()
    }

    fn shown_seed(controller: &SelectionController) -> Option<serde_json::Value> {
        match controller.details() {
            Details::Ready(view) => view
                .summary
                .as_ref()
                .and_then(|s| s.parameter(crate::metadata::extract::SamplerField::Seed)),
            _ => None,
        }
    }

    #[test]
    fn test_select_marks_loading() {
        let mut controller = SelectionController::new();
        assert_eq!(controller.details(), &Details::Empty);
        assert!(controller.selected().is_none());

        let ticket = controller.select("a.png");
        assert_eq!(ticket.filename, "a.png");
        assert_eq!(ticket.epoch, controller.epoch());
        assert_eq!(controller.details(), &Details::Loading);
        assert!(controller.is_selected("a.png"));
        assert!(matches!(controller.preview(), Some(ImageState::Loading)));
    }

    #[test]
    fn test_race_guard_late_response_discarded() {
        let mut controller = SelectionController::new();
        let ticket_a = controller.select("a.png");
        let ticket_b = controller.select("b.png");

        // B resolves first, then A's late response arrives
        assert_eq!(controller.metadata_loaded(&ticket_b, Ok(metadata(2))), Outcome::Applied);
        assert_eq!(controller.metadata_loaded(&ticket_a, Ok(metadata(1))), Outcome::Stale);

        assert_eq!(controller.selected(), Some("b.png"));
        assert_eq!(shown_seed(&controller), Some(json!(2)));
    }

    #[test]
    fn test_stale_response_before_current_keeps_loading() {
        let mut controller = SelectionController::new();
        let ticket_a = controller.select("a.png");
        let _ticket_b = controller.select("b.png");

        assert_eq!(controller.metadata_loaded(&ticket_a, Ok(metadata(1))), Outcome::Stale);
        assert_eq!(controller.details(), &Details::Loading);
    }

    #[test]
    fn test_stale_failure_is_not_an_error() {
        let mut controller = SelectionController::new();
        let ticket_a = controller.select("a.png");
        let ticket_b = controller.select("b.png");
        controller.metadata_loaded(&ticket_b, Ok(metadata(2)));

        let outcome = controller.metadata_loaded(&ticket_a, Err(ApiError::Request("timeout".to_string())));
        assert_eq!(outcome, Outcome::Stale);
        assert!(matches!(controller.details(), Details::Ready(_)));
    }

    #[test]
    fn test_failure_shows_error() {
        let mut controller = SelectionController::new();
        let ticket = controller.select("a.png");
        let err = ApiError::Status {
            status: 500,
            url: "http://localhost:18001/api/metadata/a.png".to_string(),
        };

        assert_eq!(controller.metadata_loaded(&ticket, Err(err.clone())), Outcome::Applied);
        assert_eq!(controller.details(), &Details::Failed(err.to_string()));
    }

    #[test]
    fn test_reselecting_same_image_refetches() {
        let mut controller = SelectionController::new();
        let first = controller.select("a.png");
        controller.metadata_loaded(&first, Ok(metadata(1)));

        let second = controller.select("a.png");
        assert_ne!(first.epoch, second.epoch);
        assert_eq!(controller.details(), &Details::Loading);

        // The first round trip for the same file is stale now
        assert_eq!(controller.metadata_loaded(&first, Ok(metadata(9))), Outcome::Stale);
        assert_eq!(controller.metadata_loaded(&second, Ok(metadata(1))), Outcome::Applied);
        assert_eq!(shown_seed(&controller), Some(json!(1)));
    }

    #[test]
    fn test_preview_race_guard() {
        let mut controller = SelectionController::new();
        let ticket_a = controller.select("a.png");
        let ticket_b = controller.select("b.png");

        assert_eq!(
            controller.preview_loaded(&ticket_a, Err(ApiError::Request("reset".to_string()))),
            Outcome::Stale
        );
        assert!(matches!(controller.preview(), Some(ImageState::Loading)));

        assert_eq!(
            controller.preview_loaded(&ticket_b, Err(ApiError::Request("reset".to_string()))),
            Outcome::Applied
        );
        assert!(matches!(controller.preview(), Some(ImageState::Failed(_))));
    }
}
