/// UI module
///
/// View functions for each region of the window. They only read the
/// controllers; every interaction comes back as a `Message`.

pub mod details;
pub mod gallery;
pub mod modal;

use iced::Size;

use graph_gallery::state::thumbnails::Viewport;

/// Initial window size
pub const WINDOW_SIZE: Size = Size::new(1280.0, 800.0);

/// Height of the title/search bar
pub const HEADER_HEIGHT: f32 = 64.0;

/// Fixed width of the details panel on the right
pub const DETAILS_WIDTH: f32 = 400.0;

/// Gap between gallery cells
pub const GRID_SPACING: f32 = 8.0;

/// Padding around the gallery scroll area
pub const GALLERY_PADDING: f32 = 12.0;

/// Estimate the gallery viewport for a window size.
///
/// Used until the scroll area reports its real bounds.
pub fn gallery_viewport(window: Size) -> Viewport {
    Viewport::new(
        (window.width - DETAILS_WIDTH - 2.0 * GALLERY_PADDING).max(0.0),
        (window.height - HEADER_HEIGHT - 2.0 * GALLERY_PADDING).max(0.0),
    )
}
