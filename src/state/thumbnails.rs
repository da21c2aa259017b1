/// Visibility-driven thumbnail loading
///
/// Every rendered thumbnail starts without a source. When it first
/// intersects the gallery viewport the loader hands out exactly one
/// request for it; later visibility changes never request it again.
/// A new render (search change) drops all slots, and loads still in
/// flight for the old render land as no-ops.

use iced::widget::image::Handle;
use std::ops::Range;

use super::generation::{Epoch, Generation};
use crate::error::ApiError;

/// Visible part of the gallery, in logical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Vertical scroll offset from the top of the grid
    pub offset_y: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            offset_y: 0.0,
        }
    }
}

impl From<iced::widget::scrollable::Viewport> for Viewport {
    fn from(viewport: iced::widget::scrollable::Viewport) -> Self {
        let bounds = viewport.bounds();
        Self {
            width: bounds.width,
            height: bounds.height,
            offset_y: viewport.absolute_offset().y,
        }
    }
}

/// Fixed-cell grid geometry shared by the view and the loader
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    /// Edge of a square cell
    pub cell: f32,
    /// Gap between cells, both directions
    pub spacing: f32,
}

impl GridLayout {
    pub fn new(cell: f32, spacing: f32) -> Self {
        Self { cell, spacing }
    }

    pub fn columns(&self, width: f32) -> usize {
        let columns = ((width + self.spacing) / (self.cell + self.spacing)).floor();
        if columns.is_finite() && columns >= 1.0 {
            columns as usize
        } else {
            1
        }
    }

    pub fn row_height(&self) -> f32 {
        self.cell + self.spacing
    }

    pub fn content_height(&self, width: f32, count: usize) -> f32 {
        let rows = count.div_ceil(self.columns(width));
        (rows as f32 * self.row_height() - self.spacing).max(0.0)
    }

    /// Indices of the cells intersecting the viewport
    pub fn visible_range(&self, viewport: &Viewport, count: usize) -> Range<usize> {
        if count == 0 || viewport.height <= 0.0 {
            return 0..0;
        }
        let columns = self.columns(viewport.width);
        let row_height = self.row_height();
        let top = viewport.offset_y.max(0.0);

        let first_row = (top / row_height).floor() as usize;
        let end_row = ((top + viewport.height) / row_height).ceil() as usize;

        let start = (first_row * columns).min(count);
        let end = (end_row * columns).min(count);
        start..end
    }
}

/// Source state of one rendered thumbnail
#[derive(Debug, Clone)]
pub enum Thumbnail {
    /// Not yet visible, no source assigned
    Unassigned,
    /// Source assigned, bytes in flight
    Requested,
    Loaded(Handle),
    Failed,
}

#[derive(Debug)]
struct Slot {
    filename: String,
    thumbnail: Thumbnail,
}

/// One thumbnail fetch, tagged with the render it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailRequest {
    pub filename: String,
    pub index: usize,
    pub epoch: Epoch,
}

/// The ThumbnailLoader tracks the source of every rendered thumbnail
#[derive(Debug)]
pub struct ThumbnailLoader {
    layout: GridLayout,
    viewport: Viewport,
    /// When false there is no visibility signal and everything loads eagerly
    lazy: bool,
    render: Generation,
    slots: Vec<Slot>,
}

impl ThumbnailLoader {
    pub fn new(layout: GridLayout, viewport: Viewport, lazy: bool) -> Self {
        Self {
            layout,
            viewport,
            lazy,
            render: Generation::new(),
            slots: Vec::new(),
        }
    }

    /// Start a new render with the given thumbnails, in display order
    pub fn reset(&mut self, filenames: Vec<String>) -> Vec<ThumbnailRequest> {
        self.render.advance();
        self.slots = filenames
            .into_iter()
            .map(|filename| Slot {
                filename,
                thumbnail: Thumbnail::Unassigned,
            })
            .collect();

        let max_offset = (self.layout.content_height(self.viewport.width, self.slots.len())
            - self.viewport.height)
            .max(0.0);
        self.viewport.offset_y = self.viewport.offset_y.min(max_offset);

        if self.lazy {
            self.assign_visible()
        } else {
            self.assign(0..self.slots.len())
        }
    }

    /// Record a new viewport and request thumbnails seen for the first time
    pub fn observe(&mut self, viewport: Viewport) -> Vec<ThumbnailRequest> {
        self.viewport = viewport;
        if self.lazy {
            self.assign_visible()
        } else {
            Vec::new()
        }
    }

    /// The window changed size; the scroll offset is kept
    pub fn resize(&mut self, width: f32, height: f32) -> Vec<ThumbnailRequest> {
        let offset_y = self.viewport.offset_y;
        self.observe(Viewport {
            width,
            height,
            offset_y,
        })
    }

    /// Store fetched bytes. Returns false when the request belongs to an
    /// earlier render.
    pub fn finish(&mut self, request: &ThumbnailRequest, result: Result<Vec<u8>, ApiError>) -> bool {
        if !self.render.is_current(request.epoch) {
            return false;
        }
        let Some(slot) = self.slots.get_mut(request.index) else {
            return false;
        };
        if slot.filename != request.filename {
            return false;
        }

        slot.thumbnail = match result {
            Ok(bytes) => Thumbnail::Loaded(Handle::from_bytes(bytes)),
            Err(err) => {
                tracing::warn!(filename = %request.filename, error = %err, "failed to load thumbnail");
                Thumbnail::Failed
            }
        };
        true
    }

    fn assign_visible(&mut self) -> Vec<ThumbnailRequest> {
        let range = self.layout.visible_range(&self.viewport, self.slots.len());
        self.assign(range)
    }

    fn assign(&mut self, range: Range<usize>) -> Vec<ThumbnailRequest> {
        let epoch = self.render.current();
        let mut requests = Vec::new();

        for index in range {
            let slot = &mut self.slots[index];
            if matches!(slot.thumbnail, Thumbnail::Unassigned) {
                slot.thumbnail = Thumbnail::Requested;
                requests.push(ThumbnailRequest {
                    filename: slot.filename.clone(),
                    index,
                    epoch,
                });
            }
        }

        if !requests.is_empty() {
            tracing::debug!(count = requests.len(), "requesting thumbnails");
        }
        requests
    }

    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    /// Columns the gallery renders at the current width
    pub fn columns(&self) -> usize {
        self.layout.columns(self.viewport.width)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Rendered thumbnails in display order
    pub fn thumbnails(&self) -> impl Iterator<Item = (&str, &Thumbnail)> {
        self.slots
            .iter()
            .map(|slot| (slot.filename.as_str(), &slot.thumbnail))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("img_{i:03}.png")).collect()
    }

    // 4 columns of 100px cells with 10px gaps, 3 rows tall viewport
    fn loader(lazy: bool) -> ThumbnailLoader {
        ThumbnailLoader::new(GridLayout::new(100.0, 10.0), Viewport::new(430.0, 300.0), lazy)
    }

    #[test]
    fn test_columns() {
        let layout = GridLayout::new(100.0, 10.0);
        assert_eq!(layout.columns(430.0), 4);
        assert_eq!(layout.columns(429.0), 3);
        assert_eq!(layout.columns(50.0), 1);
        assert_eq!(layout.columns(0.0), 1);
        assert_eq!(layout.columns(f32::NAN), 1);
    }

    #[test]
    fn test_visible_range() {
        let layout = GridLayout::new(100.0, 10.0);
        let viewport = Viewport::new(430.0, 300.0);
        assert_eq!(layout.visible_range(&viewport, 100), 0..12);
        assert_eq!(layout.visible_range(&viewport, 5), 0..5);
        assert_eq!(layout.visible_range(&viewport, 0), 0..0);

        let scrolled = Viewport {
            offset_y: 220.0,
            ..viewport
        };
        assert_eq!(layout.visible_range(&scrolled, 100), 8..20);
    }

    #[test]
    fn test_reset_requests_visible_only() {
        let mut loader = loader(true);
        let requests = loader.reset(names(100));

        assert_eq!(requests.len(), 12);
        assert_eq!(requests[0].filename, "img_000.png");
        assert_eq!(requests[11].index, 11);
    }

    #[test]
    fn test_thumbnail_requested_at_most_once() {
        let mut loader = loader(true);
        let first = loader.reset(names(100));
        assert_eq!(first.len(), 12);

        // Scroll away and back: rows already assigned are not requested again
        let down = loader.observe(Viewport {
            width: 430.0,
            height: 300.0,
            offset_y: 550.0,
        });
        assert_eq!(down.iter().map(|r| r.index).collect::<Vec<_>>(), (20..32).collect::<Vec<_>>());

        let back = loader.observe(Viewport::new(430.0, 300.0));
        assert!(back.is_empty());

        let again = loader.observe(Viewport {
            width: 430.0,
            height: 300.0,
            offset_y: 550.0,
        });
        assert!(again.is_empty());
    }

    #[test]
    fn test_failed_thumbnail_is_not_retried() {
        let mut loader = loader(true);
        let requests = loader.reset(names(4));
        assert!(loader.finish(&requests[0], Err(ApiError::Request("refused".to_string()))));

        assert!(loader.observe(Viewport::new(430.0, 300.0)).is_empty());
        let (_, thumbnail) = loader.thumbnails().next().unwrap();
        assert!(matches!(thumbnail, Thumbnail::Failed));
    }

    #[test]
    fn test_loading_one_does_not_touch_others() {
        let mut loader = loader(true);
        let requests = loader.reset(names(3));
        assert!(loader.finish(&requests[1], Err(ApiError::Request("refused".to_string()))));

        let states: Vec<bool> = loader
            .thumbnails()
            .map(|(_, t)| matches!(t, Thumbnail::Requested))
            .collect();
        assert_eq!(states, vec![true, false, true]);
    }

    #[test]
    fn test_eager_without_visibility_signal() {
        let mut loader = loader(false);
        let requests = loader.reset(names(100));
        assert_eq!(requests.len(), 100);

        let scrolled = loader.observe(Viewport {
            width: 430.0,
            height: 300.0,
            offset_y: 1000.0,
        });
        assert!(scrolled.is_empty());
    }

    #[test]
    fn test_old_render_results_are_ignored() {
        let mut loader = loader(true);
        let old = loader.reset(names(10));
        let new = loader.reset(vec!["img_005.png".to_string()]);

        assert!(!loader.finish(&old[0], Err(ApiError::Request("late".to_string()))));
        assert_eq!(new.len(), 1);
        assert!(matches!(loader.thumbnails().next(), Some((_, Thumbnail::Requested))));
    }

    #[test]
    fn test_reset_clamps_stale_scroll_offset() {
        let mut loader = loader(true);
        loader.reset(names(200));
        loader.observe(Viewport {
            width: 430.0,
            height: 300.0,
            offset_y: 4000.0,
        });

        // A search leaves only two rows; they must still load
        let requests = loader.reset(names(8));
        assert_eq!(requests.len(), 8);
    }

    #[test]
    fn test_resize_keeps_offset() {
        let mut loader = loader(true);
        loader.reset(names(100));
        loader.observe(Viewport {
            width: 430.0,
            height: 300.0,
            offset_y: 330.0,
        });

        // Wider window: 6 columns, rows 3..6 now hold 18..36, of which
        // 18..24 were already requested at 4 columns
        let requests = loader.resize(650.0, 300.0);
        assert_eq!(loader.columns(), 6);
        assert_eq!(requests.first().map(|r| r.index), Some(24));
        assert_eq!(requests.len(), 12);
    }
}
