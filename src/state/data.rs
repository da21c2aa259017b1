/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the HTTP layer and the UI layer.

use chrono::{DateTime, Utc};
use iced::widget::image::Handle;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Represents a single image in the listing
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageRecord {
    /// Filename only (e.g., "ComfyUI_00042_.png"), unique per listing
    pub filename: String,
    /// Modification time in seconds since the epoch, if the service reports it
    #[serde(default)]
    pub mtime: Option<f64>,
}

impl ImageRecord {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            mtime: None,
        }
    }

    /// Modification time as a UTC timestamp
    pub fn modified(&self) -> Option<DateTime<Utc>> {
        let mtime = self.mtime?;
        if !mtime.is_finite() {
            return None;
        }
        let secs = mtime.trunc() as i64;
        let nanos = (mtime.fract().abs() * 1e9) as u32;
        DateTime::from_timestamp(secs, nanos)
    }
}

/// Raw per-image metadata bag, passed through as delivered
///
/// Key order is preserved (`serde_json` is built with `preserve_order`).
pub type RawMetadata = Map<String, Value>;

/// A full-size image fetched for the preview or the overlay
#[derive(Debug, Clone)]
pub enum ImageState {
    Loading,
    Ready(Handle),
    Failed(String),
}

impl ImageState {
    /// Decode-ready handle from a fetch result
    pub fn from_result(result: Result<Vec<u8>, crate::error::ApiError>) -> Self {
        match result {
            Ok(bytes) => ImageState::Ready(Handle::from_bytes(bytes)),
            Err(err) => ImageState::Failed(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_ignores_unknown_keys() {
        let json = r#"[{"filename": "a.png", "mtime": 1700000000.5, "size": 12}, {"filename": "b.png"}]"#;
        let records: Vec<ImageRecord> = serde_json::from_str(json).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].filename, "a.png");
        assert_eq!(records[0].mtime, Some(1700000000.5));
        assert_eq!(records[1], ImageRecord::new("b.png"));
    }

    #[test]
    fn test_modified_timestamp() {
        let mut record = ImageRecord::new("a.png");
        assert!(record.modified().is_none());

        record.mtime = Some(0.0);
        let modified = record.modified().unwrap();
        assert_eq!(modified.format("%Y-%m-%d").to_string(), "1970-01-01");

        record.mtime = Some(f64::NAN);
        assert!(record.modified().is_none());
    }
}
