use super::data::ImageRecord;
use crate::error::ApiError;

/// Lifecycle of the image listing
#[derive(Debug, Clone, PartialEq)]
enum Listing {
    /// Listing request still in flight
    Loading,
    /// Listing received; order is the server's order
    Loaded(Vec<ImageRecord>),
    /// Listing failed; the gallery stays empty
    Failed(String),
}

/// The ImageCatalog holds every image the service reported plus the
/// live search query. Filtering never mutates the stored records.
#[derive(Debug)]
pub struct ImageCatalog {
    listing: Listing,
    query: String,
}

/// Subsequence of the catalog matching a query, in catalog order
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView<'a> {
    records: Vec<&'a ImageRecord>,
}

impl<'a> FilteredView<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a ImageRecord> + '_ {
        self.records.iter().copied()
    }

    pub fn filenames(&self) -> Vec<String> {
        self.iter().map(|record| record.filename.clone()).collect()
    }
}

impl ImageCatalog {
    pub fn new() -> Self {
        Self {
            listing: Listing::Loading,
            query: String::new(),
        }
    }

    /// Replace the catalog wholesale with the result of a listing fetch.
    ///
    /// A failed fetch leaves the catalog empty in an error state; it is
    /// never partially populated.
    pub fn load(&mut self, result: Result<Vec<ImageRecord>, ApiError>) {
        self.listing = match result {
            Ok(records) => {
                tracing::info!(count = records.len(), "image listing loaded");
                Listing::Loaded(records)
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to fetch image listing");
                Listing::Failed(err.to_string())
            }
        };
    }

    /// All records, in listing order (empty unless loaded)
    pub fn records(&self) -> &[ImageRecord] {
        match &self.listing {
            Listing::Loaded(records) => records,
            _ => &[],
        }
    }

    pub fn get(&self, filename: &str) -> Option<&ImageRecord> {
        self.records().iter().find(|record| record.filename == filename)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: String) {
        self.query = query;
    }

    /// Case-insensitive substring match on the filename.
    /// An empty query matches everything.
    pub fn filter(&self, query: &str) -> FilteredView<'_> {
        let needle = query.to_lowercase();
        let records = self
            .records()
            .iter()
            .filter(|record| needle.is_empty() || record.filename.to_lowercase().contains(&needle))
            .collect();
        FilteredView { records }
    }

    /// Filter with the stored search query
    pub fn visible(&self) -> FilteredView<'_> {
        self.filter(&self.query)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.listing, Listing::Loading)
    }

    /// Error message of a failed listing, if any
    pub fn error(&self) -> Option<&str> {
        match &self.listing {
            Listing::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Text for the count area in the header
    pub fn status_line(&self) -> String {
        match &self.listing {
            Listing::Loading => "Loading images...".to_string(),
            Listing::Failed(_) => "Error loading images".to_string(),
            Listing::Loaded(records) if records.len() == 1 => "1 image".to_string(),
            Listing::Loaded(records) => format!("{} images", records.len()),
        }
    }
}

impl Default for ImageCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(names: &[&str]) -> ImageCatalog {
        let mut catalog = ImageCatalog::new();
        catalog.load(Ok(names.iter().map(|name| ImageRecord::new(*name)).collect()));
        catalog
    }

    #[test]
    fn test_filter_end_to_end_example() {
        let catalog = catalog(&["a.png", "b.png"]);
        let view = catalog.filter("b");
        assert_eq!(view.filenames(), vec!["b.png".to_string()]);
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let catalog = catalog(&["IMG_001.png", "img_002.png", "other.jpg"]);
        assert_eq!(catalog.filter("IMG"), catalog.filter("img"));
        assert_eq!(catalog.filter("IMG").len(), 2);
    }

    #[test]
    fn test_filter_preserves_catalog_order() {
        let catalog = catalog(&["z_cat.png", "a_dog.png", "m_cat.png", "b_cat.png"]);
        let view = catalog.filter("cat");
        assert_eq!(view.filenames(), vec!["z_cat.png", "m_cat.png", "b_cat.png"]);

        // Every filtered record is the very record held by the catalog
        for record in view.iter() {
            assert!(catalog.records().iter().any(|r| std::ptr::eq(r, record)));
        }
    }

    #[test]
    fn test_empty_query_returns_everything() {
        let catalog = catalog(&["a.png", "b.png", "c.png"]);
        assert_eq!(catalog.filter("").len(), 3);
        assert_eq!(catalog.visible().len(), 3);
    }

    #[test]
    fn test_no_fuzzy_matching() {
        let catalog = catalog(&["sunset.png"]);
        assert!(catalog.filter("snset").is_empty());
    }

    #[test]
    fn test_filter_does_not_mutate_catalog() {
        let mut catalog = catalog(&["a.png", "b.png"]);
        catalog.set_query("a".to_string());
        assert_eq!(catalog.visible().len(), 1);
        assert_eq!(catalog.records().len(), 2);
    }

    #[test]
    fn test_failed_listing_stays_empty() {
        let mut catalog = catalog(&["a.png"]);
        catalog.load(Err(ApiError::Decode("expected value at line 1".to_string())));

        assert!(catalog.records().is_empty());
        assert!(catalog.filter("").is_empty());
        assert!(catalog.error().is_some());
        assert_eq!(catalog.status_line(), "Error loading images");
    }

    #[test]
    fn test_status_line() {
        let loading = ImageCatalog::new();
        assert!(loading.is_loading());
        assert_eq!(loading.status_line(), "Loading images...");

        assert_eq!(catalog(&["a.png"]).status_line(), "1 image");
        assert_eq!(catalog(&["a.png", "b.png"]).status_line(), "2 images");
    }

    #[test]
    fn test_get_by_filename() {
        let catalog = catalog(&["a.png", "b.png"]);
        assert_eq!(catalog.get("b.png").map(|r| r.filename.as_str()), Some("b.png"));
        assert!(catalog.get("c.png").is_none());
    }
}
