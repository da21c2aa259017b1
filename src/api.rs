/// HTTP client for the image listing service
///
/// Endpoints (read-only, no auth):
/// - `GET /api/images`               -> `[{ "filename", "mtime"? }, ...]`
/// - `GET /api/thumbnail/{filename}` -> image bytes
/// - `GET /api/image/{filename}`     -> image bytes
/// - `GET /api/metadata/{filename}`  -> `{ "prompt"?, "workflow"?, ... }`
///
/// Filenames are percent-encoded as a single path segment.

use url::Url;

use crate::error::ApiError;
use crate::state::data::{ImageRecord, RawMetadata};

/// Per-image routes under `/api`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Thumbnail,
    Image,
    Metadata,
}

impl Route {
    fn segment(&self) -> &'static str {
        match self {
            Route::Thumbnail => "thumbnail",
            Route::Image => "image",
            Route::Metadata => "metadata",
        }
    }
}

/// Cheap to clone; clones share one connection pool
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base,
        }
    }

    /// `{base}/api/images`
    pub fn images_url(&self) -> Result<Url, ApiError> {
        self.api_url(&["images"])
    }

    /// `{base}/api/{route}/{filename}` with the filename percent-encoded
    pub fn url(&self, route: Route, filename: &str) -> Result<Url, ApiError> {
        self.api_url(&[route.segment(), filename])
    }

    fn api_url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    /// Fetch the image listing, in server order
    pub async fn list_images(self) -> Result<Vec<ImageRecord>, ApiError> {
        let url = self.images_url()?;
        let records = self.get(url).await?.json::<Vec<ImageRecord>>().await?;
        Ok(records)
    }

    /// Fetch the raw metadata bag of one image
    pub async fn metadata(self, filename: String) -> Result<RawMetadata, ApiError> {
        let url = self.url(Route::Metadata, &filename)?;
        let metadata = self.get(url).await?.json::<RawMetadata>().await?;
        Ok(metadata)
    }

    /// Fetch thumbnail bytes
    pub async fn thumbnail(self, filename: String) -> Result<Vec<u8>, ApiError> {
        self.bytes(Route::Thumbnail, &filename).await
    }

    /// Fetch full-size image bytes
    pub async fn image(self, filename: String) -> Result<Vec<u8>, ApiError> {
        self.bytes(Route::Image, &filename).await
    }

    async fn bytes(&self, route: Route, filename: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.url(route, filename)?;
        let bytes = self.get(url).await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    async fn get(&self, url: Url) -> Result<reqwest::Response, ApiError> {
        tracing::trace!(url = %url, "GET");
        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}
