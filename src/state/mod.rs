/// State management module
///
/// This module handles all application state, one controller per concern:
/// - Image listing and search filtering (catalog.rs)
/// - Lazy thumbnail loading (thumbnails.rs)
/// - Selection and the details panel (selection.rs)
/// - The full-size overlay (modal.rs)
/// - Shared data structures (data.rs)
/// - Stale-result detection for async fetches (generation.rs)

pub mod catalog;
pub mod data;
pub mod generation;
pub mod modal;
pub mod selection;
pub mod thumbnails;
