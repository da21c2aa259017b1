//! Gallery client for generated images.
//!
//! The library holds the state controllers, the generation-graph
//! summary heuristic and the HTTP client; the binary wires them into an
//! iced application.

pub mod api;
pub mod config;
pub mod error;
pub mod metadata;
pub mod state;
