//! Shared types for the Parche kiosk
//!
//! Wire models exchanged with the ratings API, the response envelope
//! and small utilities used by both the client and the kiosk crates.

pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{
    Category, InvalidRating, Rating, RatingSubmission, SiteConfig, SiteSummary, TablePolicy,
};
pub use response::ApiEnvelope;

/// Brand shown when the site configuration carries no `nombre_marca`
pub const DEFAULT_BRAND_NAME: &str = "El Parche del Gato";
