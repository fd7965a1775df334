//! Data models shared by the client and the kiosk

pub mod rating;
pub mod site;

pub use rating::{Category, InvalidRating, Rating, RatingSubmission};
pub use site::{SiteConfig, SiteSummary, TablePolicy};
