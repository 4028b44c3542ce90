//! HTTP handlers

pub mod chat;
pub mod files;
pub mod health;
pub mod places;
pub mod visualization;

pub use chat::chat;
pub use files::{download_disposition, upload_file};
pub use health::{health_check, root};
pub use places::{place_details, poi_categories, reverse_geocode, search_places, search_poi};
pub use visualization::get_visualization;
