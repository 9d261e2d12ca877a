pub mod client;
pub mod auth;
pub mod api;

pub use api::HistoryType;
pub use auth::{DeviceCode, TokenInfo};
pub use client::{enrich_images, TraktClient};
