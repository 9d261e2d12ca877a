// Jikan API client - unofficial MyAnimeList metadata API
// API Documentation: https://docs.api.jikan.moe/

pub mod cache;
pub mod client;
pub mod rate_limit;

pub use cache::MetadataCache;
pub use client::{JikanClient, JikanEntry};
pub use rate_limit::RateLimiter;
