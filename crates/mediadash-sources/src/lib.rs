pub mod error;
pub mod traits;
pub mod fetcher;
pub mod xml;
pub mod factory;
pub mod tmdb;
pub mod trakt;
pub mod github;
pub mod jikan;
pub mod goodreads;
pub mod letterboxd;
pub mod myanimelist;
pub mod trueachievements;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::SourceError;
pub use traits::{BookDetailsLookup, ImageLookup, MetadataLookup, NoEnrichment};
pub use fetcher::{FeedFetcher, FeedProfile};
pub use factory::{Feed, SourceRegistry};
pub use tmdb::{TmdbClient, TmdbMediaType};
pub use trakt::{DeviceCode, HistoryType, TokenInfo, TraktClient};
pub use github::GitHubClient;
pub use jikan::{JikanClient, JikanEntry, MetadataCache, RateLimiter};
pub use goodreads::{BookDetails, BookDetailsCache, GoodreadsClient};
pub use trueachievements::TrueAchievementsClient;
