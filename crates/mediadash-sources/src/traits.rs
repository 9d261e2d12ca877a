use async_trait::async_trait;
use mediadash_models::{Images, MediaKind};

use crate::goodreads::BookDetails;
use crate::jikan::JikanEntry;
use crate::tmdb::TmdbMediaType;

/// Artwork lookup by TMDb id. Implementations never fail; a missing key or a
/// failed call yields `None`.
#[async_trait]
pub trait ImageLookup: Send + Sync {
    async fn images(&self, tmdb_id: &str, media_type: TmdbMediaType) -> Option<Images>;
}

/// Anime/manga metadata lookup by MyAnimeList id.
#[async_trait]
pub trait MetadataLookup: Send + Sync {
    async fn media_info(&self, kind: MediaKind, mal_id: &str) -> Option<JikanEntry>;
}

/// Book page scrape by Goodreads book id.
#[async_trait]
pub trait BookDetailsLookup: Send + Sync {
    async fn book_details(&self, book_id: &str) -> Option<BookDetails>;
}

/// Lookup that never finds anything, for views that skip enrichment.
pub struct NoEnrichment;

#[async_trait]
impl ImageLookup for NoEnrichment {
    async fn images(&self, _tmdb_id: &str, _media_type: TmdbMediaType) -> Option<Images> {
        None
    }
}

#[async_trait]
impl MetadataLookup for NoEnrichment {
    async fn media_info(&self, _kind: MediaKind, _mal_id: &str) -> Option<JikanEntry> {
        None
    }
}

#[async_trait]
impl BookDetailsLookup for NoEnrichment {
    async fn book_details(&self, _book_id: &str) -> Option<BookDetails> {
        None
    }
}
