//! One entry point per dashboard view.
//!
//! Each view fetches what it needs from its source, runs the parsers and
//! aggregators, and returns either a typed result or the `SourceError` of the
//! failing source. Views are independent of each other: the HTTP server and
//! the `fetch` command render them one at a time.

use chrono::Utc;
use mediadash_config::{Config, CredentialStore};
use mediadash_models::{
    AchievementChart, ActivityDay, Book, CombinedMediaStats, Commit, FilmStats, GameStats,
    GamesOverview, GitHubActivity, GitHubStats, HistoryEntry, LoggedMovie, MediaEntry, MediaKind,
    MediaListStats, ReadingHistory, ReadingStats, Repo, WatchStats, WatchTimeSummary, WatchedItem,
};
use mediadash_sources::{goodreads, letterboxd, myanimelist, trakt, Feed, NoEnrichment, SourceError, SourceRegistry};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

use crate::{anime, film, games, github, reading, watch};

/// Trakt history entries shown in the recent-history view
pub const HISTORY_LIMIT: u32 = 20;
/// Trakt history entries scanned for the monthly watch-time chart
pub const WATCH_TIME_HISTORY_LIMIT: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Stats,
    Shows,
    Movies,
    History,
    WatchTime,
    GoodreadsBooks,
    GoodreadsStats,
    GoodreadsHistory,
    GoodreadsReadingStats,
    LetterboxdMovies,
    LetterboxdStats,
    MyAnimeListAnime,
    MyAnimeListManga,
    MyAnimeListStats,
    GitHubActivity,
    GitHubStats,
    GitHubCommits,
    GitHubRepos,
    GitHubChart,
    TrueAchievementsGames,
    TrueAchievementsStats,
    TrueAchievementsChart,
}

impl View {
    pub const ALL: [View; 22] = [
        View::Stats,
        View::Shows,
        View::Movies,
        View::History,
        View::WatchTime,
        View::GoodreadsBooks,
        View::GoodreadsStats,
        View::GoodreadsHistory,
        View::GoodreadsReadingStats,
        View::LetterboxdMovies,
        View::LetterboxdStats,
        View::MyAnimeListAnime,
        View::MyAnimeListManga,
        View::MyAnimeListStats,
        View::GitHubActivity,
        View::GitHubStats,
        View::GitHubCommits,
        View::GitHubRepos,
        View::GitHubChart,
        View::TrueAchievementsGames,
        View::TrueAchievementsStats,
        View::TrueAchievementsChart,
    ];

    /// JSON route serving this view
    pub fn path(&self) -> &'static str {
        match self {
            View::Stats => "/api/stats",
            View::Shows => "/api/shows",
            View::Movies => "/api/movies",
            View::History => "/api/history",
            View::WatchTime => "/api/watch-time",
            View::GoodreadsBooks => "/api/goodreads/books",
            View::GoodreadsStats => "/api/goodreads/stats",
            View::GoodreadsHistory => "/api/goodreads/history",
            View::GoodreadsReadingStats => "/api/goodreads/reading-stats",
            View::LetterboxdMovies => "/api/letterboxd/movies",
            View::LetterboxdStats => "/api/letterboxd/stats",
            View::MyAnimeListAnime => "/api/myanimelist/anime",
            View::MyAnimeListManga => "/api/myanimelist/manga",
            View::MyAnimeListStats => "/api/myanimelist/stats",
            View::GitHubActivity => "/api/github/activity",
            View::GitHubStats => "/api/github/stats",
            View::GitHubCommits => "/api/github/commits",
            View::GitHubRepos => "/api/github/repos",
            View::GitHubChart => "/api/github/chart",
            View::TrueAchievementsGames => "/api/trueachievements/games",
            View::TrueAchievementsStats => "/api/trueachievements/stats",
            View::TrueAchievementsChart => "/api/trueachievements/chart",
        }
    }

    /// Command-line name, e.g. `goodreads/reading-stats`
    pub fn name(&self) -> &'static str {
        self.path().trim_start_matches("/api/")
    }

    pub fn source_name(&self) -> &'static str {
        match self {
            View::Stats | View::Shows | View::Movies | View::History | View::WatchTime => "trakt",
            View::GoodreadsBooks
            | View::GoodreadsStats
            | View::GoodreadsHistory
            | View::GoodreadsReadingStats => "goodreads",
            View::LetterboxdMovies | View::LetterboxdStats => "letterboxd",
            View::MyAnimeListAnime | View::MyAnimeListManga | View::MyAnimeListStats => "myanimelist",
            View::GitHubActivity
            | View::GitHubStats
            | View::GitHubCommits
            | View::GitHubRepos
            | View::GitHubChart => "github",
            View::TrueAchievementsGames | View::TrueAchievementsStats | View::TrueAchievementsChart => {
                "trueachievements"
            }
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for View {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().trim_start_matches("/api/").trim_matches('/');
        View::ALL
            .into_iter()
            .find(|view| view.name() == wanted)
            .ok_or_else(|| anyhow::anyhow!("Unknown view '{}'", s))
    }
}

/// Renders dashboard views from the configured sources
pub struct Dashboard {
    sources: SourceRegistry,
}

impl Dashboard {
    pub fn new(sources: SourceRegistry) -> Self {
        Self { sources }
    }

    pub fn from_config(config: &Config, credentials: &CredentialStore) -> Result<Self, SourceError> {
        Ok(Self::new(SourceRegistry::from_config(config, credentials)?))
    }

    pub fn sources(&self) -> &SourceRegistry {
        &self.sources
    }

    // === Trakt ===

    pub async fn stats(&self) -> Result<WatchStats, SourceError> {
        let trakt = self.sources.trakt()?;
        let shows = trakt.watched_shows().await?;
        let movies = trakt.watched_movies().await?;
        let episodes = trakt.watched_episodes().await?;
        Ok(watch::watch_stats(&shows, &movies, &episodes))
    }

    pub async fn shows(&self) -> Result<Vec<WatchedItem>, SourceError> {
        let shows = self.sources.trakt()?.watched_shows().await?;
        let mut shows = trakt::enrich_images(shows, self.sources.tmdb()).await;
        watch::sort_shows(&mut shows);
        Ok(shows)
    }

    pub async fn movies(&self) -> Result<Vec<WatchedItem>, SourceError> {
        let movies = self.sources.trakt()?.watched_movies().await?;
        Ok(trakt::enrich_images(movies, self.sources.tmdb()).await)
    }

    pub async fn history(&self) -> Result<Vec<HistoryEntry>, SourceError> {
        let mut history = self.sources.trakt()?.history(HISTORY_LIMIT, None).await?;
        watch::sort_history(&mut history);
        Ok(history)
    }

    pub async fn watch_time(&self) -> Result<WatchTimeSummary, SourceError> {
        let history = self
            .sources
            .trakt()?
            .history(WATCH_TIME_HISTORY_LIMIT, None)
            .await?;
        Ok(watch::monthly_watch_time(&history, Utc::now()))
    }

    // === Goodreads ===

    pub async fn goodreads_books(&self) -> Result<Vec<Book>, SourceError> {
        let xml = self.sources.fetch_feed(Feed::Goodreads).await?;
        let mut books = goodreads::parse_goodreads_rss(&xml, self.sources.goodreads_pages()).await;
        reading::sort_books(&mut books);
        Ok(books)
    }

    pub async fn goodreads_stats(&self) -> Result<ReadingStats, SourceError> {
        Ok(reading::reading_stats(&self.goodreads_books().await?))
    }

    pub async fn goodreads_reading_stats(&self) -> Result<ReadingHistory, SourceError> {
        Ok(reading::monthly_reading(&self.goodreads_books().await?))
    }

    // === Letterboxd ===

    pub async fn letterboxd_movies(&self) -> Result<Vec<LoggedMovie>, SourceError> {
        let xml = self.sources.fetch_feed(Feed::Letterboxd).await?;
        let mut movies = letterboxd::parse_letterboxd_rss(&xml, self.sources.tmdb()).await;
        film::sort_films(&mut movies);
        Ok(movies)
    }

    /// Counts need no artwork, so TMDb is not consulted.
    pub async fn letterboxd_stats(&self) -> Result<FilmStats, SourceError> {
        let xml = self.sources.fetch_feed(Feed::Letterboxd).await?;
        let movies = letterboxd::parse_letterboxd_rss(&xml, &NoEnrichment).await;
        Ok(film::film_stats(&movies))
    }

    // === MyAnimeList ===

    pub async fn mal_list(&self, kind: MediaKind) -> Result<Vec<MediaEntry>, SourceError> {
        let feed = match kind {
            MediaKind::Anime => Feed::MyAnimeListAnime,
            MediaKind::Manga => Feed::MyAnimeListManga,
        };
        let xml = self.sources.fetch_feed(feed).await?;
        let mut entries = myanimelist::parse_mal_rss(&xml, kind, self.sources.jikan()).await;
        anime::sort_entries(&mut entries);
        Ok(entries)
    }

    async fn mal_list_stats(&self, kind: MediaKind) -> Result<MediaListStats, SourceError> {
        match self.mal_list(kind).await {
            Ok(entries) => Ok(anime::media_list_stats(&entries, kind)),
            Err(e) if e.is_not_configured() => {
                debug!(kind = kind.as_str(), "MyAnimeList feed not configured, counting zero");
                Ok(MediaListStats::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Anime and manga counts side by side. A list without a feed counts as
    /// empty.
    pub async fn mal_stats(&self) -> Result<CombinedMediaStats, SourceError> {
        let anime_stats = self.mal_list_stats(MediaKind::Anime).await?;
        let manga_stats = self.mal_list_stats(MediaKind::Manga).await?;
        Ok(anime::combine(&anime_stats, &manga_stats))
    }

    // === GitHub ===

    pub async fn github_activity(&self) -> Result<Vec<GitHubActivity>, SourceError> {
        self.sources.github()?.activity().await
    }

    pub async fn github_stats(&self) -> Result<GitHubStats, SourceError> {
        self.sources.github()?.stats().await
    }

    pub async fn github_commits(&self) -> Result<Vec<Commit>, SourceError> {
        self.sources.github()?.commits().await
    }

    pub async fn github_repos(&self) -> Result<Vec<Repo>, SourceError> {
        self.sources.github()?.repos().await
    }

    pub async fn github_chart(&self) -> Result<Vec<ActivityDay>, SourceError> {
        Ok(github::activity_by_day(&self.github_activity().await?))
    }

    // === TrueAchievements ===

    /// Games, totals and the monthly chart from a single page fetch.
    pub async fn games_overview(&self) -> Result<GamesOverview, SourceError> {
        let mut games = self.sources.trueachievements()?.games().await?;
        let stats = games::game_stats(&games);
        let chart = games::achievement_chart(&games);
        games::sort_by_last_played(&mut games);
        Ok(GamesOverview { games, stats, chart })
    }

    pub async fn game_stats(&self) -> Result<GameStats, SourceError> {
        Ok(self.games_overview().await?.stats)
    }

    pub async fn achievement_chart(&self) -> Result<AchievementChart, SourceError> {
        Ok(self.games_overview().await?.chart)
    }

    /// Render any view as JSON.
    pub async fn render(&self, view: View) -> Result<Value, SourceError> {
        debug!(view = %view, "Rendering view");
        let value = match view {
            View::Stats => to_json(view, self.stats().await?),
            View::Shows => to_json(view, self.shows().await?),
            View::Movies => to_json(view, self.movies().await?),
            View::History => to_json(view, self.history().await?),
            View::WatchTime => to_json(view, self.watch_time().await?),
            View::GoodreadsBooks | View::GoodreadsHistory => to_json(view, self.goodreads_books().await?),
            View::GoodreadsStats => to_json(view, self.goodreads_stats().await?),
            View::GoodreadsReadingStats => to_json(view, self.goodreads_reading_stats().await?),
            View::LetterboxdMovies => to_json(view, self.letterboxd_movies().await?),
            View::LetterboxdStats => to_json(view, self.letterboxd_stats().await?),
            View::MyAnimeListAnime => to_json(view, self.mal_list(MediaKind::Anime).await?),
            View::MyAnimeListManga => to_json(view, self.mal_list(MediaKind::Manga).await?),
            View::MyAnimeListStats => to_json(view, self.mal_stats().await?),
            View::GitHubActivity => to_json(view, self.github_activity().await?),
            View::GitHubStats => to_json(view, self.github_stats().await?),
            View::GitHubCommits => to_json(view, self.github_commits().await?),
            View::GitHubRepos => to_json(view, self.github_repos().await?),
            View::GitHubChart => to_json(view, self.github_chart().await?),
            View::TrueAchievementsGames => to_json(view, self.games_overview().await?.games),
            View::TrueAchievementsStats => to_json(view, self.game_stats().await?),
            View::TrueAchievementsChart => to_json(view, self.achievement_chart().await?),
        }?;
        info!(view = %view, "Rendered view");
        Ok(value)
    }
}

fn to_json<T: Serialize>(view: View, value: T) -> Result<Value, SourceError> {
    serde_json::to_value(value).map_err(|e| SourceError::decode(view.source_name(), e))
}
