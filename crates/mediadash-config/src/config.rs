use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub trakt: TraktConfig,
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub goodreads: GoodreadsConfig,
    #[serde(default)]
    pub letterboxd: LetterboxdConfig,
    #[serde(default)]
    pub myanimelist: MyAnimeListConfig,
    #[serde(default)]
    pub trueachievements: TrueAchievementsConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TraktConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    /// Explicit token; wins over the one stored by `mediadash auth trakt`
    #[serde(default)]
    pub access_token: String,
    #[serde(default = "default_trakt_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_tmdb_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GitHubConfig {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_github_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoodreadsConfig {
    #[serde(default)]
    pub rss_url: String,
    /// Site used for book detail pages
    #[serde(default = "default_goodreads_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LetterboxdConfig {
    #[serde(default)]
    pub rss_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MyAnimeListConfig {
    #[serde(default)]
    pub anime_rss_url: String,
    #[serde(default)]
    pub manga_rss_url: String,
    #[serde(default = "default_jikan_base_url")]
    pub jikan_base_url: String,
    /// Minimum spacing between Jikan requests
    #[serde(default = "default_jikan_min_interval_secs")]
    pub jikan_min_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrueAchievementsConfig {
    #[serde(default)]
    pub username: String,
    #[serde(default = "default_trueachievements_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_trakt_base_url() -> String {
    "https://api.trakt.tv".to_string()
}

fn default_tmdb_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_github_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_goodreads_base_url() -> String {
    "https://www.goodreads.com".to_string()
}

fn default_jikan_base_url() -> String {
    "https://api.jikan.moe".to_string()
}

fn default_jikan_min_interval_secs() -> u64 {
    4
}

fn default_trueachievements_base_url() -> String {
    "https://www.trueachievements.com".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for TraktConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            access_token: String::new(),
            base_url: default_trakt_base_url(),
        }
    }
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_tmdb_base_url(),
        }
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            token: String::new(),
            base_url: default_github_base_url(),
        }
    }
}

impl Default for GoodreadsConfig {
    fn default() -> Self {
        Self {
            rss_url: String::new(),
            base_url: default_goodreads_base_url(),
        }
    }
}

impl Default for MyAnimeListConfig {
    fn default() -> Self {
        Self {
            anime_rss_url: String::new(),
            manga_rss_url: String::new(),
            jikan_base_url: default_jikan_base_url(),
            jikan_min_interval_secs: default_jikan_min_interval_secs(),
        }
    }
}

impl Default for TrueAchievementsConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            base_url: default_trueachievements_base_url(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

/// Empty values and template values such as `YOUR_CLIENT_ID` count as unset.
pub fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.starts_with("YOUR_")
}

/// The trimmed value, or `None` when it is a placeholder.
pub fn non_placeholder(value: &str) -> Option<&str> {
    if is_placeholder(value) {
        None
    } else {
        Some(value.trim())
    }
}

const REDACTED: &str = "********";
const MAX_JIKAN_INTERVAL_SECS: u64 = 60;

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file when it exists, defaults otherwise.
    pub fn load_or_default(path: &PathBuf) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load `.env`, then the config file, then overlay the process environment.
    pub fn load(path: &PathBuf) -> anyhow::Result<Self> {
        if let Ok(env_path) = dotenvy::dotenv() {
            tracing::debug!(path = %env_path.display(), "Loaded .env file");
        }
        let mut config = Self::load_or_default(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.clamp_limits();
        for problem in config.problems() {
            tracing::warn!(problem = %problem, "Configuration problem, affected source disabled");
        }
        Ok(config)
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Overlay environment values on top of the file. Placeholder values in
    /// the environment are ignored so they never clobber a real file value.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !is_placeholder(v));

        if let Some(v) = get("TRAKT_CLIENT_ID") {
            self.trakt.client_id = v;
        }
        if let Some(v) = get("TRAKT_CLIENT_SECRET") {
            self.trakt.client_secret = v;
        }
        if let Some(v) = get("TRAKT_ACCESS_TOKEN") {
            self.trakt.access_token = v;
        }
        if let Some(v) = get("TMDB_API_KEY") {
            self.tmdb.api_key = v;
        }
        if let Some(v) = get("GITHUB_USERNAME") {
            self.github.username = v;
        }
        if let Some(v) = get("GITHUB_TOKEN") {
            self.github.token = v;
        }
        if let Some(v) = get("GOODREADS_RSS_URL") {
            self.goodreads.rss_url = v;
        }
        if let Some(v) = get("LETTERBOXD_RSS_URL") {
            self.letterboxd.rss_url = v;
        }
        if let Some(v) = get("MAL_ANIME_RSS_URL") {
            self.myanimelist.anime_rss_url = v;
        }
        if let Some(v) = get("MAL_MANGA_RSS_URL") {
            self.myanimelist.manga_rss_url = v;
        }
        if let Some(v) = get("TRUEACHIEVEMENTS_USERNAME") {
            self.trueachievements.username = v;
        }
        if let Some(v) = get("PORT") {
            match v.trim().parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(value = %v, "Ignoring invalid PORT"),
            }
        }
    }

    /// Problems that disable a single source. They are logged by [`load`]
    /// and never fail the config as a whole; the affected source reports
    /// itself as not configured when one of its views is requested.
    ///
    /// [`load`]: Config::load
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let feeds = [
            ("goodreads.rss_url", &self.goodreads.rss_url),
            ("letterboxd.rss_url", &self.letterboxd.rss_url),
            ("myanimelist.anime_rss_url", &self.myanimelist.anime_rss_url),
            ("myanimelist.manga_rss_url", &self.myanimelist.manga_rss_url),
        ];
        for (name, url) in feeds {
            if let Some(url) = non_placeholder(url) {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    problems.push(format!("{} must be an http(s) URL: {}", name, url));
                }
            }
        }

        if non_placeholder(&self.github.token).is_some()
            && non_placeholder(&self.github.username).is_none()
        {
            problems.push("github.token is set but github.username is not configured".to_string());
        }

        problems
    }

    /// Clamp values that have a safe upper bound.
    fn clamp_limits(&mut self) {
        if self.myanimelist.jikan_min_interval_secs > MAX_JIKAN_INTERVAL_SECS {
            tracing::warn!(
                value = self.myanimelist.jikan_min_interval_secs,
                max = MAX_JIKAN_INTERVAL_SECS,
                "myanimelist.jikan_min_interval_secs too large, clamping"
            );
            self.myanimelist.jikan_min_interval_secs = MAX_JIKAN_INTERVAL_SECS;
        }
    }

    pub fn is_trakt_configured(&self) -> bool {
        non_placeholder(&self.trakt.client_id).is_some()
    }

    /// Copy with secrets masked, for display.
    pub fn redacted(&self) -> Self {
        let mask = |value: &str| {
            if is_placeholder(value) {
                value.to_string()
            } else {
                REDACTED.to_string()
            }
        };
        let mut copy = self.clone();
        copy.trakt.client_secret = mask(&self.trakt.client_secret);
        copy.trakt.access_token = mask(&self.trakt.access_token);
        copy.tmdb.api_key = mask(&self.tmdb.api_key);
        copy.github.token = mask(&self.github.token);
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::NamedTempFile;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.trakt.client_id = "test_id".to_string();
        config.github.username = "octocat".to_string();
        config.server.port = 8080;

        let path = file.path().to_path_buf();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[letterboxd]\nrss_url = \"https://letterboxd.com/me/rss/\"\n").unwrap();

        let loaded = Config::load_from_file(&file.path().to_path_buf()).unwrap();
        assert_eq!(loaded.letterboxd.rss_url, "https://letterboxd.com/me/rss/");
        assert_eq!(loaded.trakt.base_url, "https://api.trakt.tv");
        assert_eq!(loaded.myanimelist.jikan_min_interval_secs, 4);
        assert_eq!(loaded.server.port, 5000);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let loaded = Config::load_or_default(&path).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_env_overlay() {
        let mut config = Config::default();
        config.github.username = "from-file".to_string();
        config.apply_env(env(&[
            ("GITHUB_USERNAME", "from-env"),
            ("TMDB_API_KEY", "abc"),
            ("MAL_MANGA_RSS_URL", "https://myanimelist.net/rss.php?type=rm&u=me"),
            ("PORT", "8081"),
        ]));

        assert_eq!(config.github.username, "from-env");
        assert_eq!(config.tmdb.api_key, "abc");
        assert_eq!(config.myanimelist.manga_rss_url, "https://myanimelist.net/rss.php?type=rm&u=me");
        assert_eq!(config.server.port, 8081);
    }

    #[test]
    fn test_env_placeholders_ignored() {
        let mut config = Config::default();
        config.trakt.client_id = "real_id".to_string();
        config.apply_env(env(&[("TRAKT_CLIENT_ID", "YOUR_CLIENT_ID"), ("PORT", "not-a-port")]));

        assert_eq!(config.trakt.client_id, "real_id");
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_bad_feed_url_still_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[github]\nusername = \"octocat\"\n\n[letterboxd]\nrss_url = \"letterboxd.com/someone/rss\"\n\n[myanimelist]\njikan_min_interval_secs = 600\n",
        )
        .unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.github.username, "octocat");
        assert_eq!(loaded.letterboxd.rss_url, "letterboxd.com/someone/rss");
        assert_eq!(loaded.myanimelist.jikan_min_interval_secs, MAX_JIKAN_INTERVAL_SECS);
        assert_eq!(
            loaded.problems(),
            vec!["letterboxd.rss_url must be an http(s) URL: letterboxd.com/someone/rss".to_string()]
        );
    }

    #[test]
    fn test_problems() {
        let mut config = Config::default();
        assert!(config.problems().is_empty());

        config.letterboxd.rss_url = "https://letterboxd.com/me/rss/".to_string();
        assert!(config.problems().is_empty());

        config.github.token = "ghp_x".to_string();
        assert_eq!(config.problems().len(), 1);
        config.github.username = "octocat".to_string();
        assert!(config.problems().is_empty());
    }

    #[test]
    fn test_trakt_placeholder_is_unconfigured() {
        let mut config = Config::default();
        assert!(!config.is_trakt_configured());

        config.trakt.client_id = "YOUR_CLIENT_ID".to_string();
        assert!(!config.is_trakt_configured());

        config.trakt.client_id = "real".to_string();
        assert!(config.is_trakt_configured());
    }

    #[test]
    fn test_redacted_masks_secrets_only() {
        let mut config = Config::default();
        config.tmdb.api_key = "secret".to_string();
        config.github.username = "octocat".to_string();

        let redacted = config.redacted();
        assert_eq!(redacted.tmdb.api_key, REDACTED);
        assert_eq!(redacted.github.username, "octocat");
        assert_eq!(redacted.github.token, "");
    }
}
