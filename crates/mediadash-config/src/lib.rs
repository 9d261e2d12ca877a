pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{
    is_placeholder, non_placeholder, Config, GitHubConfig, GoodreadsConfig, LetterboxdConfig,
    MyAnimeListConfig, ServerConfig, TmdbConfig, TraktConfig, TrueAchievementsConfig,
};
pub use credentials::CredentialStore;
pub use paths::{container_base_path, PathManager};
