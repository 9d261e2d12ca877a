use crate::output::Output;
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use mediadash_config::{non_placeholder, Config};
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::PathBuf;

pub fn run_config(cmd: ConfigCommands, config_path: Option<PathBuf>, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show_config(config_path, output),
        ConfigCommands::Path => show_paths(config_path, output),
    }
}

fn show_paths(config_path: Option<PathBuf>, output: &Output) -> Result<()> {
    let paths = super::path_manager()?;
    let config_file = config_path.unwrap_or_else(|| paths.config_file());
    let credentials_file = paths.credentials_file();

    if output.is_human() {
        output.println(format!("Config file:      {}", config_file.display()));
        output.println(format!("Credentials file: {}", credentials_file.display()));
        output.println(format!("Server log file:  {}", paths.server_log_file().display()));
    } else {
        output.data(&json!({
            "config_file": config_file,
            "credentials_file": credentials_file,
            "server_log_file": paths.server_log_file(),
        }));
    }
    Ok(())
}

fn show_config(config_path: Option<PathBuf>, output: &Output) -> Result<()> {
    let loaded = super::load(config_path)?;
    let config = loaded.config.redacted();
    let sources = loaded.registry()?.configured_sources();
    let problems = loaded.config.problems();

    if !output.is_human() {
        let value = serde_json::to_value(&config).map_err(|e| eyre!("Failed to serialize config: {}", e))?;
        output.data(&json!({
            "config_file": loaded.config_file,
            "configured_sources": sources,
            "problems": problems,
            "config": value,
        }));
        return Ok(());
    }

    let exists = loaded.config_file.exists();
    output.println(format!("{}", "Configuration".bright_cyan().bold()));
    output.println(format!(
        "{} {}",
        loaded.config_file.display(),
        if exists { "".to_string() } else { "(not found, using defaults)".bright_black().to_string() }
    ));
    output.println("");

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec![
        Cell::new("Setting").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);
    for (section, key, value) in settings(&config) {
        table.add_row(vec![
            Cell::new(format!("{}.{}", section, key)).fg(Color::Cyan),
            value_cell(&value),
        ]);
    }
    output.println(table.to_string());
    output.println("");

    for problem in &problems {
        output.warn(problem);
    }
    if sources.is_empty() {
        output.warn("No sources configured");
    } else {
        output.success(format!("Configured sources: {}", sources.join(", ")));
    }
    Ok(())
}

fn value_cell(value: &str) -> Cell {
    match non_placeholder(value) {
        Some(value) => Cell::new(value),
        None => Cell::new("<not set>").fg(Color::DarkGrey),
    }
}

fn settings(config: &Config) -> Vec<(&'static str, &'static str, String)> {
    vec![
        ("trakt", "client_id", config.trakt.client_id.clone()),
        ("trakt", "client_secret", config.trakt.client_secret.clone()),
        ("trakt", "access_token", config.trakt.access_token.clone()),
        ("tmdb", "api_key", config.tmdb.api_key.clone()),
        ("github", "username", config.github.username.clone()),
        ("github", "token", config.github.token.clone()),
        ("goodreads", "rss_url", config.goodreads.rss_url.clone()),
        ("letterboxd", "rss_url", config.letterboxd.rss_url.clone()),
        ("myanimelist", "anime_rss_url", config.myanimelist.anime_rss_url.clone()),
        ("myanimelist", "manga_rss_url", config.myanimelist.manga_rss_url.clone()),
        (
            "myanimelist",
            "jikan_min_interval_secs",
            config.myanimelist.jikan_min_interval_secs.to_string(),
        ),
        ("trueachievements", "username", config.trueachievements.username.clone()),
        ("server", "bind_address", config.server.bind_address.clone()),
        ("server", "port", config.server.port.to_string()),
    ]
}
