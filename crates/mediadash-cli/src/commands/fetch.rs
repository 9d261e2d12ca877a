use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use mediadash_core::View;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

pub async fn run_fetch(config_path: Option<PathBuf>, view_name: &str, output: &Output) -> Result<()> {
    let view: View = view_name.parse().map_err(|e| {
        let names: Vec<&str> = View::ALL.iter().map(|v| v.name()).collect();
        eyre!("{}. Available views: {}", e, names.join(", "))
    })?;

    let loaded = super::load(config_path)?;
    let dashboard = loaded.dashboard()?;

    let spinner = if output.is_human() && std::io::stderr().is_terminal() {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.blue} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(format!("Fetching {}...", view));
        spinner.enable_steady_tick(Duration::from_millis(100));
        Some(spinner)
    } else {
        None
    };

    let result = dashboard.render(view).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    match result {
        Ok(value) => {
            output.data(&value);
            Ok(())
        }
        Err(e) => {
            output.error(format!("{}: {}", view, e));
            Err(eyre!("Failed to fetch {}", view))
        }
    }
}
