use crate::output::Output;
use crate::AuthCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use dialoguer::Confirm;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use tracing::info;

pub async fn run_auth(cmd: AuthCommands, config_path: Option<PathBuf>, output: &Output) -> Result<()> {
    match cmd {
        AuthCommands::Trakt => auth_trakt(config_path, output).await,
    }
}

/// Single-shot device-code flow: one code request, one exchange once the
/// user confirms approval.
async fn auth_trakt(config_path: Option<PathBuf>, output: &Output) -> Result<()> {
    let mut loaded = super::load(config_path)?;
    if !loaded.config.is_trakt_configured() {
        return Err(eyre!(
            "Trakt client id is not set. Add it to [trakt] in {} or export TRAKT_CLIENT_ID",
            loaded.config_file.display()
        ));
    }

    let registry = loaded.registry()?;
    let trakt = registry.trakt().map_err(|e| eyre!("{}", e))?;
    if trakt.is_authenticated() {
        output.info("A Trakt token is already configured; it will be replaced.");
    }

    let code = trakt
        .request_device_code()
        .await
        .map_err(|e| eyre!("{}", e))?;

    output.println("");
    output.println(format!("{}", "Trakt device authorization".bold().bright_cyan()));
    output.println(format!("  1. Open {}", code.verification_url.bright_white()));
    output.println(format!("  2. Enter the code {}", code.user_code.bright_green().bold()));
    if code.expires_in > 0 {
        output.println(format!("  The code expires in {} minutes.", code.expires_in / 60));
    }
    output.println("");

    let approved = Confirm::new()
        .with_prompt("Have you approved the device?")
        .default(true)
        .interact()
        .map_err(|e| eyre!("Failed to read confirmation: {}", e))?;
    if !approved {
        output.warn("Authorization cancelled");
        return Ok(());
    }

    let token = trakt
        .exchange_device_code(&code.device_code)
        .await
        .map_err(|e| eyre!("{}", e))?;

    loaded.credentials.set_trakt_access_token(token.access_token);
    loaded.credentials.set_trakt_refresh_token(token.refresh_token);
    loaded.credentials.set_trakt_token_expires(token.expires_at);
    loaded.credentials.save().map_err(|e| {
        eyre!("Failed to save credentials to {}: {}", loaded.credentials_file.display(), e)
    })?;

    info!(expires_at = %token.expires_at, "Stored Trakt access token");
    output.success("Trakt authentication successful!");
    output.println(format!("  Access token expires at: {}", token.expires_at.bright_green()));
    Ok(())
}
