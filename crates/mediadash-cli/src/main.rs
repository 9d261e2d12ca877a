use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::eyre;
use commands::{auth, config, fetch, serve};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;
mod server;

#[derive(Parser)]
#[command(name = "mediadash")]
#[command(about = "mediadash - personal media dashboard backend")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write logs to a daily-rotated file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard JSON API
    #[command(long_about = "Start the HTTP server. Every dashboard view is exposed under /api and fetched live from its source on each request.")]
    Serve {
        /// Address to bind, e.g. 127.0.0.1:8080 (defaults to the [server] config)
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },
    /// Fetch a single view and print it
    #[command(long_about = "Fetch one dashboard view, e.g. 'stats', 'goodreads/books' or 'github/chart', and print it as JSON.")]
    Fetch {
        /// View name or API path
        view: String,
    },
    /// Authenticate with a source
    Auth {
        #[command(subcommand)]
        cmd: AuthCommands,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub(crate) enum AuthCommands {
    /// Link a Trakt account with the device-code flow
    #[command(long_about = "Request a Trakt device code, wait for you to approve it at the verification URL, then exchange it once for an access token and store it in the credentials file.")]
    Trakt,
}

#[derive(Subcommand)]
pub(crate) enum ConfigCommands {
    /// Show the effective configuration with secrets masked
    Show,
    /// Print the config and credentials file locations
    Path,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet, cli.log_file.clone())
        .map_err(|e| eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);
    let config_path = cli.config;

    match cli.command {
        Commands::Serve { bind } => serve::run_serve(config_path, bind, &output).await,
        Commands::Fetch { view } => fetch::run_fetch(config_path, &view, &output).await,
        Commands::Auth { cmd } => auth::run_auth(cmd, config_path, &output).await,
        Commands::Config { cmd } => config::run_config(cmd, config_path, &output),
    }
}
