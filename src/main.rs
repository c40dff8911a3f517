//! Flowscope - Terminal UI for network flow forensics
//!
//! This is the binary entry point. All logic lives in the workspace crates.

use std::path::PathBuf;

use clap::Parser;

use flowscope_app::{NavParams, Settings};

/// Flowscope - browse and inspect captured network flows
#[derive(Parser, Debug)]
#[command(name = "flowscope")]
#[command(about = "Browse and inspect captured network flows", long_about = None)]
struct Args {
    /// Backend base URL (overrides the settings file)
    #[arg(long, value_name = "URL")]
    server: Option<String>,

    /// Path to a flowscope.toml settings file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Initial navigation query string, as shown in the status bar
    /// (e.g. "flow=42&app_proto=http&tag_require=flag-out")
    #[arg(long, value_name = "QUERY")]
    query: Option<String>,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    flowscope_core::logging::init()?;

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(server) = args.server {
        settings.server.base_url = server;
    }

    // A shared query string restores the exact view it was captured from;
    // anything malformed simply means no filter.
    let initial = args
        .query
        .as_deref()
        .map(NavParams::decode)
        .unwrap_or_default();

    tracing::info!("connecting to {}", settings.server.base_url);
    flowscope_tui::run(settings, initial).await?;
    Ok(())
}
