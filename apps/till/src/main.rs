//! # Tableside Till Entry Point
//!
//! Runs the till as a child process of the UI shell: requests arrive as
//! JSON lines on stdin, responses leave as JSON lines on stdout, logs go to
//! stderr.
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load till.toml + TABLESIDE_* overrides
//! 3. Load the menu catalog
//! 4. Create state (session, edit)
//! 5. Serve requests until stdin closes
//!
//! ## Usage
//! ```text
//! tableside-till [path/to/till.toml]
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use tableside_till::catalog::MenuCatalog;
use tableside_till::ipc::Till;
use tableside_till::state::TillConfig;
use tableside_till::submit::RecordingSubmitter;
use tableside_till::{init_tracing, TillResult};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Till stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> TillResult<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = TillConfig::load(config_path)?;
    info!(store = %config.store_name(), tax_bps = config.tax.rate_bps, "Starting Tableside till");

    let catalog = match &config.catalog.path {
        Some(path) => MenuCatalog::load(path)?,
        None => {
            warn!("No catalog path configured, starting with an empty menu");
            MenuCatalog::default()
        }
    };

    let till = Till::new(catalog, config, RecordingSubmitter::new());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = till.handle_line(&line).await;
        stdout.write_all(response.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    info!("stdin closed, shutting down");
    Ok(())
}
