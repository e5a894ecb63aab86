//! Setup shared by the CLI binaries

use anyhow::{Context, Result};
use sha_rainbow::CancellationToken;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

/// Install the log subscriber; `RUST_LOG` overrides the `info` default
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Size the global rayon pool
pub fn init_thread_pool(threads: Option<usize>) -> Result<()> {
    if let Some(threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure the thread pool")?;
    }
    Ok(())
}

/// Return a token raised by Ctrl+C
pub fn cancel_on_ctrlc() -> Result<CancellationToken> {
    let token = CancellationToken::new();
    let handler_token = token.clone();
    ctrlc::set_handler(move || handler_token.cancel())
        .context("failed to install the Ctrl+C handler")?;
    Ok(token)
}

/// Print a `\r`-refreshed progress line
pub fn print_progress(label: &str, current: usize, total: usize) {
    let progress = if total > 0 {
        (current as f64 / total as f64) * 100.0
    } else {
        100.0
    };
    print!(
        "\r[{}] Progress: {:.2}% ({}/{})",
        label, progress, current, total
    );
    let _ = io::stdout().flush();
}
