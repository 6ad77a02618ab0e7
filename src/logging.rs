use anyhow::Context;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives
const FILTER_VAR: &str = "DOTYEAR_LOG";

const DEFAULT_FILTER: &str = "info";

/// Send diagnostics to the file at `path`, appending to it if it exists.
///
/// The terminal belongs to the calendar while it's running, so there is no
/// logging to stderr; without a log file, events are discarded.
pub(crate) fn init(path: &Path) -> anyhow::Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_env(FILTER_VAR)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to install logger")?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "dotyear starting");
    Ok(())
}
