use std::{
    fs::OpenOptions,
    path::Path,
    sync::Mutex,
};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Send log events to `path`, filtered by `RUST_LOG`.
///
/// Nothing is ever logged to the terminal since it's busy showing the animation.
pub(crate) fn init_file_logging(path: &Path) -> anyhow::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;
    Ok(())
}
