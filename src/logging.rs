use anyhow::Result;
use tracing::Level;
use tracing_subscriber::fmt;

/// Warnings (untranslated placeholders, dropped selectors) always reach
/// stderr; `--verbose` adds the per-document debug lines.
pub fn init(verbose: bool) -> Result<()> {
    let _ = fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level_for(verbose))
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .try_init();
    Ok(())
}

fn level_for(verbose: bool) -> Level {
    if verbose { Level::DEBUG } else { Level::WARN }
}
