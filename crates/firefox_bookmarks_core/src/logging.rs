use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILTER: &str = "firefox_bookmarks=info,firefox_bookmarks_core=info";

/// Install the global fmt subscriber on stderr; stdout is reserved for
/// encoded bookmarks. Silent mode installs nothing, so every event is dropped.
///
/// Returns `false` when logging stays disabled, either because of silent
/// mode or because a subscriber was already installed.
pub fn init_logging(silent: bool) -> bool {
    if silent {
        return false;
    }
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}
