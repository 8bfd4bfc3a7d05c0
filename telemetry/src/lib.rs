pub mod events;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

/// Builds the filter used by [`init_tracing`].
///
/// `RUST_LOG` wins when set; otherwise everything at `default_level` and above
/// is kept.
pub fn level_filter(default_level: LevelFilter) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy()
}

/// Installs a console subscriber that logs events and closed spans.
///
/// Returns `false` when a global subscriber was already installed, which is
/// the normal case in test binaries that call this more than once.
pub fn init_tracing(default_level: LevelFilter) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(level_filter(default_level))
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_tracing_is_idempotent() {
        let _ = init_tracing(LevelFilter::DEBUG);
        assert!(!init_tracing(LevelFilter::DEBUG));
    }
}
