//! Tracing/logging initialization.
//!
//! JSON lines with timestamps on stdout, filtered by `RUST_LOG` (falling back
//! to [`DEFAULT_FILTER`]).

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

pub const DEFAULT_FILTER: &str = "info";

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    install(filter);
}

/// Like [`init`], with an explicit directive such as
/// `"warehouse_infra=debug,info"` instead of `RUST_LOG`.
pub fn init_with_filter(directive: &str) -> Result<(), ParseError> {
    let filter = EnvFilter::try_new(directive)?;
    install(filter);
    Ok(())
}

fn install(filter: EnvFilter) {
    // A subscriber installed earlier wins; ours is then dropped.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_initialization_is_harmless() {
        init();
        init();
        init_with_filter("warehouse_infra=debug,info").unwrap();
        ::tracing::info!(product = "widget", quantity = 3, "logged after init");
    }

    #[test]
    fn bad_directive_is_rejected() {
        assert!(init_with_filter("warehouse_infra=notalevel").is_err());
    }
}
