//! Tracing and logging setup shared by processes that embed the engine.

/// Initialize process-wide structured logging.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

pub use self::tracing::{DEFAULT_FILTER, init_with_filter};

/// Tracing configuration (filters, layers).
pub mod tracing;
