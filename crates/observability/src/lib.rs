//! Tracing/logging setup shared by the binaries.

/// Tracing configuration (filters, formats).
pub mod tracing;

pub use self::tracing::{LogFormat, UnknownLogFormat};

/// Initialize process-wide tracing with the given output format.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init(format: LogFormat) {
    self::tracing::init(format);
}
