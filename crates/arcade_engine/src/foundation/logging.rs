//! Logging utilities and structured logging support

/// Initialize the logging system with a fallback filter
///
/// `RUST_LOG` still wins when it is set; `level` is only the default.
/// Calling this more than once is harmless.
pub fn init_with_level(level: &str) {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}
