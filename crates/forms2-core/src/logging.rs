//! Logging integration for the forms2-rs crates.
//!
//! Provides a helper for configuring [`tracing`]-based logging. Library
//! code emits events through `tracing`; binaries and test harnesses call
//! [`setup_logging`] once at startup.

/// Sets up the global tracing subscriber.
///
/// The `log_level` string is an `EnvFilter` directive (e.g. "debug", "info",
/// `"forms2_access=debug"`). With `debug` set a pretty, human-readable
/// format is used; otherwise a structured JSON format.
///
/// Installing a second subscriber is a no-op, so tests may call this freely.
pub fn setup_logging(log_level: &str, debug: bool) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}
