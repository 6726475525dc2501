//! Diagnostic logging setup shared by the binaries.
//!
//! Progress and results go to stdout with `println!`; this subscriber only
//! carries diagnostics and writes them to stderr so the two never mix.

use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. Level comes from `RUST_LOG`, default `warn`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
