//! Log setup for the quiz binary.
//!
//! The filter is read from `LOG_LEVEL` using `EnvFilter` syntax, for example
//! `debug` or `warn,timed_quiz::session=debug`. Without it only warnings
//! and errors are printed. Setting `LOG_FORMAT=json` switches to one JSON
//! object per line. Logs always go to stderr, because stdout carries the
//! quiz itself and the optional JSON report.

use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("warn"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().init(),
        _ => builder.init(),
    }
}
