use std::env;
use std::io;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_ENV: &str = "AI_TEAMMATE_LOG";

/// Installs the stderr subscriber. Stdout is reserved for workflow
/// commands and dry-run output.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(default_level(env::var("RUNNER_DEBUG").ok().as_deref()))
    });

    // A second install (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .try_init();
}

fn default_level(runner_debug: Option<&str>) -> &'static str {
    match runner_debug.map(str::trim) {
        Some("1") | Some("true") => "debug",
        _ => "info",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runner_debug_enables_debug_level() {
        assert_eq!(default_level(Some("1")), "debug");
        assert_eq!(default_level(Some("0")), "info");
        assert_eq!(default_level(None), "info");
    }
}
