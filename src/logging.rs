//! Structured logging through `tracing`.
//!
//! `RUST_LOG` wins when set; otherwise the `-v` count picks the level for
//! this crate and everything else stays at `warn`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Crate-level directive for a given `-v` count.
pub fn default_directive(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("warn,{}={level}", env!("CARGO_CRATE_NAME"))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
    if installed.is_ok() {
        tracing::debug!(verbosity, "logging initialised");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(default_directive(0), "warn,imgtweak=warn");
        assert_eq!(default_directive(1), "warn,imgtweak=info");
        assert_eq!(default_directive(2), "warn,imgtweak=debug");
        assert_eq!(default_directive(7), "warn,imgtweak=trace");
    }

    #[test]
    fn directives_parse() {
        for v in 0..4 {
            assert!(EnvFilter::try_new(default_directive(v)).is_ok());
        }
    }

    #[test]
    fn init_twice_is_harmless() {
        init(0);
        init(2);
    }
}
