//! Opt-in tracing setup for programs that draw figures with `gviz`.
//!
//! Library code only emits `tracing` events. Hosts with their own subscriber
//! can ignore this module.

/// Environment variable read before `RUST_LOG` when building the filter.
pub const LOG_ENV: &str = "GVIZ_LOG";

/// Installs a stderr subscriber that shows warnings (dropped gene rows,
/// malformed GTF lines) unless `GVIZ_LOG`/`RUST_LOG` say otherwise.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing("warn")
}

/// Installs a compact stderr subscriber filtered by `GVIZ_LOG`, then
/// `RUST_LOG`, then `fallback` (an `EnvFilter` directive such as
/// `"gviz=debug"`).
///
/// Returns `false` without the `telemetry` feature, for an unparsable
/// filter, or when a global subscriber is already installed.
#[must_use]
pub fn init_tracing(fallback: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = std::env::var(LOG_ENV)
            .ok()
            .and_then(|directives| EnvFilter::try_new(directives).ok())
            .or_else(|| EnvFilter::try_from_default_env().ok())
            .or_else(|| EnvFilter::try_new(fallback).ok());
        let Some(filter) = filter else {
            return false;
        };

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback;
        false
    }
}
