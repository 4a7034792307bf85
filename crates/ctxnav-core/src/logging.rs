#![forbid(unsafe_code)]

//! Structured logging setup.
//!
//! Every crate in the workspace logs through `tracing` with dotted targets:
//!
//! | Target | Emitted by |
//! |--------|------------|
//! | `ctxnav.context` | hook registration, registry assembly |
//! | `ctxnav.stack` | push/pop and focus transfer |
//! | `ctxnav.staging` | staging refresh routing |
//!
//! Libraries never install a subscriber themselves. Binaries and test
//! harnesses call [`install_subscriber`] (feature `subscriber`) once at
//! startup; the filter is read from `CTXNAV_LOG` using `EnvFilter` syntax and
//! defaults to `warn`.

/// Environment variable holding the log filter directive.
pub const LOG_ENV_VAR: &str = "CTXNAV_LOG";

/// Default filter when `CTXNAV_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "warn";

/// Output format for [`install_subscriber`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

/// Install a global `tracing` subscriber writing to stderr.
///
/// Fails if a global subscriber is already installed.
#[cfg(feature = "subscriber")]
pub fn install_subscriber(
    format: LogFormat,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    match format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
}
