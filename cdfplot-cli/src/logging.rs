//! Logging initialisation for the cdfplot CLI.
//!
//! Installs a global `tracing` subscriber writing to stderr, human-readable or
//! JSON, and bridges the `log` facade. The configuration is resolved once from
//! the environment by [`LoggingConfig::from_env`] and handed to
//! [`init_logging`].

use std::{
    env,
    ffi::OsString,
    io::{self, IsTerminal},
    sync::OnceLock,
};

use thiserror::Error;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_log::LogTracer;
use tracing_subscriber::{EnvFilter, Layer, fmt::format::FmtSpan, layer::SubscriberExt};

const LOG_FORMAT_ENV: &str = "CDFPLOT_LOG_FORMAT";
const NO_COLOR_ENV: &str = "NO_COLOR";

static INITIALISED: OnceLock<()> = OnceLock::new();

/// Errors raised while initialising structured logging.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Environment variable contained invalid UTF-8 data.
    #[error("environment variable `{name}` contained invalid UTF-8: {source}")]
    InvalidUnicode {
        /// Name of the offending environment variable.
        name: &'static str,
        /// Underlying parse failure.
        #[source]
        source: env::VarError,
    },
    /// Unsupported log format requested via `CDFPLOT_LOG_FORMAT`.
    #[error("unsupported log format `{provided}`; expected `human` or `json`")]
    UnsupportedFormat {
        /// Raw value supplied by the user.
        provided: String,
    },
    /// Failed to install the global tracing subscriber.
    #[error("failed to install tracing subscriber: {source}")]
    InstallFailed {
        /// Error raised by `tracing`.
        #[source]
        source: SetGlobalDefaultError,
    },
}

/// Output format of the log stream.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LogFormat {
    /// Plain text lines.
    #[default]
    Human,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses `human` or `json`, ignoring case and surrounding whitespace.
    ///
    /// # Errors
    /// Returns [`LoggingError::UnsupportedFormat`] for anything else.
    pub fn parse(raw: &str) -> Result<Self, LoggingError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(LoggingError::UnsupportedFormat {
                provided: other.to_owned(),
            }),
        }
    }
}

/// Everything [`init_logging`] needs to know.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LoggingConfig {
    /// Log line format.
    pub format: LogFormat,
    /// Whether ANSI colour codes are emitted.
    pub ansi: bool,
}

impl LoggingConfig {
    /// Reads `CDFPLOT_LOG_FORMAT` and `NO_COLOR` and checks whether stderr is
    /// a terminal.
    ///
    /// # Errors
    /// Returns [`LoggingError`] when the format variable is not valid Unicode
    /// or names an unsupported format.
    pub fn from_env() -> Result<Self, LoggingError> {
        let format = match env::var(LOG_FORMAT_ENV) {
            Ok(raw) => LogFormat::parse(&raw)?,
            Err(env::VarError::NotPresent) => LogFormat::Human,
            Err(err @ env::VarError::NotUnicode(_)) => {
                return Err(LoggingError::InvalidUnicode {
                    name: LOG_FORMAT_ENV,
                    source: err,
                });
            }
        };
        Ok(Self {
            format,
            ansi: colour_enabled(env::var_os(NO_COLOR_ENV), io::stderr().is_terminal()),
        })
    }
}

/// Colour is used on a terminal unless `NO_COLOR` is set to a non-empty value.
fn colour_enabled(no_color: Option<OsString>, is_terminal: bool) -> bool {
    let suppressed = no_color.is_some_and(|value| !value.is_empty());
    is_terminal && !suppressed
}

/// Install global structured logging if it has not already been configured.
///
/// Diagnostics go to stderr so the summary on stdout stays parseable. The
/// level is controlled by `RUST_LOG` and defaults to `info`.
///
/// # Errors
/// Returns [`LoggingError`] if the subscriber cannot be installed for a reason
/// other than another subscriber already being present.
pub fn init_logging(config: LoggingConfig) -> Result<(), LoggingError> {
    if INITIALISED.get().is_some() {
        return Ok(());
    }

    match install_subscriber(config) {
        Ok(()) => {}
        Err(LoggingError::InstallFailed { source }) => {
            eprintln!("structured logging already configured elsewhere: {source}");
        }
        Err(err) => return Err(err),
    }
    let _ = INITIALISED.set(());
    Ok(())
}

fn install_subscriber(config: LoggingConfig) -> Result<(), LoggingError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(config.ansi)
        .with_writer(io::stderr);

    let fmt_layer = match config.format {
        LogFormat::Json => fmt_layer
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
        LogFormat::Human => fmt_layer.boxed(),
    };

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|source| LoggingError::InstallFailed { source })?;

    // Best-effort: another logger may already own the `log` slot.
    let _ = LogTracer::init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case("human", LogFormat::Human)]
    #[case("HUMAN", LogFormat::Human)]
    #[case(" json ", LogFormat::Json)]
    fn parse_accepts_supported_values(#[case] raw: &str, #[case] expected: LogFormat) {
        let format = LogFormat::parse(raw).expect("format must parse");
        assert_eq!(format, expected);
    }

    #[test]
    fn parse_rejects_unknown_values() {
        let err = LogFormat::parse("xml").expect_err("xml is not supported");
        match err {
            LoggingError::UnsupportedFormat { provided } => assert_eq!(provided, "xml"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[rstest]
    #[case(None, true, true)]
    #[case(None, false, false)]
    #[case(Some("1"), true, false)]
    #[case(Some(""), true, true)]
    fn colour_follows_terminal_and_no_color(
        #[case] no_color: Option<&str>,
        #[case] is_terminal: bool,
        #[case] expected: bool,
    ) {
        assert_eq!(colour_enabled(no_color.map(OsString::from), is_terminal), expected);
    }

    #[test]
    fn init_logging_is_idempotent() {
        let config = LoggingConfig::default();
        init_logging(config).expect("logging must initialise");
        init_logging(config).expect("subsequent calls must be no-ops");
    }
}
