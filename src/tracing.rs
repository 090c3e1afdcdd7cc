//! Tracing initialization.
//!
//! Events always go to stderr: stdout carries the MCP protocol. Set
//! `LOADOUT_SEARCH_LOG_FORMAT=json` to get one JSON object per event.

use std::sync::Once;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::{TestWriter, writer::BoxMakeWriter};

/// Environment variable selecting the log output format.
pub const LOG_FORMAT_ENV: &str = "LOADOUT_SEARCH_LOG_FORMAT";

static INIT: Once = Once::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    pub fn from_env() -> Self {
        Self::parse(std::env::var(LOG_FORMAT_ENV).ok().as_deref())
    }

    /// Unknown values fall back to compact output.
    fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Compact,
        }
    }
}

/// Initialize tracing. Safe to call multiple times.
///
/// Under tests events go through the test writer at DEBUG; otherwise to stderr
/// at INFO. `RUST_LOG` directives apply on top.
pub fn init() {
    INIT.call_once(|| {
        let is_test =
            std::env::var("NEXTEST").is_ok() || std::env::var("CARGO_TARGET_TMPDIR").is_ok();
        let level = if is_test {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        };
        let filter = EnvFilter::from_default_env().add_directive(level.into());
        let writer = if is_test {
            BoxMakeWriter::new(TestWriter::new())
        } else {
            BoxMakeWriter::new(std::io::stderr)
        };

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_target(true)
            .with_writer(writer);
        let installed = match LogFormat::from_env() {
            LogFormat::Json => builder.json().try_init(),
            LogFormat::Compact => builder.compact().try_init(),
        };

        if let Err(e) = installed
            && !is_test
        {
            eprintln!("Failed to initialize tracing: {}", e);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case(None, LogFormat::Compact)]
    #[case(Some("json"), LogFormat::Json)]
    #[case(Some(" JSON "), LogFormat::Json)]
    #[case(Some("pretty"), LogFormat::Compact)]
    #[case(Some(""), LogFormat::Compact)]
    fn parses_log_format(#[case] value: Option<&str>, #[case] expected: LogFormat) {
        check!(LogFormat::parse(value) == expected);
    }

    #[test]
    fn init_is_idempotent() {
        init();
        init();
        tracing::debug!("tracing initialized twice");
        check!(INIT.is_completed());
    }
}
