//! Tracing subscriber setup.
//!
//! Logs always go to stderr. Stdout is reserved for the startup banner so
//! process supervisors can rely on it being a single line.

use std::io::IsTerminal;

use tracing::Subscriber;
use tracing_subscriber::{fmt::MakeWriter, layer::SubscriberExt, EnvFilter};

use crate::config::{LogFormat, DEFAULT_LOG_FILTER};
use crate::error::AppError;

/// Resolve the log filter with priority: CLI > env > default.
pub fn resolve_filter(cli: Option<String>, env: Option<String>) -> String {
    cli.or(env)
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

/// Build a subscriber writing to `writer`. Color codes are only emitted in
/// text format and only when `ansi` is set.
pub fn build_subscriber<W>(
    filter: &str,
    format: LogFormat,
    writer: W,
    ansi: bool,
) -> Result<Box<dyn Subscriber + Send + Sync>, AppError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_new(filter).map_err(|e| AppError::Logging(e.to_string()))?;
    let registry = tracing_subscriber::registry().with(filter);

    let subscriber: Box<dyn Subscriber + Send + Sync> = match format {
        LogFormat::Text => Box::new(
            registry.with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(ansi)
                    .with_writer(writer),
            ),
        ),
        LogFormat::Json => Box::new(
            registry.with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(writer),
            ),
        ),
    };
    Ok(subscriber)
}

/// Install the global subscriber on stderr.
pub fn init(filter: &str, format: LogFormat) -> Result<(), AppError> {
    let ansi = std::io::stderr().is_terminal();
    let subscriber = build_subscriber(filter, format, std::io::stderr, ansi)?;
    tracing::subscriber::set_global_default(subscriber).map_err(|e| AppError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// In-memory writer shared between the subscriber and the test.
    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Capture {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Capture {
        type Writer = Capture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn emit_request_log() {
        let span = tracing::info_span!("request", request_id = "abc");
        let _guard = span.enter();
        tracing::info!(status = 200u16, "Request completed");
    }

    #[test]
    fn cli_filter_beats_env() {
        let filter = resolve_filter(Some("debug".into()), Some("warn".into()));
        assert_eq!(filter, "debug");
    }

    #[test]
    fn env_filter_used_without_cli() {
        assert_eq!(resolve_filter(None, Some("warn".into())), "warn");
    }

    #[test]
    fn falls_back_to_default() {
        assert_eq!(resolve_filter(None, None), DEFAULT_LOG_FILTER);
        assert_eq!(resolve_filter(None, Some("  ".into())), DEFAULT_LOG_FILTER);
    }

    #[test]
    fn invalid_filter_is_reported() {
        let result = build_subscriber("dashboard_backend=notalevel", LogFormat::Text, io::sink, false);
        assert!(matches!(result, Err(AppError::Logging(_))));
    }

    #[test]
    fn json_lines_carry_fields_and_span() {
        let capture = Capture::default();
        let subscriber = build_subscriber("info", LogFormat::Json, capture.clone(), false).unwrap();
        tracing::subscriber::with_default(subscriber, emit_request_log);

        let output = capture.contents();
        let line: serde_json::Value =
            serde_json::from_str(output.lines().next().expect("one log line")).unwrap();
        assert_eq!(line["level"], "INFO");
        assert_eq!(line["fields"]["message"], "Request completed");
        assert_eq!(line["fields"]["status"], 200);
        assert_eq!(line["span"]["request_id"], "abc");
    }

    #[test]
    fn text_without_ansi_has_no_escape_codes() {
        let capture = Capture::default();
        let subscriber = build_subscriber("info", LogFormat::Text, capture.clone(), false).unwrap();
        tracing::subscriber::with_default(subscriber, emit_request_log);

        let output = capture.contents();
        assert!(output.contains("Request completed"));
        assert!(output.contains("request{request_id="), "output: {output}");
        assert!(!output.contains('\u{1b}'), "output: {output:?}");
    }

    #[test]
    fn filter_drops_lower_levels() {
        let capture = Capture::default();
        let subscriber = build_subscriber("warn", LogFormat::Text, capture.clone(), false).unwrap();
        tracing::subscriber::with_default(subscriber, emit_request_log);

        assert!(capture.contents().is_empty());
    }
}
