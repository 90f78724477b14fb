use std::{
    fs::File,
    io::{self, IsTerminal},
    path::Path,
    sync::Mutex,
};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

use crate::config::LoggingSection;

const DEFAULT_FILTER: &str = "info,devis_form=debug";

/// `2025-03-10T14:02:11.123456+01:00  WARN state.rs:212 message key=value`
struct LocalFmt;

impl<S, N> FormatEvent<S, N> for LocalFmt
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let ansi = writer.has_ansi_escapes();

        let timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S%.6f%:z");
        let level = meta.level();
        if ansi {
            let color = match *level {
                Level::ERROR => "\x1b[1;31m",
                Level::WARN => "\x1b[1;33m",
                Level::INFO => "\x1b[1;32m",
                Level::DEBUG => "\x1b[1;34m",
                Level::TRACE => "\x1b[1;35m",
            };
            write!(writer, "\x1b[2m{timestamp}\x1b[0m {color}{level:>5}\x1b[0m ")?;
        } else {
            write!(writer, "{timestamp} {level:>5} ")?;
        }

        let file = meta
            .file()
            .map(|f| f.strip_prefix("src/").unwrap_or(f));
        if let (Some(file), Some(line)) = (file, meta.line()) {
            write!(writer, "{file}:{line} ")?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Filter for a run: `level_override`, then the configured level, then
/// `RUST_LOG`, then `info,devis_form=debug`.
pub fn build_filter(
    config: &LoggingSection,
    level_override: Option<&str>,
) -> Result<EnvFilter> {
    match level_override.or(config.level.as_deref()) {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log level '{directive}'")),
        None => Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
    }
}

fn open_log_file(path: &Path) -> Result<File> {
    File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file '{}'", path.display()))
}

/// Installs the global subscriber from the `[logging]` config section.
///
/// The console writes to stderr so the report on stdout stays clean, colored
/// when attached to a terminal. `file`, when set, is appended to without
/// colors. Call once at startup.
pub fn init_logging(
    config: &LoggingSection,
    level_override: Option<&str>,
) -> Result<()> {
    let filter = build_filter(config, level_override)?;

    let console_layer = config.console.then(|| {
        tracing_subscriber::fmt::layer()
            .event_format(LocalFmt)
            .with_ansi(io::stderr().is_terminal())
            .with_writer(io::stderr)
    });

    let file_layer = match &config.file {
        Some(path) => {
            let file = open_log_file(Path::new(path))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .event_format(LocalFmt)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("logging already initialized")
}
