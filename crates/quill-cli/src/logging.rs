use colored::Colorize;
use std::fmt;
use tracing::{Event, Subscriber};
use tracing_subscriber::{
    fmt::{FmtContext, FormatEvent, FormatFields, format},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

pub struct EventLoggerFormatter;

/// Label printed after the timestamp. Events without an explicit `name:` get a generated one, which is not worth printing.
fn event_label(name: &str) -> Option<String> {
    if name.is_empty() || name.starts_with("event ") || name == "log event" {
        return None;
    }

    Some(name.to_ascii_lowercase())
}

impl<S, N> FormatEvent<S, N> for EventLoggerFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        if std::env::args().any(|arg| arg == "--quiet") {
            return Ok(());
        }

        if event.metadata().name() == "SKIP_FORMAT" {
            ctx.field_format().format_fields(writer.by_ref(), event)?;
            return writeln!(writer);
        }

        let timestamp = chrono::Local::now().format("%H:%M:%S").to_string().dimmed();
        let label = match (event_label(event.metadata().name()), *event.metadata().level()) {
            (Some(label), tracing::Level::ERROR) => format!(" {}", label.bold().red()),
            (Some(label), tracing::Level::WARN) => format!(" {}", label.bold().yellow()),
            (Some(label), _) => format!(" {}", label.bold().bright_yellow()),
            (None, tracing::Level::ERROR) => format!(" {}", "error".bold().red()),
            (None, tracing::Level::WARN) => format!(" {}", "warn".bold().yellow()),
            (None, _) => String::new(),
        };

        write!(writer, "{}{} ", timestamp, label)?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

pub fn init_logging() {
    let tracing_formatter = tracing_subscriber::fmt::layer().event_format(EventLoggerFormatter);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "warn,content=info,{}=info,tower_http=info",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_formatter)
        .init();
}
