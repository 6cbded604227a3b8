use colored::*;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::FormatEvent;
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::registry::LookupSpan;

/// Event format for probe diagnostics: a fixed `sweepr` prefix, a
/// five-column level word, and the emitting module, so per-host noise from
/// a wide sweep stays scannable on stderr.
pub struct SweeprFormatter;

fn level_label(level: &Level) -> ColoredString {
    match *level {
        Level::ERROR => "error".red().bold(),
        Level::WARN => " warn".yellow().bold(),
        Level::INFO => " info".green(),
        Level::DEBUG => "debug".cyan(),
        Level::TRACE => "trace".dimmed(),
    }
}

impl<S, N> FormatEvent<S, N> for SweeprFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        write!(
            writer,
            "{} {} {} ",
            "sweepr".bright_black(),
            level_label(meta.level()),
            format!("{}:", meta.target()).dimmed(),
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Diagnostics go to stderr so the report layout on stdout stays
/// byte-stable when piped. `RUST_LOG` overrides the default level.
pub fn init(quiet: bool) {
    let default_directive = if quiet { "error" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .event_format(SweeprFormatter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_labels_align_to_five_columns() {
        colored::control::set_override(false);

        let labels: Vec<String> = [
            Level::ERROR,
            Level::WARN,
            Level::INFO,
            Level::DEBUG,
            Level::TRACE,
        ]
        .iter()
        .map(|l| level_label(l).to_string())
        .collect();

        assert_eq!(labels, ["error", " warn", " info", "debug", "trace"]);
        assert!(labels.iter().all(|l| l.len() == 5));
    }
}
