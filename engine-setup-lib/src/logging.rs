use crate::error::SetupError;
use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::{Event, Level, Subscriber};
use tracing_indicatif::IndicatifLayer;
use tracing_indicatif::style::ProgressStyle;
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

/// Download bar used when the server announces a content length:
/// percentage plus a rolling throughput estimate.
pub fn download_bar_style() -> Result<ProgressStyle, SetupError> {
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] {msg} [{wide_bar:.cyan/blue}] {percent}% {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
    )
    .map_err(|e| SetupError::ProgressTemplate(e.to_string()))?;
    Ok(style.progress_chars("#>-").tick_strings(TICKS))
}

/// Download spinner for bodies of unknown length. Only bytes written so far.
pub fn download_spinner_style() -> Result<ProgressStyle, SetupError> {
    spinner_style("{msg} {bytes} ({bytes_per_sec})")
}

pub fn spinner_style(template: &str) -> Result<ProgressStyle, SetupError> {
    let style = ProgressStyle::with_template(&format!(
        "{{spinner:.green}} [{{elapsed_precise}}] {}",
        template
    ))
    .map_err(|e| SetupError::ProgressTemplate(e.to_string()))?;
    Ok(style.tick_strings(TICKS))
}

/// Installs the global subscriber: console lines plus indicatif bars for
/// spans that configure one. `verbose` lets `debug!` events through.
pub fn initialize_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::registry()
        .with(level)
        .with(fmt::layer().event_format(ConsoleFormat))
        .with(IndicatifLayer::new())
        .init();
}

/// Prints status events as their bare message. Diagnostic events below
/// `INFO` are tagged with level and target, and keep their structured fields.
#[derive(Clone, Debug, Default)]
pub struct ConsoleFormat;

#[derive(Default)]
struct ConsoleVisitor {
    message: String,
    fields: Vec<String>,
}

impl Visit for ConsoleVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.fields.push(format!("{}={value}", field.name()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message.push_str(&format!("{value:?}"));
        } else {
            self.fields.push(format!("{}={value:?}", field.name()));
        }
    }
}

impl<S, N> FormatEvent<S, N> for ConsoleFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let mut visitor = ConsoleVisitor::default();
        event.record(&mut visitor);

        let metadata = event.metadata();
        if *metadata.level() <= Level::INFO {
            return writeln!(writer, "{}", visitor.message);
        }

        write!(
            writer,
            "{}({}): {}",
            metadata.level().as_str().to_lowercase(),
            metadata.target(),
            visitor.message
        )?;
        for field in &visitor.fields {
            write!(writer, " {field}")?;
        }
        writeln!(writer)
    }
}
