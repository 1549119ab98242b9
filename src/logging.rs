use crate::utils::{truncate_str, wrap_lines};
use crate::{PreviewError, PreviewResult};
use std::error::Error as _;
use std::path::PathBuf;
use tracing::{debug, error, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt as subscriber_fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};
use unicode_width::UnicodeWidthStr;

const LABEL_WIDTH: usize = 12;
const MAX_VALUE_LINES: usize = 4;

#[derive(Debug)]
pub struct LogConfig {
    pub log_dir: PathBuf,
    pub log_level: String,
    pub console_output: bool,
    pub file_output: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".into(),
            log_level: "info".into(),
            console_output: true,
            file_output: false,
        }
    }
}

/// Draws `rows` as a labelled box `width` columns wide. Long values wrap
/// onto continuation lines, blank ones show as `-`.
fn boxed(rows: &[(&str, &str)], width: usize) -> String {
    let inner = width.saturating_sub(4).max(LABEL_WIDTH + 8);
    let value_width = inner - LABEL_WIDTH;
    let rule = "─".repeat(inner + 2);

    let mut out = format!("┌{rule}┐\n");
    for (label, value) in rows {
        let mut lines = wrap_lines(value, value_width, MAX_VALUE_LINES);
        if lines.is_empty() {
            lines.push("-".to_string());
        }
        for (i, line) in lines.iter().enumerate() {
            let label = if i == 0 { *label } else { "" };
            let pad = value_width.saturating_sub(line.width());
            out.push_str(&format!(
                "│ {label:<LABEL_WIDTH$}{line}{} │\n",
                " ".repeat(pad)
            ));
        }
    }
    out.push_str(&format!("└{rule}┘"));
    out
}

/// Logs a boxed summary of the card shown for `requested_url`.
pub fn log_preview_card(preview: &PreviewResult, requested_url: &str) {
    let card = boxed(
        &[
            ("Requested", requested_url),
            ("Title", &preview.title),
            ("Description", &preview.description),
            ("Image", &truncate_str(&preview.image, 60)),
            ("Url", &preview.url),
            ("Publisher", &preview.publisher),
        ],
        80,
    );
    info!("\n{card}");
}

pub fn log_error_card(url: &str, error: &PreviewError) {
    let cause = error.source().map(|s| s.to_string()).unwrap_or_default();
    let card = boxed(
        &[
            ("Url", url),
            ("Error", &error.to_string()),
            ("Caused by", &cause),
        ],
        72,
    );
    error!("\n{card}");
}

pub fn setup_logging(config: LogConfig) -> Result<(), PreviewError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let mut layers = Vec::new();

    if config.console_output {
        let console_layer = subscriber_fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .compact();
        layers.push(console_layer.boxed());
    }

    if config.file_output {
        std::fs::create_dir_all(&config.log_dir)?;

        let file_appender =
            RollingFileAppender::new(Rotation::DAILY, &config.log_dir, "link-preview-card.log");

        let file_layer = subscriber_fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(true)
            .with_line_number(true)
            .with_writer(file_appender);

        layers.push(file_layer.boxed());
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()
        .map_err(|e| {
            PreviewError::InvalidConfiguration(format!("Failed to set global subscriber: {e}"))
        })?;

    debug!(config = ?config, "Logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_rows_are_aligned() {
        let card = boxed(&[("Title", "Rust"), ("Publisher", "")], 40);
        let lines: Vec<&str> = card.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("│ Title       Rust"));
        assert!(lines[2].starts_with("│ Publisher   -"));
        assert!(lines.iter().all(|l| l.width() == lines[0].width()));
    }

    #[test]
    fn long_values_wrap_under_their_label() {
        let card = boxed(&[("Description", "alpha beta gamma delta epsilon zeta")], 34);
        let lines: Vec<&str> = card.lines().collect();
        assert!(lines.len() > 3);
        assert!(lines[2].starts_with(&format!("│ {}", " ".repeat(LABEL_WIDTH))));
        assert!(lines.iter().all(|l| l.width() == lines[0].width()));
    }

    #[test]
    fn cards_log_under_a_scoped_subscriber() {
        let subscriber = tracing_subscriber::registry()
            .with(subscriber_fmt::layer().with_test_writer())
            .with(EnvFilter::new("debug"));
        tracing::subscriber::with_default(subscriber, || {
            log_preview_card(&PreviewResult::no_response(), "https://example.com");
            log_error_card("https://example.com", &PreviewError::InputEmpty);
        });
    }
}
