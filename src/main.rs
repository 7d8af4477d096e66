//! CardioRisk: heart-disease risk prediction in the terminal.
//!
//! Main entry point for the terminal application.

use anyhow::Result;
use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cardiorisk::adapters::sanitize::SanitizingMakeWriter;
use cardiorisk::config::{LogSettings, LogSink};
use cardiorisk::tui::App;

fn main() -> Result<()> {
    // Writing logs to the terminal would corrupt the TUI (alternate screen),
    // so an interactive session logs to a file by default.
    let settings = LogSettings::from_env(std::io::stdout().is_terminal());

    let (writer, _guard) = match &settings.sink {
        LogSink::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                let _ = std::fs::create_dir_all(parent);
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_appender::non_blocking(file)
        }
        LogSink::Stdout => tracing_appender::non_blocking(std::io::stdout()),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&settings.filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(SanitizingMakeWriter::new(writer)),
        )
        .init();

    tracing::info!("Starting CardioRisk...");

    let mut app = App::new()?;
    app.run()?;

    tracing::info!("CardioRisk shutdown complete.");
    Ok(())
}
