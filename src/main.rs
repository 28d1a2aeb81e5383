use std::path::Path;

use clap::Parser;
use mazesim::{Error, app::App, config::Config};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};

/// Send logs to the configured file, since the visualizer owns the terminal.
/// The returned guard flushes pending log lines when dropped.
fn init_logging(config: &Config) -> Result<WorkerGuard, Error> {
    let log_file = &config.log_file;
    let file_name = log_file
        .file_name()
        .ok_or_else(|| Error::Logging(format!("{} is not a file path", log_file.display())))?;
    let directory = log_file
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy().into_owned())
        .build(directory)
        .map_err(|e| Error::Logging(e.to_string()))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_max_level(config.log_level)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))?;
    Ok(guard)
}

fn main() -> Result<(), Error> {
    let config = Config::parse();
    config.validate()?;
    let _guard = init_logging(&config)?;

    let term_size = crossterm::terminal::size()?;
    let mut app = App::new(&config, term_size);

    let mut stdout = std::io::stdout();
    App::setup_terminal(&mut stdout)?;
    let result = app.run(&mut stdout);
    App::restore_terminal(&mut stdout)?;
    if let Err(e) = &result {
        tracing::error!("[app] {}", e);
    }
    result
}
