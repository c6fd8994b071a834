use std::env;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

const DEFAULT_LEVEL: &str = "debug";

pub enum LogTarget<'a> {
    File(&'a Path),
    Stderr,
}

fn env_filter() -> EnvFilter {
    match env::var("RUST_LOG") {
        Ok(rust_log) => EnvFilter::new(rust_log),
        Err(_) => {
            let level = env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LEVEL.to_string());
            EnvFilter::new(level.to_lowercase())
        }
    }
}

pub fn init_logging(target: LogTarget<'_>) -> io::Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter());

    match target {
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        LogTarget::Stderr => builder.with_writer(io::stderr).init(),
    }
    Ok(())
}

/// `<executable name>.log` in the working directory.
pub fn default_log_file() -> PathBuf {
    let stem = env::current_exe()
        .ok()
        .and_then(|exe| exe.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "homework-bot".to_string());
    PathBuf::from(format!("{}.log", stem))
}
