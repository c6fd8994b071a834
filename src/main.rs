use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use homework_bot::config::{Config, FileConfig, Secrets};
use homework_bot::logging::{self, LogTarget};
use homework_bot::notify::telegram::TelegramNotifier;
use homework_bot::poller::{PollOutcome, PollSettings, Poller};
use homework_bot::review::praktikum::PraktikumClient;
use homework_bot::review::status::StatusMode;
use jiff::Timestamp;

#[derive(Parser, Debug)]
#[command(name = "homework-bot")]
#[command(about = "Forwards Praktikum homework review results to Telegram", long_about = None)]
struct Cli {
    /// Path to config file (default: ~/.config/homework-bot/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read environment variables from this file instead of ./.env
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Append logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log to stderr instead of a file
    #[arg(long)]
    stderr: bool,

    /// Poll a single time and exit
    #[arg(long)]
    once: bool,

    /// Report unknown statuses as approved instead of failing
    #[arg(long)]
    lenient: bool,

    /// Also send poll errors to the chat
    #[arg(long)]
    notify_errors: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.env_file {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to load env file {}", path.display()))?;
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }

    let mut file_config =
        FileConfig::discover(cli.config.as_deref()).context("Failed to load configuration")?;
    if cli.lenient {
        file_config.status_mode = StatusMode::Lenient;
    }
    if cli.notify_errors {
        file_config.notify_errors = true;
    }
    if let Some(path) = cli.log_file {
        file_config.log_file = Some(path);
    }

    let log_file = file_config
        .log_file
        .clone()
        .unwrap_or_else(logging::default_log_file);
    let target = if cli.stderr {
        LogTarget::Stderr
    } else {
        LogTarget::File(&log_file)
    };
    logging::init_logging(target)
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;

    let secrets = Secrets::from_env().context("Missing credentials")?;
    let config = Config::new(file_config, secrets).context("Invalid configuration")?;

    tracing::debug!("Starting homework bot");

    let source = PraktikumClient::new(
        config.secrets.praktikum_token.clone(),
        config.api_url.clone(),
        config.request_timeout,
    );
    let notifier = TelegramNotifier::new(
        config.secrets.telegram_token.clone(),
        config.secrets.telegram_chat_id.clone(),
        config.telegram_api_base.clone(),
        config.request_timeout,
    );
    let cursor = Timestamp::now().as_second();
    let mut poller = Poller::new(source, notifier, PollSettings::from(&config), cursor);

    if cli.once {
        let outcome = poller.poll_once().await.map_err(|err| {
            tracing::error!(kind = err.kind(), error = %err, "Poll failed");
            err
        })?;
        match outcome {
            PollOutcome::Notified { homework } => {
                tracing::info!(homework = %homework, cursor = poller.cursor(), "Reported review result")
            }
            PollOutcome::NoChanges => {
                tracing::info!(cursor = poller.cursor(), "No new reviews")
            }
        }
        return Ok(());
    }

    poller.run().await;
    Ok(())
}
