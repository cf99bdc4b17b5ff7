use chrono::Local;
use clap::Parser;
use money_tracker::args::{Args, Command};
use money_tracker::{commands, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let common = args.common();
    let home = common.money_home().path();
    let json = common.json();

    // --today pins "now" so that the current month or week is reproducible.
    let now = common
        .today()
        .unwrap_or_else(|| Local::now().date_naive());
    debug!("Resolving periods relative to {now}");

    let _: () = match args.command() {
        Command::Init(init_args) => {
            commands::init(home, init_args.snapshot(), init_args.owner())
                .await?
                .print(json)
        }

        Command::List(list_args) => {
            let config = Config::load(home).await?;
            commands::list(&config, list_args, now).await?.print(json)
        }

        Command::Summary(period_args) => {
            let config = Config::load(home).await?;
            commands::summary(&config, period_args.period(), now)
                .await?
                .print(json)
        }

        Command::Report(report_args) => {
            let config = Config::load(home).await?;
            commands::report(&config, report_args, now).await?.print(json)
        }

        Command::Trend(trend_args) => {
            let config = Config::load(home).await?;
            commands::trend(&config, trend_args, now).await?.print(json)
        }

        Command::Categories => commands::categories().print(json),

        Command::Watch(period_args) => {
            let config = Config::load(home).await?;
            commands::watch(&config, period_args.period(), common.today(), json)
                .await?
                .print(false)
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                "money_tracker",
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
