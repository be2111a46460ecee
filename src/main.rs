//! Command-line tool entry point.

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod address;
mod cli;
mod client;
mod clock;
mod cmd;
mod config;
mod error;
mod finders;
mod history;
mod locators;
mod notifiers;
mod providers;
mod report;
mod rollover;
mod store;

use cmd::update::Trigger;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cloudflare_ddns=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let app_args = cli::App::parse();
    let config = config::Config::load(&app_args.config)?;

    match app_args.command {
        cli::Command::Run { discovery } => once(&config, &discovery, Trigger::Scheduled).await?,
        cli::Command::Update { discovery } => once(&config, &discovery, Trigger::Update).await?,
        cli::Command::Notify { discovery } => once(&config, &discovery, Trigger::Notify).await?,
        cli::Command::Status => {
            let ctx = cmd::Context::from_config(&config, &cli::Discovery::default())?;
            println!("{}", cmd::status::execute(&ctx));
        }
        cli::Command::Daemon {
            interval,
            discovery,
        } => {
            if interval == 0 {
                anyhow::bail!("the interval must be greater than 0 seconds");
            }

            let ctx = cmd::Context::from_config(&config, &discovery)?;
            info!(interval, domain = %config.cloudflare.domain, "daemon started");

            // Invocations never overlap; a late tick waits for the running one.
            let mut ticks = tokio::time::interval(std::time::Duration::from_secs(interval));
            ticks.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                let outcome = cmd::update::execute(&ctx, Trigger::Scheduled).await;
                info!(outcome = %outcome, "invocation finished");
            }
        }
    }

    Ok(())
}

async fn once(
    config: &config::Config,
    discovery: &cli::Discovery,
    trigger: Trigger,
) -> anyhow::Result<()> {
    let ctx = cmd::Context::from_config(config, discovery)?;
    let outcome = cmd::update::execute(&ctx, trigger).await;
    println!("{}", outcome);
    Ok(())
}
