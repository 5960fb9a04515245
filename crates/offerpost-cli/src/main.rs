mod cli;
mod logging;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use offerpost_core::{App, AppBuilder, Config};
use tokio::sync::watch;

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    // a missing .env is fine; the environment may already be set
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(err) = logging::init(&cli.log_file) {
        eprintln!("failed to initialize logging: {err:#}");
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("offerpost failed: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_env()
        .context("invalid configuration")?
        .with_offers_path(&cli.offers_file)
        .with_ledger_path(&cli.ledger_file);
    tracing::debug!(?config, "configuration loaded");

    let app = AppBuilder::new(config)
        .build()
        .context("failed to start")?;

    match cli.command_or_default() {
        Command::Run => run_until_ctrl_c(&app).await,
        Command::Once => {
            let summary = app.run_once().await;
            println!("{}", serde_json::to_string(&summary)?);
            Ok(())
        }
        Command::History => {
            for (offer_id, entry) in app.history().await {
                let line = serde_json::json!({ "id": offer_id, "entry": entry });
                println!("{line}");
            }
            Ok(())
        }
    }
}

async fn run_until_ctrl_c(app: &App) -> anyhow::Result<()> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl-C");
            // keep the sender alive so the app runs on without a signal handler
            std::future::pending::<()>().await;
        }
        tracing::info!("shutdown requested, finishing current pass");
        let _ = shutdown_tx.send(true);
    });

    app.run(shutdown_rx).await;
    Ok(())
}
