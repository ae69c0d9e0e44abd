use std::io;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use gh_client::{OctocrabClient, TokenResolver, build_octocrab};
use gh_deploy_config::{AppConfig, origin_remote};
use gh_deploy_watch::{
    PlainReporter, ProgressReporter, TerminalReporter, WatchConfig, WatchError, WatchSettings,
    watch,
};
use ratatui::crossterm::tty::IsTty;

mod cli;
mod logger;

use cli::Cli;

/// Exit status after Ctrl-C, as shells report SIGINT
const INTERRUPTED_EXIT_CODE: i32 = 130;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Ignoring malformed .env file: {e}");
        }
    }

    let log_file = logger::init(cli.debug)?;
    log::info!(
        "Starting gh-deploy-watch v{}, logging to {}",
        env!("CARGO_PKG_VERSION"),
        log_file.display()
    );

    let app_config = AppConfig::load();
    let Some(target) = cli.resolve_target(&app_config, origin_remote()) else {
        println!("Specify repository name, for example service-api");
        return Ok(());
    };

    let config = WatchConfig::new(
        target.owner,
        target.repo,
        &target.workflow,
        WatchSettings::from(&app_config),
    );
    log::info!(
        "Watching workflow '{}' of {}/{}",
        config.workflow,
        config.owner,
        config.repo
    );

    let token = TokenResolver::new(app_config.token_env.as_str()).resolve();
    let client = OctocrabClient::new(Arc::new(build_octocrab(token)?));
    let mut reporter: Box<dyn ProgressReporter> = if io::stdout().is_tty() {
        Box::new(TerminalReporter::stdout()?)
    } else {
        log::info!("stdout is not a terminal, printing plain lines");
        Box::new(PlainReporter::new(io::stdout()))
    };

    let result = tokio::select! {
        result = watch(&client, &config, reporter.as_mut()) => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };

    reporter.finish()?;

    match result {
        None => {
            log::warn!("Interrupted by operator");
            eprintln!("Interrupted");
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
        Some(Ok(outcome)) => {
            log::info!(
                "Run {} concluded as {:?}, related PR: {:?}",
                outcome.run.id,
                outcome.run.conclusion,
                outcome.related_pr.map(|pr| pr.number)
            );
            Ok(())
        }
        Some(Err(WatchError::WorkflowNotFound { name, candidates })) => {
            println!("Unable to find workflow matching '{name}'");
            println!("Found these workflows:");
            for candidate in candidates {
                println!("{candidate}");
            }
            Ok(())
        }
        Some(Err(err)) => {
            log::error!("Watch failed: {err:#}");
            Err(err.into())
        }
    }
}
