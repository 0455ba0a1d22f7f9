use std::io;

use clap::Parser;

use towerflux::cli::{Cli, Config, Format};
use towerflux::convert::{self, ConvertStats};
use towerflux::fetch;
use towerflux::logging;
use towerflux::sink::{IlpWriter, StatsdSink};

// Every exit is code 0, including the failure paths: the scheduler that
// drives this binary re-runs it regardless, and diagnostics live in the log.
#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // initialize the logger
    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(logging::default_log_file);
    if let Err(err) = logging::init(&log_file, cli.loglevel) {
        eprintln!("could not set up logging at {}: {err:#}", log_file.display());
    }
    log::info!("starting a scrape run");

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(err) => {
            log::error!("{err}");
            println!("The config was not complete: {err}");
            println!("Usage: towerflux <token> [--format telegraf|statsd] [--server-url <host>]");
            return;
        }
    };

    run(config).await;
}

async fn run(config: Config) {
    log::info!(
        "reading metrics from endpoint: {}",
        fetch::metrics_url(&config.server_url)
    );

    let raw = match fetch::fetch_metrics(&config.server_url, &config.api_token).await {
        Ok(raw) => raw,
        Err(err) => {
            log::error!("there was an error scraping Ansible Tower: {err}");
            println!("There was an error scraping Ansible Tower: {err}");
            return;
        }
    };
    log::debug!("received metrics:\n{raw}");

    let stats = match config.format {
        Format::Statsd => send_statsd(&config, &raw),
        Format::Telegraf => print_ilp(&config, &raw),
    };
    if let Some(stats) = stats {
        log::info!(
            "run finished: {} metrics emitted, {} skipped",
            stats.emitted,
            stats.skipped
        );
    }
}

fn print_ilp(config: &Config, raw: &str) -> Option<ConvertStats> {
    let stdout = io::stdout();
    let mut sink = match &config.debug_file {
        Some(path) => match IlpWriter::with_debug_file(stdout, path) {
            Ok(sink) => sink,
            Err(err) => {
                log::error!("could not open the debug file {}: {err}", path.display());
                println!("Could not open the debug file {}: {err}", path.display());
                return None;
            }
        },
        None => IlpWriter::new(stdout),
    };
    Some(convert::convert(raw, &mut sink))
}

fn send_statsd(config: &Config, raw: &str) -> Option<ConvertStats> {
    let mut sink = match StatsdSink::connect(
        &config.statsd_addr,
        &config.statsd_prefix,
        config.float_policy,
    ) {
        Ok(sink) => sink,
        Err(err) => {
            log::error!(
                "could not open the statsd socket for {}: {err}",
                config.statsd_addr
            );
            println!(
                "Could not open the statsd socket for {}: {err}",
                config.statsd_addr
            );
            return None;
        }
    };
    let stats = convert::convert(raw, &mut sink);
    if let Err(err) = sink.flush() {
        log::warn!("could not flush the statsd buffer: {err}");
    }
    Some(stats)
}
