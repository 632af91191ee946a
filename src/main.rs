#[macro_use]
extern crate log;

mod burrow_client;
mod burrow_types;
mod cli;
mod config;
mod constants;
mod filter;
mod http;
mod logging;
mod prometheus_metrics;
mod scheduler;

use std::process;
use std::sync::Arc;

use prometheus::Registry;
use tokio_util::sync::CancellationToken;

use burrow_client::BurrowClient;
use cli::Cli;
use config::ExporterConfig;
use prometheus_metrics::PrometheusPublisher;
use scheduler::ScrapeScheduler;

#[tokio::main]
async fn main() {
    let config = parse_cli_and_init_logging();

    let shutdown_token = build_shutdown_token();

    let code = run(config, shutdown_token).await;
    info!("Exiting with code {code}");
    process::exit(code);
}

fn parse_cli_and_init_logging() -> ExporterConfig {
    // Parse command line input and initialize logging
    let (cli, config) = Cli::parse_and_validate();
    logging::init(cli.verbosity_level());

    trace!("Created:\n{:#?}", cli);

    config
}

fn build_shutdown_token() -> CancellationToken {
    let shutdown_token = CancellationToken::new();

    // Setup shutdown signal handler:
    // when it's time to shutdown, cancel the token shared with all parts of the system.
    //
    // NOTE: This handler will be listening on its own dedicated thread.
    let handler_token = shutdown_token.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Shutting down...");
        handler_token.cancel();
    }) {
        error!("Failed to register signal handler: {e}");
    }

    shutdown_token
}

/// Wire everything together, and run until shutdown; returns the process exit code.
async fn run(config: ExporterConfig, shutdown_token: CancellationToken) -> i32 {
    let registry = Arc::new(Registry::new());

    let publisher = match PrometheusPublisher::new(&registry, config.stale_after_cycles) {
        Ok(p) => Arc::new(p),
        Err(e) => {
            error!("Failed to register metrics: {e}");
            return exit_code::FAILURE;
        },
    };

    let client =
        match BurrowClient::new(config.burrow_addr.clone(), config.api_version, config.request_timeout) {
            Ok(c) => Arc::new(c),
            Err(e) => {
                error!("Failed to create Burrow client: {e}");
                return exit_code::FAILURE;
            },
        };

    let listener = match http::bind(&config.metrics_addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind metrics endpoint to '{}': {e}", config.metrics_addr);
            return exit_code::SERVICE_UNAVAILABLE;
        },
    };
    let mut server = tokio::spawn(http::serve(listener, registry, shutdown_token.clone()));

    let mut scheduler = ScrapeScheduler::new(&config, client, publisher);
    if let Err(e) = scheduler.start(shutdown_token.clone()) {
        error!("Failed to start scraping: {e}");
        shutdown_token.cancel();
        return exit_code::FAILURE;
    }

    // Run until shutdown is requested, or the HTTP server terminates on its own
    let server_exited_early = tokio::select! {
        biased;
        _ = shutdown_token.cancelled() => None,
        res = &mut server => Some(res),
    };

    match server_exited_early {
        Some(res) => {
            match res {
                Ok(Ok(())) => error!("HTTP server terminated unexpectedly"),
                Ok(Err(e)) => error!("HTTP server failed: {e}"),
                Err(e) => error!("HTTP server task failed: {e}"),
            }
            shutdown_token.cancel();
            scheduler.close().await;
            exit_code::FAILURE
        },
        None => {
            scheduler.close().await;
            match server.await {
                Ok(Ok(())) => exit_code::SUCCESS,
                Ok(Err(e)) => {
                    error!("HTTP server failed while shutting down: {e}");
                    exit_code::FAILURE
                },
                Err(e) => {
                    error!("HTTP server task failed while shutting down: {e}");
                    exit_code::FAILURE
                },
            }
        },
    }
}
