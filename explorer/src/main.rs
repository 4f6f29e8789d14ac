use clap::Parser as _;
use dotenvy::dotenv;
use explorer::cli::{Cli, Commands, RunCmd, SetupCmd};
use explorer::core::config::Config;
use explorer::server::setup_server;
use explorer::setup::setup;
use explorer::types::params::OTELConfig;
use explorer::utils::instrument::ExplorerInstrumentation;
use explorer::utils::logging::init_logging;
use explorer::utils::signal_handler::SignalHandler;
use explorer::worker::WorkerController;
use explorer::{ExplorerError, ExplorerResult};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(60);

/// Start the explorer
#[tokio::main]
async fn main() {
    dotenv().ok();
    init_logging();
    info!("Starting explorer");
    let cli = Cli::parse();

    match &cli.command {
        Commands::Run { run_command } => {
            info!("Executing run command with args: {:?}", run_command);
            if let Err(e) = run_explorer(run_command).await {
                error!(error = %e, error_chain = ?e, "Failed to run explorer service");
                std::process::exit(1);
            }
        }
        Commands::Setup { setup_command } => {
            info!("Executing setup command with args: {:?}", setup_command);
            if let Err(e) = setup_explorer(setup_command).await {
                error!(error = %e, error_chain = ?e, "Failed to setup explorer");
                std::process::exit(1);
            }
            info!("Explorer setup completed successfully");
        }
    }
}

async fn run_explorer(run_cmd: &RunCmd) -> ExplorerResult<()> {
    let otel_config = OTELConfig::try_from(run_cmd.instrumentation_args.clone())?;
    let instrumentation = ExplorerInstrumentation::new(&otel_config)?;

    let config = Arc::new(Config::from_run_cmd(run_cmd).await?);
    debug!("Configuration initialized");

    let (_, server_handle) = setup_server(config.clone()).await?;

    let shutdown_token = CancellationToken::new();
    let mut worker_controller = WorkerController::new(config.clone(), shutdown_token.clone());
    if !config.service_config().read_only {
        worker_controller.start()?;
    }

    let signal_handler = SignalHandler::new(shutdown_token);
    let signal = signal_handler.wait_for_shutdown().await?;
    info!(signal = %signal, "Explorer service shutting down");

    let shutdown = signal_handler
        .handle_graceful_shutdown(
            move || async move {
                worker_controller.shutdown().await;
                server_handle.shutdown().await?;
                Ok(())
            },
            SHUTDOWN_TIMEOUT,
        )
        .await;
    if let Err(e) = shutdown {
        warn!(error = %e, "Shutdown did not complete cleanly");
    }

    instrumentation.shutdown()?;
    info!("Explorer service stopped");
    Ok(())
}

/// setup_explorer - Create the relay queues and the store indexes
async fn setup_explorer(setup_cmd: &SetupCmd) -> ExplorerResult<()> {
    setup(setup_cmd).await.map_err(|e| ExplorerError::SetupCommandError(e.to_string()))
}
