//! CLI entrypoint for robinhood-mcp
//!
//! This is the main binary that wires together all layers using
//! dependency injection. The same binary also serves as the boundary worker
//! (`robinhood-mcp bridge <group> <operation> ...`).

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use rhmcp_application::{Dispatcher, ToolCatalog, ToolSchemaPort};
use rhmcp_domain::Credential;
use rhmcp_infrastructure::{
    ConfigLoader, CredentialSigner, FileConfig, JsonSchemaToolConverter, SubprocessExecutor,
    TransportKind, init_logging, run_worker,
};
use rhmcp_presentation::{
    BridgeArgs, Cli, Command, HttpServer, HttpServerConfig, ServeArgs, StdioServer,
    TransportChoice,
};
use serde_json::json;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // One thread: each request is a task, each task awaits its own child.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(run(cli))
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let command = cli.command();

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
    }
    .map_err(|e| anyhow!("Failed to load configuration: {}", e))?;

    if let Command::Serve(args) = &command {
        apply_serve_args(&mut config, args);
    }
    config.validate()?;

    let _log_guard = init_logging(cli.verbose, &config.logging)?;

    match command {
        Command::Serve(_) => serve(&cli, config).await,
        Command::Bridge(args) => Ok(bridge(&config, &args).await),
        Command::Tools => print_tools(),
    }
}

async fn serve(cli: &Cli, config: FileConfig) -> Result<ExitCode> {
    info!("Starting robinhood-mcp");

    let credential = Arc::new(load_credential(&config));
    if !credential.has_api_key() {
        warn!("ROBINHOOD_API_KEY not set; tool calls fail until it is provided");
    }
    if !credential.has_signing_key() {
        warn!("ROBINHOOD_PRIVATE_KEY not set; tool calls fail until it is provided");
    }

    // === Dependency Injection ===
    let catalog = Arc::new(ToolCatalog::build()?);
    let executor = Arc::new(boundary_executor(cli, &config, credential.clone())?);
    info!("Boundary worker: {}", executor.program());
    let dispatcher = Dispatcher::new(catalog, executor, credential, &JsonSchemaToolConverter);

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received, shutting down");
                shutdown.cancel();
            }
        }
    });

    match config.server.transport {
        TransportKind::Stdio => StdioServer::new(dispatcher).run(shutdown).await?,
        TransportKind::Http => {
            let http_config = HttpServerConfig {
                bind_address: config.server.bind_address(),
                endpoint: config.server.endpoint.clone(),
            };
            HttpServer::new(dispatcher, http_config)
                .run(shutdown)
                .await
                .with_context(|| format!("HTTP server on {} failed", config.server.bind_address()))?
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// The configured credential, with an undecodable signing key recorded so
/// each tool call fails as a configuration error instead of in the worker.
fn load_credential(config: &FileConfig) -> Credential {
    let credential = config.credentials.to_credential();
    match CredentialSigner::check_signing_key(&credential) {
        Ok(()) => credential,
        Err(e) => {
            warn!("{}; tool calls fail until it is fixed", e);
            credential.with_unusable_signing_key(e.to_string())
        }
    }
}

/// Worker mode: one JSON value on stdout. Failures also go to stderr with
/// a non-zero status, which the parent turns into a boundary error.
async fn bridge(config: &FileConfig, args: &BridgeArgs) -> ExitCode {
    match run_worker(config, &args.group, &args.operation, &args.args).await {
        Ok(value) => {
            println!("{}", value);
            ExitCode::SUCCESS
        }
        Err(e) => {
            let message = e.to_string();
            println!("{}", json!({ "error": message }));
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

fn print_tools() -> Result<ExitCode> {
    let catalog = ToolCatalog::build()?;
    let tools = JsonSchemaToolConverter.all_tools_schema(catalog.spec());
    println!("{}", serde_json::to_string_pretty(&json!({ "tools": tools }))?);
    Ok(ExitCode::SUCCESS)
}

fn apply_serve_args(config: &mut FileConfig, args: &ServeArgs) {
    if let Some(transport) = args.transport {
        config.server.transport = match transport {
            TransportChoice::Stdio => TransportKind::Stdio,
            TransportChoice::Http => TransportKind::Http,
        };
    }
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(endpoint) = &args.endpoint {
        config.server.endpoint = endpoint.clone();
    }
}

/// Arguments that make a child of this binary load the same configuration
/// and run as the worker.
fn worker_prefix_args(cli: &Cli) -> Vec<String> {
    let mut args = Vec::new();
    if cli.no_config {
        args.push("--no-config".to_string());
    } else if let Some(path) = &cli.config {
        args.push("--config".to_string());
        args.push(path.display().to_string());
    }
    args.push("bridge".to_string());
    args
}

fn boundary_executor(
    cli: &Cli,
    config: &FileConfig,
    credential: Arc<Credential>,
) -> Result<SubprocessExecutor> {
    let program = match &config.boundary.program {
        Some(program) => program.clone(),
        None => std::env::current_exe()
            .context("Cannot locate the running executable for the bridge worker")?
            .display()
            .to_string(),
    };
    let prefix_args = config
        .boundary
        .args
        .clone()
        .unwrap_or_else(|| worker_prefix_args(cli));

    Ok(SubprocessExecutor::new(program, credential)
        .with_prefix_args(prefix_args)
        .with_env("ROBINHOOD_BASE_URL", config.upstream.base_url.clone())
        .with_timeout(Duration::from_secs(config.boundary.timeout_seconds)))
}
