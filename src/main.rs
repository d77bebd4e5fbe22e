// PDU gateway binary: HTTP server and one-shot power-on
use std::io::stderr;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{eyre, Result, WrapErr};
use pdu_control::{ControllerRegistry, PowerBackend};
use pdu_server::config::DEFAULT_CONFIG_PATH;
use pdu_server::{Config, PowerOnHandler};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Power on PDU outlets through vendor drivers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the TOML config file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Verbose output - shows more detailed logs
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Runs the HTTP API server
    Serve(ServeArgs),
    /// Powers on a single outlet and prints the response envelope
    PowerOn(PowerOnArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Listen address, overrides the config file
    #[arg(long)]
    bind: Option<SocketAddr>,
}

#[derive(Args, Debug)]
struct PowerOnArgs {
    #[arg(long)]
    manufacturer: String,

    /// Network address of the PDU
    #[arg(long)]
    ip: String,

    #[arg(long)]
    username: String,

    #[arg(long, env = "PDU_PASSWORD", hide_env_values = true)]
    password: String,

    /// Outlet number
    #[arg(long)]
    port: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let default_directives = format!(
        "pdu_gateway={level},pdu_server={level},pdu_control={level},tower_http=info,hyper=warn,reqwest=warn",
        level = default_level
    );
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));
    registry().with(filter).with(fmt::layer().with_writer(stderr)).init();

    let mut config = Config::load(&cli.config)
        .wrap_err_with(|| format!("Failed to load config from {}", cli.config.display()))?;
    debug!(?config, "Configuration loaded");

    let backend: Arc<dyn PowerBackend> = Arc::new(
        ControllerRegistry::from_config(&config.drivers).wrap_err("Failed to set up PDU drivers")?,
    );

    match cli.command {
        Commands::Serve(args) => {
            if let Some(bind) = args.bind {
                config.server.bind = bind;
            }
            info!(version = env!("CARGO_PKG_VERSION"), "Starting PDU gateway");
            pdu_server::run(config, backend)
                .await
                .map_err(|e| eyre!("{:#}", e))?;
        }
        Commands::PowerOn(args) => {
            let code = power_on_once(backend, args).await?;
            std::process::exit(code);
        }
    }

    Ok(())
}

/// Run one request through the same handler the server uses
async fn power_on_once(backend: Arc<dyn PowerBackend>, args: PowerOnArgs) -> Result<i32> {
    // Integer-looking ports travel as numbers, anything else as text so the
    // validator reports it.
    let port = args
        .port
        .trim()
        .parse::<i64>()
        .map(serde_json::Value::from)
        .unwrap_or_else(|_| serde_json::Value::from(args.port.clone()));

    let body = serde_json::to_vec(&serde_json::json!({
        "manufacturer": args.manufacturer,
        "ip": args.ip,
        "username": args.username,
        "password": args.password,
        "port": port,
    }))?;

    let handler = PowerOnHandler::new(backend);
    let (envelope, status) = handler.handle(&body).await;
    debug!(status = status.as_u16(), "Power-on finished");

    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(if envelope.is_success() { 0 } else { 1 })
}
