//! CORD daemon — entry point for running a CORD node.

use clap::Parser;
use std::path::PathBuf;

use cord_node::{init_logging, CordNode, LogFormat, NodeConfig};

#[derive(Parser)]
#[command(name = "cord-daemon", about = "CORD protocol node daemon")]
struct Cli {
    /// Data directory for durable storage.
    #[arg(long, default_value = "./cord_data", env = "CORD_DATA_DIR")]
    data_dir: PathBuf,

    /// Validator base URLs (comma-separated:
    /// "http://10.0.0.1:7200,http://10.0.0.2:7200").
    #[arg(long, env = "CORD_VALIDATORS", value_delimiter = ',')]
    validators: Vec<String>,

    /// Seconds between membership probe cycles.
    #[arg(long, env = "CORD_PROBE_INTERVAL_SECS")]
    probe_interval_secs: Option<u64>,

    /// Milliseconds between consensus sweep passes.
    #[arg(long, env = "CORD_SWEEP_INTERVAL_MS")]
    sweep_interval_ms: Option<u64>,

    /// Log format: "human" or "json".
    #[arg(long, default_value = "human", env = "CORD_LOG_FORMAT")]
    log_format: String,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "CORD_LOG_LEVEL")]
    log_level: String,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Start the node.
    #[command(name = "node")]
    Node {
        #[command(subcommand)]
        action: NodeAction,
    },
}

#[derive(clap::Subcommand)]
enum NodeAction {
    /// Run the node.
    Run,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(LogFormat::from_config(&cli.log_format), &cli.log_level);

    let file_config: Option<NodeConfig> = if let Some(ref config_path) = cli.config {
        match NodeConfig::from_toml_file(&config_path.display().to_string()) {
            Ok(cfg) => {
                tracing::info!("loaded config from {}", config_path.display());
                Some(cfg)
            }
            Err(e) => {
                tracing::warn!("failed to load config file: {e}, using CLI defaults");
                None
            }
        }
    } else {
        None
    };

    let config = if let Some(file_cfg) = file_config {
        NodeConfig {
            data_dir: cli.data_dir,
            validators: if cli.validators.is_empty() {
                file_cfg.validators
            } else {
                cli.validators
            },
            probe_interval_secs: cli
                .probe_interval_secs
                .unwrap_or(file_cfg.probe_interval_secs),
            sweep_interval_ms: cli.sweep_interval_ms.unwrap_or(file_cfg.sweep_interval_ms),
            log_format: cli.log_format,
            log_level: cli.log_level,
            ..file_cfg
        }
    } else {
        let defaults = NodeConfig::default();
        NodeConfig {
            data_dir: cli.data_dir,
            validators: cli.validators,
            probe_interval_secs: cli
                .probe_interval_secs
                .unwrap_or(defaults.probe_interval_secs),
            sweep_interval_ms: cli.sweep_interval_ms.unwrap_or(defaults.sweep_interval_ms),
            log_format: cli.log_format,
            log_level: cli.log_level,
            ..defaults
        }
    };

    match cli.command {
        Command::Node { action } => match action {
            NodeAction::Run => {
                tracing::info!(
                    validators = config.validators.len(),
                    data_dir = %config.data_dir.display(),
                    "starting CORD node"
                );
                if config.validators.is_empty() {
                    tracing::warn!(
                        "no validators configured — consensus cannot make progress"
                    );
                }

                let mut node = CordNode::new(config)?;
                node.run().await;

                tracing::info!("CORD daemon exited cleanly");
            }
        },
    }

    Ok(())
}
