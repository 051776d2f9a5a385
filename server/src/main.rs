use clap::Parser;

use common::config::{ConfigManager, FileContentConfigProvider, YamlConfigSerializer};
use common::{log, logger};
use kalah_server::matchmaker::Matchmaker;
use kalah_server::server_config::{DEFAULT_CONFIG_FILE, ServerConfig};
use kalah_server::session_registry::SessionRegistry;
use kalah_server::web_server::{WebServerState, run_web_server};

type ServerConfigManager = ConfigManager<FileContentConfigProvider, ServerConfig, YamlConfigSerializer>;

#[derive(Parser)]
#[command(name = "kalah_server")]
struct Args {
    /// YAML config file; defaults are used when it does not exist.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: String,

    #[arg(long)]
    verbose: bool,

    #[arg(long)]
    use_log_prefix: bool,

    /// Write the loaded config (defaults filled in) back to the config file and exit.
    #[arg(long)]
    write_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config_manager = ServerConfigManager::from_yaml_file(&args.config);
    let config = config_manager.load()?;

    let prefix = if args.use_log_prefix {
        Some(config.log_prefix.clone().unwrap_or_else(|| "Server".to_string()))
    } else {
        config.log_prefix.clone()
    };
    logger::init_logger(prefix, args.verbose || config.verbose);
    log!("Loaded config from {}", config_manager.source());

    if args.write_config {
        config_manager.store(&config)?;
        log!("Wrote config to {}", config_manager.source());
        return Ok(());
    }

    let addr = config.socket_addr()?;
    let state = WebServerState {
        matchmaker: Matchmaker::new(SessionRegistry::new()),
    };

    run_web_server(state, addr, config.static_files_path).await
}
