use std::process::ExitCode;

use clap::Parser;
use tokio::io::AsyncWriteExt;
use tracing::warn;
use vault_login::helper::{Helper, HelperOptions};
use vault_login::protocol::{self, Action};
use vault_login::utils::config_loader;
use vault_login::utils::constants::{DEFAULT_CONFIG_FILE, ENV_CONFIG_FILE};
use vault_login::utils::logging::{self, LogLevel};
use vault_login::vault::VaultClient;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Credential-helper action, passed by docker
    #[arg(value_enum)]
    action: Action,
    #[arg(short, long, env = ENV_CONFIG_FILE, default_value = DEFAULT_CONFIG_FILE)]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // -------------------------------
    // 1. Read args, load config, set up logging
    // -------------------------------

    let args = Args::parse();
    let service_config = config_loader::run(&args.config);
    let _guard = logging::run(service_config.as_ref().ok(), args.log_level);
    if let Err(err) = &service_config {
        warn!("{:#}", err);
    }

    // -------------------------------
    // 2. Serve the requested action
    // -------------------------------

    let mut helper = Helper::<VaultClient>::new(HelperOptions {
        client: None,
        config: service_config.ok(),
        config_path: Some(args.config),
    });

    let mut stdout = tokio::io::stdout();
    match protocol::serve(&mut helper, args.action, tokio::io::stdin(), &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = stdout.write_all(format!("{}\n", err).as_bytes()).await;
            let _ = stdout.flush().await;
            ExitCode::FAILURE
        }
    }
}
