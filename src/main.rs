use anyhow::{Context, Result};
use clap::Parser;

use funnelboard::cli::{Cli, Commands};
use funnelboard::config::{StaticConfig, get_config, init_config_from};
use funnelboard::runtime::modes;
use funnelboard::system::init_logging;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // 不需要加载配置和日志
    if let Some(Commands::GenerateConfig { path }) = &cli.command {
        return generate_config(path.as_deref());
    }

    init_config_from(&cli.config);
    let config = get_config();
    let _guard = init_logging(&config.logging);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => modes::run_server().await,
        Commands::Overview { from, to } => {
            modes::run_overview_report(from.as_deref(), to.as_deref()).await
        }
        Commands::Forecast { target } => modes::run_forecast_report(target).await,
        Commands::GenerateConfig { .. } => Ok(()),
    }
}

fn generate_config(path: Option<&str>) -> Result<()> {
    match path {
        None => {
            println!("{}", StaticConfig::generate_sample_config());
            Ok(())
        }
        Some(path) => {
            StaticConfig::default()
                .save_to_file(path)
                .with_context(|| format!("Failed to write sample config to {}", path))?;
            eprintln!("Sample configuration written to {}", path);
            Ok(())
        }
    }
}
