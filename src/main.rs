use clap::Parser;
use convert_pro::utils::{logger, validation::Validate};
use convert_pro::{start_server, ServerArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServerArgs::parse();

    // 初始化日誌
    logger::init_server_logger(args.verbose, args.json_logs);

    tracing::info!("🚀 Starting convert-pro server");

    let config = match args.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if args.verbose {
        tracing::debug!("Server config: {:?}", config.server);
    }
    if !config.server.production {
        tracing::info!("📣 Development build: ad slots render placeholders");
    }

    start_server(config).await?;
    Ok(())
}
