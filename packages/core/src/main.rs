use clap::Parser;
use dotenvy::dotenv;

use hourly_fee_report::cli::Cli;
use hourly_fee_report::config::Config;
use hourly_fee_report::error::AppError;
use hourly_fee_report::history::RpcFeeHistoryProvider;
use hourly_fee_report::job;
use hourly_fee_report::logging::init_logging;
use hourly_fee_report::services::rpc::RpcClient;

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_logging();

    let cli = Cli::parse();

    let config = Config::from_env()
        .and_then(|config| config.with_cli_overrides(&cli))
        .map_err(AppError::Config)
        .unwrap_or_else(|err| {
            tracing::error!("{}", err);
            std::process::exit(1);
        });

    tracing::debug!("Running with config: {:?}", config);

    let client = RpcClient::new(config.rpc_url.clone(), config.request_timeout())
        .unwrap_or_else(|err| {
            tracing::error!("{}", err);
            std::process::exit(1);
        });
    let provider = RpcFeeHistoryProvider::new(client);

    if let Err(err) = job::run(&config, &provider).await {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}
