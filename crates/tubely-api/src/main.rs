use tubely_core::Config;
use tubely_infra::LogFormat;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    let log_format: LogFormat = config.log_format.parse()?;
    tubely_infra::init_telemetry(log_format, "tubely-api")?;

    let (_state, router) = tubely_api::setup::initialize_app(config.clone()).await?;

    tubely_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
