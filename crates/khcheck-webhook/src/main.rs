use anyhow::Result;
use khcheck_webhook::{cli, config::Config, tracing::setup_tracing, WebhookServer};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();
    let config = Config::from_args(&matches)?;

    setup_tracing(&config.log_level, &config.log_fmt, config.log_no_color)?;

    let server = WebhookServer::new_from_config(config).await?;
    server.run().await
}
