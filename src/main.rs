//! An in-memory catalog service with axum.

use catalog_service::{
    infra::{config, logging},
    server,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();
    let config = config::load_config()?;
    let _guard = logging::init_logging(&config.logging);

    let listener = TcpListener::bind(config.server.http_addr()).await?;
    server::run_app(listener, config).await?;

    Ok(())
}
