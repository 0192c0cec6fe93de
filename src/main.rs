use std::sync::Arc;

use anyhow::Result;
use competition_booking_service::{
    adapters::{http::create_app, storage::json_file::JsonFileStorage},
    commands::DomainLogic,
    config::Config,
    logging::init_logging,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    init_logging(&config.logging)?;

    info!(
        "Starting competition booking service v{}",
        env!("CARGO_PKG_VERSION")
    );

    let storage = JsonFileStorage::new(
        &config.storage.clubs_path,
        &config.storage.competitions_path,
    );
    let logic = DomainLogic::load(Arc::new(storage), config.booking_policy()).await;
    let app = create_app(logic);

    let addr = config.socket_addr();
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
