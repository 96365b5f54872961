use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use skypark_server::config::Config;
use skypark_server::routes::create_routes;
use skypark_server::state::AppState;

const DEFAULT_LOG_FILTER: &str = "skypark_server=info,tower_http=info";

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = Config::from_env();
    let addr = config.bind_addr();
    tracing::info!(
        park_capacity = config.park_capacity.total_capacity,
        time_slots = config.park_capacity.time_slots.len(),
        "Configuration loaded"
    );

    let app = create_routes(AppState::new(config));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("🚀 Server running at http://{}", addr);

    axum::serve(listener, app).await
}
