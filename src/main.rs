use std::net::SocketAddr;
use std::sync::Arc;

use interview_backend::{
    app,
    config::{get_config, init_config},
    database::pool::create_pool,
    services::groq_service::GroqAnalyzer,
    store::MemoryStore,
    AppState,
};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let state = if config.database_url.is_some() {
        let pool = create_pool().await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        AppState::new(pool)
    } else {
        warn!("DATABASE_URL not set, falling back to the in-memory store (single process, non-durable)");
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;
        let analyzer = Arc::new(GroqAnalyzer::new(
            config.groq_api_key.clone(),
            config.groq_model.clone(),
            http_client,
        ));
        AppState::with_store(Arc::new(MemoryStore::new()), analyzer)
    };

    let router = app(state);

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
