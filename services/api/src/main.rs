use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use api::routes;
use api::state::AppState;
use common::database::{DatabaseConfig, health_check, init_pool};
use common::schema::init_schema;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting scheduler API service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // Create the tables on first start
    init_schema(&pool).await?;

    info!("Scheduler API service initialized successfully");

    let app_state = AppState::new(pool);

    // Start the web server
    let app = routes::create_router(app_state);

    let addr = std::env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let listener = TcpListener::bind(&addr).await?;
    info!("Scheduler API service listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
