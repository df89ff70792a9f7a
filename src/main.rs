use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use usuarios_api::{
    config::Settings,
    create_router, db,
    users::PgUserRepository,
    AppState,
};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Usuarios API - Starting...");

    let settings = Settings::from_env().expect("Invalid configuration");
    tracing::debug!("Loaded settings: {:?}", settings);

    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&settings)
        .await
        .expect("Failed to create database pool");

    tracing::info!("Running database migrations...");
    db::run_migrations(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    let repository = Arc::new(PgUserRepository::new(db_pool));
    let app = create_router(AppState::new(repository, &settings));

    let addr = settings.bind_address();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Usuarios API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
