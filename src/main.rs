use garden_buddy::{
    api::{self, AppState},
    config::{database, settings},
    errors::Result,
    photos::{LocalPhotoStore, PHOTO_URL_PREFIX},
};
use dotenvy::dotenv;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, env vars can also be set externally
    dotenv().ok();

    // 3. Settings file plus environment overrides
    let settings = settings::load_default_settings()
        .inspect_err(|e| error!("Failed to load settings: {}", e))?;

    // 4. Database and schema
    let db = database::create_connection(&settings.database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Application state
    let mut state = AppState::new(db).with_upcoming_window(settings.upcoming_window_days);
    if let Some(dir) = &settings.upload_dir {
        let store = LocalPhotoStore::new(dir)
            .inspect_err(|e| error!("Failed to prepare upload directory {:?}: {}", dir, e))?;
        info!("Storing photos in {:?}", store.dir());
        state = state.with_photo_store(Arc::new(store));
    } else {
        warn!("No upload directory configured, photo uploads are disabled");
    }

    // 6. Routes, with uploaded photos served straight from disk
    let mut app = api::router(state, settings.max_upload_bytes);
    if let Some(dir) = &settings.upload_dir {
        app = app.nest_service(PHOTO_URL_PREFIX, ServeDir::new(dir));
    }

    // 7. Serve
    let listener = tokio::net::TcpListener::bind(&settings.bind_address)
        .await
        .inspect_err(|e| error!("Failed to bind {}: {}", settings.bind_address, e))?;
    info!("Listening on {}", settings.bind_address);
    axum::serve(listener, app).await?;

    Ok(())
}
