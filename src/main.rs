//! Course Catalog Backend
//!
//! A REST backend exposing CRUD and query operations over two related
//! document collections (courses and videos) with SQLite persistence.

mod api;
mod config;
mod db;
mod errors;
mod models;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Course Catalog Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Create application state
    let state = AppState { repo };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(greeting))
        // Courses
        .route("/courses", post(api::create_course))
        .route("/courses", get(api::list_courses))
        .route("/courses", delete(api::delete_courses))
        .route("/courses/{id}", get(api::get_course))
        .route("/courses/{id}", put(api::update_course))
        .route("/courses/{id}", delete(api::delete_course))
        // Fixed queries
        .route("/searchWithRegex", get(api::search_with_regex))
        .route("/selectSomeFields", get(api::select_some_fields))
        .route("/searchAndOrder", get(api::search_and_order))
        .route("/countRegisters", get(api::count_registers))
        .route("/limitAndSkip", get(api::limit_and_skip))
        // Videos
        .route("/videos", post(api::create_video))
        .route("/videos", get(api::list_videos))
        .route("/videos/{id}", delete(api::delete_video))
        .route("/videos/{id}/tags", put(api::update_video_tags))
        .route("/videos/{id}/tags/{tag_id}", delete(api::delete_video_tag))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Greeting endpoint.
async fn greeting() -> &'static str {
    "Hola Mundo"
}
