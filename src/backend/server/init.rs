/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server:
 * picking a store, building the application state and configuring routes.
 *
 * # Initialization Process
 *
 * 1. Connect to PostgreSQL when `DATABASE_URL` is set, and run migrations
 * 2. Fall back to the in-memory store when there is no database
 * 3. Build `AppState` (token keys, rate limiters)
 * 4. Create the router with all routes and middleware
 */

use axum::Router;

use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::AppState;
use crate::backend::store::Repositories;

/// Create and configure the Axum application
pub async fn create_app(config: ServerConfig) -> Router<()> {
    tracing::info!("Initializing CampusConnect backend server");

    let repos = match config.database_url.as_deref() {
        Some(url) => match load_database(url).await {
            Some(pool) => Repositories::postgres(pool),
            None => {
                tracing::warn!("Database unavailable. Falling back to in-memory store.");
                Repositories::in_memory()
            }
        },
        None => {
            tracing::warn!("DATABASE_URL not set. Using in-memory store; data is lost on restart.");
            Repositories::in_memory()
        }
    };

    if config.rate_limit_enabled {
        tracing::info!("Auth rate limiting enabled");
    }

    let app_state = AppState::new(config, repos);
    let app = create_router(app_state);

    tracing::info!("Router configured");
    app
}
