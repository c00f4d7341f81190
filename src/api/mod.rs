//! HTTP API for the casting agency
//!
//! ## Endpoints
//!
//! - `GET /` - Greeting
//! - `GET /status` - Service status
//! - `GET /films`, `GET /films/{id}` - `get:film`
//! - `POST /film` - `post:film`
//! - `PATCH /films/{id}` - `patch:film`
//! - `DELETE /films/{id}` - `delete:film`
//! - `POST /films/{id}/actors/{actor_id}` - `patch:film`
//! - `GET /actors`, `GET /actors/{id}` - `get:actor`
//! - `POST /actor` - `post:actor`
//! - `PATCH /actors/{id}` - `patch:actor`
//! - `DELETE /actors/{id}` - `delete:actor`

pub mod error;
pub mod handlers;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{permissions, Authorizer, RequirePermission};
use crate::storage::CastingStore;

pub use error::ApiError;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CastingStore>,
    pub authorizer: Arc<Authorizer>,
    /// Makes the greeting enthusiastic
    pub excited: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn CastingStore>, authorizer: Arc<Authorizer>) -> Self {
        Self {
            store,
            authorizer,
            excited: false,
        }
    }

    pub fn with_excited(mut self, excited: bool) -> Self {
        self.excited = excited;
        self
    }

    fn require(&self, permission: &str) -> RequirePermission {
        RequirePermission::new(self.authorizer.clone(), permission)
    }
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::greeting))
        .route("/status", get(handlers::status))
        // Films
        .route(
            "/films",
            get(handlers::list_films).route_layer(state.require(permissions::GET_FILM)),
        )
        .route(
            "/films/{id}",
            get(handlers::get_film).route_layer(state.require(permissions::GET_FILM)),
        )
        .route(
            "/films/{id}",
            patch(handlers::update_film).route_layer(state.require(permissions::PATCH_FILM)),
        )
        .route(
            "/films/{id}",
            delete(handlers::delete_film).route_layer(state.require(permissions::DELETE_FILM)),
        )
        .route(
            "/films/{id}/actors/{actor_id}",
            post(handlers::cast_actor).route_layer(state.require(permissions::PATCH_FILM)),
        )
        .route(
            "/film",
            post(handlers::create_film).route_layer(state.require(permissions::POST_FILM)),
        )
        // Actors
        .route(
            "/actors",
            get(handlers::list_actors).route_layer(state.require(permissions::GET_ACTOR)),
        )
        .route(
            "/actors/{id}",
            get(handlers::get_actor).route_layer(state.require(permissions::GET_ACTOR)),
        )
        .route(
            "/actors/{id}",
            patch(handlers::update_actor).route_layer(state.require(permissions::PATCH_ACTOR)),
        )
        .route(
            "/actors/{id}",
            delete(handlers::delete_actor).route_layer(state.require(permissions::DELETE_ACTOR)),
        )
        .route(
            "/actor",
            post(handlers::create_actor).route_layer(state.require(permissions::POST_ACTOR)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
