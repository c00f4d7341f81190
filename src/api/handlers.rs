//! Route handlers for actors and films

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use super::error::ApiError;
use super::AppState;
use crate::auth::Claims;
use crate::models::{ActorUpdate, FilmUpdate, FilmWithCast, NewActor, NewFilm};

type ApiResult = Result<Json<Value>, ApiError>;

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    let Json(value) = payload?;
    Ok(value)
}

fn path<T>(params: Result<Path<T>, PathRejection>) -> Result<T, ApiError> {
    let Path(value) = params?;
    Ok(value)
}

/// GET /
pub async fn greeting(State(state): State<Arc<AppState>>) -> String {
    let mut greeting = "Hello".to_string();
    if state.excited {
        greeting.push_str("!!!!!");
    }
    greeting
}

/// GET /status
pub async fn status(State(state): State<Arc<AppState>>) -> String {
    format!(
        "The value of the module path is {}\n<br>\nStore backend: {}",
        module_path!(),
        state.store.backend()
    )
}

// =============================================================================
// Films
// =============================================================================

/// GET /films
pub async fn list_films(State(state): State<Arc<AppState>>) -> ApiResult {
    let films = state.store.list_films().await?;
    Ok(Json(json!({ "success": "True", "films": films })))
}

async fn film_with_cast(state: &AppState, id: i64) -> Result<FilmWithCast, ApiError> {
    let film = state
        .store
        .get_film(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("film {}", id)))?;
    let actors = state.store.film_cast(id).await?;
    Ok(FilmWithCast { film, actors })
}

/// GET /films/{id}
pub async fn get_film(State(state): State<Arc<AppState>>, id: Result<Path<i64>, PathRejection>) -> ApiResult {
    let id = path(id)?;
    let film = film_with_cast(&state, id).await?;
    Ok(Json(json!({ "success": "True", "film": film })))
}

/// POST /film
pub async fn create_film(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    payload: Result<Json<NewFilm>, JsonRejection>,
) -> ApiResult {
    let new_film = body(payload)?;
    new_film.validate().map_err(ApiError::BadRequest)?;

    let film = state.store.insert_film(new_film).await?;
    info!(id = film.id, subject = ?claims.subject(), "Film created");
    Ok(Json(json!({ "success": "True", "film": film })))
}

/// PATCH /films/{id}
pub async fn update_film(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<FilmUpdate>, JsonRejection>,
) -> ApiResult {
    let id = path(id)?;
    let update = body(payload)?;
    update.validate().map_err(ApiError::BadRequest)?;

    let film = state
        .store
        .update_film(id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("film {}", id)))?;
    Ok(Json(json!({ "success": "True", "film": film })))
}

/// DELETE /films/{id}
pub async fn delete_film(State(state): State<Arc<AppState>>, id: Result<Path<i64>, PathRejection>) -> ApiResult {
    let id = path(id)?;
    if !state.store.delete_film(id).await? {
        return Err(ApiError::NotFound(format!("film {}", id)));
    }
    Ok(Json(json!({ "success": "True", "deleted": id })))
}

/// POST /films/{id}/actors/{actor_id}
pub async fn cast_actor(
    State(state): State<Arc<AppState>>,
    ids: Result<Path<(i64, i64)>, PathRejection>,
) -> ApiResult {
    let (film_id, actor_id) = path(ids)?;
    state.store.cast_actor(film_id, actor_id).await?;
    let film = film_with_cast(&state, film_id).await?;
    Ok(Json(json!({ "success": "True", "film": film })))
}

// =============================================================================
// Actors
// =============================================================================

/// GET /actors
pub async fn list_actors(State(state): State<Arc<AppState>>) -> ApiResult {
    let actors = state.store.list_actors().await?;
    Ok(Json(json!({ "success": "True", "actors": actors })))
}

/// GET /actors/{id}
pub async fn get_actor(State(state): State<Arc<AppState>>, id: Result<Path<i64>, PathRejection>) -> ApiResult {
    let id = path(id)?;
    let actor = state
        .store
        .get_actor(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("actor {}", id)))?;
    Ok(Json(json!({ "success": "True", "actor": actor })))
}

/// POST /actor
pub async fn create_actor(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    payload: Result<Json<NewActor>, JsonRejection>,
) -> ApiResult {
    let new_actor = body(payload)?;
    new_actor.validate().map_err(ApiError::BadRequest)?;

    let actor = state.store.insert_actor(new_actor).await?;
    info!(id = actor.id, subject = ?claims.subject(), "Actor created");
    Ok(Json(json!({ "success": "True", "actor": actor })))
}

/// PATCH /actors/{id}
pub async fn update_actor(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ActorUpdate>, JsonRejection>,
) -> ApiResult {
    let id = path(id)?;
    let update = body(payload)?;
    update.validate().map_err(ApiError::BadRequest)?;

    let actor = state
        .store
        .update_actor(id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("actor {}", id)))?;
    Ok(Json(json!({ "success": "True", "actor": actor })))
}

/// DELETE /actors/{id}
pub async fn delete_actor(State(state): State<Arc<AppState>>, id: Result<Path<i64>, PathRejection>) -> ApiResult {
    let id = path(id)?;
    if !state.store.delete_actor(id).await? {
        return Err(ApiError::NotFound(format!("actor {}", id)));
    }
    Ok(Json(json!({ "success": "True", "deleted": id })))
}
