//! Storage abstraction for actor and film records
//!
//! The store is handed to the router explicitly, so every test and every
//! server instance owns its own handle. [`MemoryStore`] is the default;
//! [`PostgresStore`] is available with the `postgres` feature.

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::MemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;

use async_trait::async_trait;
use std::fmt::Debug;

use crate::models::{Actor, ActorUpdate, Film, FilmUpdate, NewActor, NewFilm};

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),
}

/// Storage backend for the casting agency
///
/// Implementations must be thread-safe and support concurrent access.
#[async_trait]
pub trait CastingStore: Send + Sync + Debug {
    /// Short name of the backend, shown on the status page
    fn backend(&self) -> &'static str;

    // =========================================================================
    // Films
    // =========================================================================

    async fn list_films(&self) -> Result<Vec<Film>, StorageError>;

    async fn get_film(&self, id: i64) -> Result<Option<Film>, StorageError>;

    /// Insert a film and return it with its assigned id
    async fn insert_film(&self, film: NewFilm) -> Result<Film, StorageError>;

    /// Apply `update`; `None` when the film does not exist
    async fn update_film(&self, id: i64, update: FilmUpdate) -> Result<Option<Film>, StorageError>;

    /// Remove a film and its casting; `false` when it did not exist
    async fn delete_film(&self, id: i64) -> Result<bool, StorageError>;

    // =========================================================================
    // Actors
    // =========================================================================

    async fn list_actors(&self) -> Result<Vec<Actor>, StorageError>;

    async fn get_actor(&self, id: i64) -> Result<Option<Actor>, StorageError>;

    async fn insert_actor(&self, actor: NewActor) -> Result<Actor, StorageError>;

    async fn update_actor(&self, id: i64, update: ActorUpdate) -> Result<Option<Actor>, StorageError>;

    async fn delete_actor(&self, id: i64) -> Result<bool, StorageError>;

    // =========================================================================
    // Casting
    // =========================================================================

    /// Cast an actor in a film. Casting twice is not an error.
    async fn cast_actor(&self, film_id: i64, actor_id: i64) -> Result<(), StorageError>;

    /// Actors cast in a film, ordered by id
    async fn film_cast(&self, film_id: i64) -> Result<Vec<Actor>, StorageError>;
}
