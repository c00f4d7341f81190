//! In-memory storage backend
//!
//! Default storage implementation. Data is lost on restart.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::RwLock;
use tracing::info;

use super::{CastingStore, StorageError};
use crate::models::{Actor, ActorUpdate, Film, FilmUpdate, NewActor, NewFilm};

#[derive(Debug, Default)]
struct Tables {
    films: BTreeMap<i64, Film>,
    actors: BTreeMap<i64, Actor>,
    // (film_id, actor_id)
    casting: BTreeSet<(i64, i64)>,
    last_film_id: i64,
    last_actor_id: i64,
}

/// In-memory casting store
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CastingStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list_films(&self) -> Result<Vec<Film>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables.films.values().cloned().collect())
    }

    async fn get_film(&self, id: i64) -> Result<Option<Film>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables.films.get(&id).cloned())
    }

    async fn insert_film(&self, film: NewFilm) -> Result<Film, StorageError> {
        let mut tables = self.tables.write().await;
        tables.last_film_id += 1;
        let film = Film {
            id: tables.last_film_id,
            name: film.name,
            date_of_release: film.date_of_release,
        };
        info!(id = film.id, name = %film.name, "Inserted film");
        tables.films.insert(film.id, film.clone());
        Ok(film)
    }

    async fn update_film(&self, id: i64, update: FilmUpdate) -> Result<Option<Film>, StorageError> {
        let mut tables = self.tables.write().await;
        Ok(tables.films.get_mut(&id).map(|film| {
            update.apply(film);
            info!(id, "Updated film");
            film.clone()
        }))
    }

    async fn delete_film(&self, id: i64) -> Result<bool, StorageError> {
        let mut tables = self.tables.write().await;
        let removed = tables.films.remove(&id).is_some();
        if removed {
            tables.casting.retain(|(film_id, _)| *film_id != id);
            info!(id, "Deleted film");
        }
        Ok(removed)
    }

    async fn list_actors(&self) -> Result<Vec<Actor>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables.actors.values().cloned().collect())
    }

    async fn get_actor(&self, id: i64) -> Result<Option<Actor>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables.actors.get(&id).cloned())
    }

    async fn insert_actor(&self, actor: NewActor) -> Result<Actor, StorageError> {
        let mut tables = self.tables.write().await;
        tables.last_actor_id += 1;
        let actor = Actor {
            id: tables.last_actor_id,
            name: actor.name,
            gender: actor.gender,
            age: actor.age.unwrap_or(0),
        };
        info!(id = actor.id, name = %actor.name, "Inserted actor");
        tables.actors.insert(actor.id, actor.clone());
        Ok(actor)
    }

    async fn update_actor(&self, id: i64, update: ActorUpdate) -> Result<Option<Actor>, StorageError> {
        let mut tables = self.tables.write().await;
        Ok(tables.actors.get_mut(&id).map(|actor| {
            update.apply(actor);
            info!(id, "Updated actor");
            actor.clone()
        }))
    }

    async fn delete_actor(&self, id: i64) -> Result<bool, StorageError> {
        let mut tables = self.tables.write().await;
        let removed = tables.actors.remove(&id).is_some();
        if removed {
            tables.casting.retain(|(_, actor_id)| *actor_id != id);
            info!(id, "Deleted actor");
        }
        Ok(removed)
    }

    async fn cast_actor(&self, film_id: i64, actor_id: i64) -> Result<(), StorageError> {
        let mut tables = self.tables.write().await;
        if !tables.films.contains_key(&film_id) {
            return Err(StorageError::NotFound(format!("film {}", film_id)));
        }
        if !tables.actors.contains_key(&actor_id) {
            return Err(StorageError::NotFound(format!("actor {}", actor_id)));
        }
        if tables.casting.insert((film_id, actor_id)) {
            info!(film_id, actor_id, "Cast actor in film");
        }
        Ok(())
    }

    async fn film_cast(&self, film_id: i64) -> Result<Vec<Actor>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables
            .casting
            .range((film_id, i64::MIN)..=(film_id, i64::MAX))
            .filter_map(|(_, actor_id)| tables.actors.get(actor_id).cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_film(name: &str) -> NewFilm {
        NewFilm { name: name.to_string(), date_of_release: "26-Nov-1942".to_string() }
    }

    fn new_actor(name: &str) -> NewActor {
        NewActor { name: name.to_string(), gender: "Female".to_string(), age: Some(27) }
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let store = MemoryStore::new();
        let first = store.insert_film(new_film("Casablanca")).await.unwrap();
        let second = store.insert_film(new_film("Notorious")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.list_films().await.unwrap(), vec![first, second]);
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let store = MemoryStore::new();
        let film = store.insert_film(new_film("Casablanca")).await.unwrap();
        assert!(store.delete_film(film.id).await.unwrap());
        assert!(!store.delete_film(film.id).await.unwrap());

        let next = store.insert_film(new_film("Notorious")).await.unwrap();
        assert_eq!(next.id, 2);
    }

    #[tokio::test]
    async fn test_actor_age_defaults_to_zero() {
        let store = MemoryStore::new();
        let actor = store
            .insert_actor(NewActor { name: "Ingrid Bergman".to_string(), gender: String::new(), age: None })
            .await
            .unwrap();
        assert_eq!(actor.age, 0);
    }

    #[tokio::test]
    async fn test_update_missing_film() {
        let store = MemoryStore::new();
        let updated = store.update_film(42, FilmUpdate::default()).await.unwrap();
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn test_update_actor() {
        let store = MemoryStore::new();
        let actor = store.insert_actor(new_actor("Ingrid Bergman")).await.unwrap();
        let update = ActorUpdate { age: Some(28), ..ActorUpdate::default() };

        let updated = store.update_actor(actor.id, update).await.unwrap().unwrap();
        assert_eq!(updated.age, 28);
        assert_eq!(updated.name, "Ingrid Bergman");
    }

    #[tokio::test]
    async fn test_casting() {
        let store = MemoryStore::new();
        let film = store.insert_film(new_film("Casablanca")).await.unwrap();
        let ingrid = store.insert_actor(new_actor("Ingrid Bergman")).await.unwrap();
        let humphrey = store.insert_actor(new_actor("Humphrey Bogart")).await.unwrap();

        store.cast_actor(film.id, humphrey.id).await.unwrap();
        store.cast_actor(film.id, ingrid.id).await.unwrap();
        store.cast_actor(film.id, ingrid.id).await.unwrap();

        let cast = store.film_cast(film.id).await.unwrap();
        assert_eq!(cast, vec![ingrid.clone(), humphrey]);

        assert!(store.delete_actor(ingrid.id).await.unwrap());
        assert_eq!(store.film_cast(film.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_cast_unknown_records() {
        let store = MemoryStore::new();
        let film = store.insert_film(new_film("Casablanca")).await.unwrap();

        assert!(matches!(store.cast_actor(film.id, 9).await, Err(StorageError::NotFound(_))));
        assert!(matches!(store.cast_actor(9, 1).await, Err(StorageError::NotFound(_))));
    }
}
