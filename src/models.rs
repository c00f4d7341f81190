//! Actor and film records

use serde::{de, Deserialize, Deserializer, Serialize};

/// A stored actor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: i64,
    pub name: String,
    pub gender: String,
    pub age: i32,
}

/// A stored film
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Film {
    pub id: i64,
    pub name: String,
    /// Release date as given, e.g. "26-Nov-1942"
    pub date_of_release: String,
}

/// A film together with the actors cast in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilmWithCast {
    #[serde(flatten)]
    pub film: Film,
    pub actors: Vec<Actor>,
}

/// Request body for creating a film
#[derive(Debug, Clone, Deserialize)]
pub struct NewFilm {
    pub name: String,
    pub date_of_release: String,
}

/// Request body for creating an actor
#[derive(Debug, Clone, Deserialize)]
pub struct NewActor {
    pub name: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default, deserialize_with = "deserialize_age")]
    pub age: Option<i32>,
}

/// Partial update of a film
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilmUpdate {
    pub name: Option<String>,
    pub date_of_release: Option<String>,
}

/// Partial update of an actor
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActorUpdate {
    pub name: Option<String>,
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "deserialize_age")]
    pub age: Option<i32>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AgeInput {
    Number(i32),
    Text(String),
}

// Clients send the age either as a number or as a numeric string
fn deserialize_age<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<AgeInput>::deserialize(deserializer)? {
        None => Ok(None),
        Some(AgeInput::Number(age)) => Ok(Some(age)),
        Some(AgeInput::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("age must be a whole number, got {:?}", text))),
    }
}

fn require_text(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} must not be empty", field))
    } else {
        Ok(())
    }
}

fn require_age(age: Option<i32>) -> Result<(), String> {
    match age {
        Some(age) if age < 0 => Err("age must not be negative".to_string()),
        _ => Ok(()),
    }
}

impl NewFilm {
    pub fn validate(&self) -> Result<(), String> {
        require_text("name", &self.name)?;
        require_text("date_of_release", &self.date_of_release)
    }
}

impl NewActor {
    pub fn validate(&self) -> Result<(), String> {
        require_text("name", &self.name)?;
        require_age(self.age)
    }
}

impl FilmUpdate {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(date) = &self.date_of_release {
            require_text("date_of_release", date)?;
        }
        Ok(())
    }

    pub fn apply(self, film: &mut Film) {
        if let Some(name) = self.name {
            film.name = name;
        }
        if let Some(date) = self.date_of_release {
            film.date_of_release = date;
        }
    }
}

impl ActorUpdate {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        require_age(self.age)
    }

    pub fn apply(self, actor: &mut Actor) {
        if let Some(name) = self.name {
            actor.name = name;
        }
        if let Some(gender) = self.gender {
            actor.gender = gender;
        }
        if let Some(age) = self.age {
            actor.age = age;
        }
    }
}
