//! Person record and its wire representations

use serde::{Deserialize, Deserializer, Serialize};

/// Persisted person row
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Person {
    /// Store-assigned identifier, immutable after creation
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub patronymic: Option<String>,
    /// Enrichment-derived, absent when the lookup failed or had no answer
    pub age: Option<u32>,
    pub gender: Option<String>,
    /// Country code of the most probable nationality
    pub nationality: Option<String>,
}

/// Person awaiting insertion (no id yet)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonDraft {
    pub name: String,
    pub surname: String,
    pub patronymic: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
}

/// Partial rewrite of the user-supplied fields of an existing person
///
/// `None` keeps the stored value. Enrichment fields are never part of an update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonUpdate {
    pub id: i64,
    pub name: Option<String>,
    pub surname: Option<String>,
    /// `Some(None)` clears the stored patronymic
    pub patronymic: Option<Option<String>>,
}

/// Body of `POST /persons`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePersonRequest {
    pub name: String,
    pub surname: String,
    #[serde(default)]
    pub patronymic: Option<String>,
}

/// Body of `PUT /persons`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePersonRequest {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
    /// Absent keeps the stored value, `null` clears it
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub patronymic: Option<Option<String>>,
}

/// Tell an explicit `null` (`Some(None)`) apart from a missing key (`None`)
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Person as returned to API callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonResponse {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub patronymic: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
}

impl From<CreatePersonRequest> for PersonDraft {
    fn from(request: CreatePersonRequest) -> Self {
        Self {
            name: request.name,
            surname: request.surname,
            patronymic: request.patronymic,
            ..Default::default()
        }
    }
}

impl From<UpdatePersonRequest> for PersonUpdate {
    fn from(request: UpdatePersonRequest) -> Self {
        Self {
            id: request.id,
            name: request.name,
            surname: request.surname,
            patronymic: request.patronymic,
        }
    }
}

impl From<Person> for PersonResponse {
    fn from(person: Person) -> Self {
        Self {
            id: person.id,
            name: person.name,
            surname: person.surname,
            patronymic: person.patronymic,
            age: person.age,
            gender: person.gender,
            nationality: person.nationality,
        }
    }
}
