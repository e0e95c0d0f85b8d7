//! Person orchestration
//!
//! Coordinates the enrichment clients and the store for the five person
//! operations and maps store records to their wire form.
//!
//! # Enrichment
//! At creation the three lookups run concurrently and are joined before the
//! merge, so latency is bounded by the slowest source rather than the sum.
//! Each lookup is isolated: a failure is logged and leaves its field empty
//! without affecting the other two or the creation itself.

use crate::clients::{ClientError, EnrichmentClients};
use crate::db::PersonStore;
use crate::models::{
    CreatePersonRequest, PersonDraft, PersonFilter, PersonResponse, PersonUpdate,
    UpdatePersonRequest,
};
use persons_common::{Error, Result};
use tracing::{debug, error, info, warn};

/// Values gathered from the enrichment sources
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enrichment {
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
}

impl Enrichment {
    fn apply_to(self, draft: &mut PersonDraft) {
        draft.age = self.age;
        draft.gender = self.gender;
        draft.nationality = self.nationality;
    }
}

/// Person operations over a store and three enrichment sources
#[derive(Clone)]
pub struct PersonService {
    store: PersonStore,
    clients: EnrichmentClients,
}

impl PersonService {
    pub fn new(store: PersonStore, clients: EnrichmentClients) -> Self {
        Self { store, clients }
    }

    /// Validate, enrich and persist a new person; returns the assigned id
    pub async fn create_person(&self, input: CreatePersonRequest) -> Result<i64> {
        debug!(input = ?input, "Start of person creation");

        require_non_empty("name", &input.name)?;
        require_non_empty("surname", &input.surname)?;

        let mut draft = PersonDraft::from(input);
        self.enrich(&draft.name).await.apply_to(&mut draft);

        match self.store.create(&draft).await {
            Ok(id) => {
                info!(id, "Person successfully created");
                Ok(id)
            }
            Err(e) => {
                error!(error = %e, "Store error while creating person");
                Err(e)
            }
        }
    }

    /// Query all three sources concurrently; failures become empty fields
    pub async fn enrich(&self, name: &str) -> Enrichment {
        let (age, gender, nationality) = tokio::join!(
            self.clients.age.age_by_name(name),
            self.clients.gender.gender_by_name(name),
            self.clients.nationality.nationality_by_name(name),
        );

        Enrichment {
            age: settle(self.clients.age.source(), age),
            gender: settle(self.clients.gender.source(), gender),
            nationality: settle(self.clients.nationality.source(), nationality),
        }
    }

    pub async fn get_person_by_id(&self, id: i64) -> Result<PersonResponse> {
        debug!(id, "Start of reading person");

        match self.store.get_by_id(id).await {
            Ok(person) => {
                info!(id, "Person successfully retrieved");
                Ok(person.into())
            }
            Err(e) => {
                error!(id, error = %e, "Store error while reading person");
                Err(e)
            }
        }
    }

    /// Every person, unpaginated
    pub async fn get_all_persons(&self) -> Result<Vec<PersonResponse>> {
        debug!("Start of reading all persons");

        match self.store.get_all().await {
            Ok(persons) => {
                info!(count = persons.len(), "Persons successfully retrieved");
                Ok(persons.into_iter().map(PersonResponse::from).collect())
            }
            Err(e) => {
                error!(error = %e, "Store error while reading all persons");
                Err(e)
            }
        }
    }

    /// Persons matching `filter`; predicate evaluation is left to the store
    pub async fn get_persons_filtered(&self, filter: &PersonFilter) -> Result<Vec<PersonResponse>> {
        debug!(filter = ?filter, "Start of person filtering");

        match self.store.get_filtered(filter).await {
            Ok(persons) => {
                info!(count = persons.len(), "Persons successfully filtered");
                Ok(persons.into_iter().map(PersonResponse::from).collect())
            }
            Err(e) => {
                error!(error = %e, "Store error while filtering persons");
                Err(e)
            }
        }
    }

    /// Rewrite name/surname/patronymic of an existing person; returns its id
    pub async fn update_person_by_id(&self, input: UpdatePersonRequest) -> Result<i64> {
        debug!(input = ?input, "Start of person updating");

        if let Some(name) = &input.name {
            require_non_empty("name", name)?;
        }
        if let Some(surname) = &input.surname {
            require_non_empty("surname", surname)?;
        }

        let update = PersonUpdate::from(input);
        match self.store.update(&update).await {
            Ok(()) => {
                info!(id = update.id, "Person successfully updated");
                Ok(update.id)
            }
            Err(e) => {
                error!(id = update.id, error = %e, "Store error while updating person");
                Err(e)
            }
        }
    }

    pub async fn delete_person_by_id(&self, id: i64) -> Result<()> {
        debug!(id, "Start of person deleting");

        match self.store.delete_by_id(id).await {
            Ok(()) => {
                info!(id, "Person successfully deleted");
                Ok(())
            }
            Err(e) => {
                error!(id, error = %e, "Store error while deleting person");
                Err(e)
            }
        }
    }
}

/// Turn a lookup outcome into an optional field value
fn settle<T>(source: &'static str, outcome: std::result::Result<Option<T>, ClientError>) -> Option<T> {
    match outcome {
        Ok(value) => {
            if value.is_none() {
                debug!(source, "Enrichment source had no answer");
            }
            value
        }
        Err(e) => {
            warn!(source, error = %e, "Couldn't retrieve data from enrichment source");
            None
        }
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::mock::{FixedAge, FixedGender, FixedNationality};
    use crate::db::init_database_pool;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    async fn service_with(clients: EnrichmentClients) -> PersonService {
        let pool = init_database_pool("sqlite::memory:").await.unwrap();
        PersonService::new(PersonStore::new(pool), clients)
    }

    fn answering_clients() -> EnrichmentClients {
        EnrichmentClients {
            age: Arc::new(FixedAge::answer(Some(33))),
            gender: Arc::new(FixedGender::answer(Some("male"))),
            nationality: Arc::new(FixedNationality::answer(Some("RU"))),
        }
    }

    fn failing_clients() -> EnrichmentClients {
        EnrichmentClients {
            age: Arc::new(FixedAge::failing()),
            gender: Arc::new(FixedGender::failing()),
            nationality: Arc::new(FixedNationality::failing()),
        }
    }

    fn ivan() -> CreatePersonRequest {
        CreatePersonRequest {
            name: "Ivan".to_string(),
            surname: "Zabrodin".to_string(),
            patronymic: None,
        }
    }

    #[tokio::test]
    async fn test_create_round_trip() {
        let service = service_with(answering_clients()).await;

        let id = service.create_person(ivan()).await.unwrap();
        let person = service.get_person_by_id(id).await.unwrap();

        assert_eq!(person.id, id);
        assert_eq!(person.name, "Ivan");
        assert_eq!(person.surname, "Zabrodin");
        assert_eq!(person.age, Some(33));
        assert_eq!(person.gender.as_deref(), Some("male"));
        assert_eq!(person.nationality.as_deref(), Some("RU"));
    }

    #[tokio::test]
    async fn test_create_succeeds_when_all_enrichment_fails() {
        let service = service_with(failing_clients()).await;

        let id = service.create_person(ivan()).await.unwrap();
        let person = service.get_person_by_id(id).await.unwrap();

        assert!(person.age.is_none());
        assert!(person.gender.is_none());
        assert!(person.nationality.is_none());
    }

    #[tokio::test]
    async fn test_one_failing_source_does_not_affect_others() {
        let service = service_with(EnrichmentClients {
            age: Arc::new(FixedAge::answer(Some(27))),
            gender: Arc::new(FixedGender::failing()),
            nationality: Arc::new(FixedNationality::answer(Some("KZ"))),
        })
        .await;

        let enrichment = service.enrich("Aigerim").await;
        assert_eq!(
            enrichment,
            Enrichment {
                age: Some(27),
                gender: None,
                nationality: Some("KZ".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_lookups_run_concurrently() {
        let delay = Duration::from_millis(300);
        let service = service_with(EnrichmentClients {
            age: Arc::new(FixedAge::answer(Some(40)).delayed(delay)),
            gender: Arc::new(FixedGender::answer(Some("female")).delayed(delay)),
            nationality: Arc::new(FixedNationality::answer(Some("BY")).delayed(delay)),
        })
        .await;

        let start = Instant::now();
        service.enrich("Olga").await;
        let elapsed = start.elapsed();

        assert!(
            elapsed < delay * 2,
            "Lookups should overlap, took {}ms",
            elapsed.as_millis()
        );
    }

    #[tokio::test]
    async fn test_create_requires_name_and_surname() {
        let service = service_with(answering_clients()).await;

        let err = service
            .create_person(CreatePersonRequest {
                name: "  ".to_string(),
                surname: "Zabrodin".to_string(),
                patronymic: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = service
            .create_person(CreatePersonRequest {
                name: "Ivan".to_string(),
                surname: String::new(),
                patronymic: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        assert!(service.get_all_persons().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_keeps_enrichment() {
        let service = service_with(answering_clients()).await;
        let id = service.create_person(ivan()).await.unwrap();

        let updated = service
            .update_person_by_id(UpdatePersonRequest {
                id,
                name: Some("Petr".to_string()),
                surname: None,
                patronymic: Some(Some("Ivanovich".to_string())),
            })
            .await
            .unwrap();
        assert_eq!(updated, id);

        let person = service.get_person_by_id(id).await.unwrap();
        assert_eq!(person.name, "Petr");
        assert_eq!(person.surname, "Zabrodin");
        assert_eq!(person.patronymic.as_deref(), Some("Ivanovich"));
        assert_eq!(person.age, Some(33));
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let service = service_with(answering_clients()).await;

        let err = service
            .update_person_by_id(UpdatePersonRequest {
                id: 999999,
                name: Some("Ivan".to_string()),
                surname: None,
                patronymic: None,
            })
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_then_read_is_not_found() {
        let service = service_with(answering_clients()).await;
        let id = service.create_person(ivan()).await.unwrap();

        service.delete_person_by_id(id).await.unwrap();

        assert!(service.get_person_by_id(id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_unconstrained_filter_equals_get_all() {
        let service = service_with(answering_clients()).await;
        for name in ["Ivan", "Anna", "Boris"] {
            service
                .create_person(CreatePersonRequest {
                    name: name.to_string(),
                    surname: "Test".to_string(),
                    patronymic: None,
                })
                .await
                .unwrap();
        }

        let all = service.get_all_persons().await.unwrap();
        let filtered = service
            .get_persons_filtered(&PersonFilter::default())
            .await
            .unwrap();
        assert_eq!(all, filtered);
        assert_eq!(all.len(), 3);
    }
}
