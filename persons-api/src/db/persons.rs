//! Person persistence
//!
//! Each operation runs in its own transaction: commit on success, rollback
//! when the transaction is dropped on any error path (including a failed
//! commit).

use crate::db::query::{filtered_select, SELECT_PERSONS};
use crate::models::{Person, PersonDraft, PersonFilter, PersonUpdate};
use persons_common::{Error, Result};
use sqlx::SqlitePool;

/// Relational store for person records
#[derive(Clone)]
pub struct PersonStore {
    pool: SqlitePool,
}

impl PersonStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new person and return the store-assigned id
    pub async fn create(&self, draft: &PersonDraft) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO persons (name, surname, patronymic, age, gender, nationality)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.surname)
        .bind(&draft.patronymic)
        .bind(draft.age)
        .bind(&draft.gender)
        .bind(&draft.nationality)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(id)
    }

    /// Load one person; `NotFound` when no row has this id
    pub async fn get_by_id(&self, id: i64) -> Result<Person> {
        let mut tx = self.pool.begin().await?;

        let person = sqlx::query_as::<_, Person>(&format!("{} WHERE id = ?", SELECT_PERSONS))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| not_found(id))?;

        tx.commit().await?;
        Ok(person)
    }

    /// Every person, ordered by id
    pub async fn get_all(&self) -> Result<Vec<Person>> {
        let mut tx = self.pool.begin().await?;

        let persons = sqlx::query_as::<_, Person>(&format!("{} ORDER BY id", SELECT_PERSONS))
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(persons)
    }

    /// Persons matching every predicate of `filter`, ordered by id
    pub async fn get_filtered(&self, filter: &PersonFilter) -> Result<Vec<Person>> {
        let mut builder = filtered_select(filter)?;

        let mut tx = self.pool.begin().await?;

        let persons = builder
            .build_query_as::<Person>()
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(persons)
    }

    /// Rewrite name/surname/patronymic; absent fields keep their value
    ///
    /// `patronymic: Some(None)` clears the stored patronymic.
    pub async fn update(&self, update: &PersonUpdate) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE persons SET
                name = COALESCE(?, name),
                surname = COALESCE(?, surname),
                patronymic = CASE WHEN ? THEN ? ELSE patronymic END
            WHERE id = ?
            "#,
        )
        .bind(&update.name)
        .bind(&update.surname)
        .bind(update.patronymic.is_some())
        .bind(update.patronymic.as_ref().and_then(|p| p.as_deref()))
        .bind(update.id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(update.id));
        }

        tx.commit().await?;
        Ok(())
    }

    /// Remove a person; `NotFound` when no row has this id
    pub async fn delete_by_id(&self, id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM persons WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }

        tx.commit().await?;
        Ok(())
    }
}

fn not_found(id: i64) -> Error {
    Error::NotFound(format!("person with id {} not found", id))
}
