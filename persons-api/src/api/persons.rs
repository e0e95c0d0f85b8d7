//! Person endpoints
//!
//! Thin adapters between HTTP and [`PersonService`](crate::services::PersonService):
//! parse the request, call one service operation, shape the response.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::Deserialize;
use tracing::debug;

use super::pagination::{paginate, PageRequest, Paginated};
use crate::error::{ApiError, ApiResult};
use crate::models::{CreatePersonRequest, PersonFilter, PersonResponse, UpdatePersonRequest};
use crate::AppState;

/// Query parameters for `GET /api/persons`
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub page_size: Option<String>,
}

impl PageParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_raw(self.page.as_deref(), self.page_size.as_deref())
    }
}

/// Query parameters for `GET /api/persons/filtered`
///
/// Everything arrives as text so that empty values can be told apart from
/// malformed ones.
#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub patronymic: Option<String>,
    /// Comma-separated
    pub genders: Option<String>,
    /// Comma-separated
    pub nationalities: Option<String>,
    pub name_like: Option<String>,
    pub surname_like: Option<String>,
    pub patronymic_like: Option<String>,
    pub age_min: Option<String>,
    pub age_max: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

impl FilterParams {
    /// Convert to a filter, treating empty values as absent
    pub fn into_filter(self) -> ApiResult<PersonFilter> {
        Ok(PersonFilter {
            name: present(self.name),
            surname: present(self.surname),
            patronymic: present(self.patronymic),
            nationalities: split_list(self.nationalities),
            genders: split_list(self.genders),
            name_like: present(self.name_like),
            surname_like: present(self.surname_like),
            patronymic_like: present(self.patronymic_like),
            age_min: parse_age("age_min", self.age_min)?,
            age_max: parse_age("age_max", self.age_max)?,
        })
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_raw(self.page.as_deref(), self.page_size.as_deref())
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn split_list(value: Option<String>) -> Vec<String> {
    value
        .map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_age(field: &str, value: Option<String>) -> ApiResult<Option<u32>> {
    match present(value) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<u32>().map(Some).map_err(|_| {
            ApiError::BadRequest(format!("{} must be a non-negative integer, got '{}'", field, raw))
        }),
    }
}

fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::BadRequest("Failed to parse ID".to_string()))
}

fn body<T>(payload: Result<Json<T>, JsonRejection>, context: &str) -> ApiResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(format!("{}: {}", context, rejection.body_text())))
}

fn query<T>(params: Result<Query<T>, QueryRejection>) -> ApiResult<T> {
    params
        .map(|Query(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// POST /api/persons
///
/// Returns the assigned id.
pub async fn create_person(
    State(state): State<AppState>,
    payload: Result<Json<CreatePersonRequest>, JsonRejection>,
) -> ApiResult<Json<i64>> {
    let input = body(payload, "Failed to parse data for creating")?;

    let id = state
        .service
        .create_person(input)
        .await
        .map_err(ApiError::failed("Failed to create person"))?;

    Ok(Json(id))
}

/// PUT /api/persons
pub async fn update_person(
    State(state): State<AppState>,
    payload: Result<Json<UpdatePersonRequest>, JsonRejection>,
) -> ApiResult<Json<i64>> {
    let input = body(payload, "Failed to parse data for updating")?;

    let id = state
        .service
        .update_person_by_id(input)
        .await
        .map_err(ApiError::failed("Failed to update person info"))?;

    Ok(Json(id))
}

/// GET /api/persons/:id
pub async fn get_person(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<PersonResponse>> {
    let id = parse_id(&raw_id)?;

    let person = state
        .service
        .get_person_by_id(id)
        .await
        .map_err(ApiError::failed("Failed to retrieve person info"))?;

    Ok(Json(person))
}

/// DELETE /api/persons/:id
///
/// Returns the deleted id.
pub async fn delete_person(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<i64>> {
    let id = parse_id(&raw_id)?;

    state
        .service
        .delete_person_by_id(id)
        .await
        .map_err(ApiError::failed("Failed to delete person data"))?;

    Ok(Json(id))
}

/// GET /api/persons?page=&page_size=
pub async fn list_persons(
    State(state): State<AppState>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<Paginated<PersonResponse>>> {
    let page = query(params)?.page_request();

    let persons = state
        .service
        .get_all_persons()
        .await
        .map_err(ApiError::failed("Failed to retrieve persons info"))?;

    Ok(Json(paginate(persons, page)))
}

/// GET /api/persons/filtered?...
pub async fn filter_persons(
    State(state): State<AppState>,
    params: Result<Query<FilterParams>, QueryRejection>,
) -> ApiResult<Json<Paginated<PersonResponse>>> {
    let params = query(params)?;
    let page = params.page_request();
    let filter = params.into_filter()?;
    debug!(filter = ?filter, page = page.page, page_size = page.page_size, "Parsed person filter");

    let persons = state
        .service
        .get_persons_filtered(&filter)
        .await
        .map_err(ApiError::failed("Failed to retrieve persons info"))?;

    Ok(Json(paginate(persons, page)))
}
