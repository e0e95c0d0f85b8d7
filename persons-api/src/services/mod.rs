//! Business logic services

pub mod person_service;

pub use person_service::{Enrichment, PersonService};
