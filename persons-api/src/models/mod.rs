//! Person domain types

pub mod filter;
pub mod person;

pub use filter::{Column, PersonFilter, Predicate};
pub use person::{
    CreatePersonRequest, Person, PersonDraft, PersonResponse, PersonUpdate, UpdatePersonRequest,
};
