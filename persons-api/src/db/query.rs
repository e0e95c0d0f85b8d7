//! Lowering of person filters to bound-parameter SQL
//!
//! Column names come from [`Column::as_str`]; every user-supplied value is
//! passed through `push_bind`, never spliced into the query text.

use crate::models::{PersonFilter, Predicate};
use persons_common::Result;
use sqlx::{QueryBuilder, Sqlite};

/// Unconstrained select of every person column
pub const SELECT_PERSONS: &str =
    "SELECT id, name, surname, patronymic, age, gender, nationality FROM persons";

/// Build the filtered select for `filter`
///
/// Fails before touching the database when the filter is malformed.
pub fn filtered_select(filter: &PersonFilter) -> Result<QueryBuilder<'_, Sqlite>> {
    filter.validate()?;

    let mut builder = QueryBuilder::new(SELECT_PERSONS);
    builder.push(" WHERE 1=1");

    for predicate in filter.predicates() {
        push_predicate(&mut builder, predicate);
    }

    builder.push(" ORDER BY id");
    Ok(builder)
}

fn push_predicate<'a>(builder: &mut QueryBuilder<'a, Sqlite>, predicate: Predicate<'a>) {
    match predicate {
        Predicate::Equals { column, value } => {
            builder.push(" AND ").push(column.as_str()).push(" = ");
            builder.push_bind(value);
        }
        Predicate::OneOf { column, values } => {
            builder.push(" AND ").push(column.as_str()).push(" IN (");
            let mut list = builder.separated(", ");
            for value in values {
                list.push_bind(value);
            }
            list.push_unseparated(")");
        }
        Predicate::Contains { column, needle } => {
            builder.push(" AND ").push(column.as_str()).push(" LIKE ");
            builder.push_bind(format!("%{}%", needle));
        }
        Predicate::AtLeast { column, bound } => {
            builder.push(" AND ").push(column.as_str()).push(" >= ");
            builder.push_bind(bound);
        }
        Predicate::AtMost { column, bound } => {
            builder.push(" AND ").push(column.as_str()).push(" <= ");
            builder.push_bind(bound);
        }
    }
}
