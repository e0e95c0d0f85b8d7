//! Person filters
//!
//! A `PersonFilter` is an open set of optional predicates. Absence of a field
//! means "no constraint on this dimension"; a present empty string or zero is
//! a real constraint. The two set predicates are the only exception: an empty
//! set adds nothing.
//!
//! `predicates()` turns the filter into an ordered list of [`Predicate`]s; the
//! store lowers that list to bound-parameter SQL.

use persons_common::{Error, Result};
use serde::Serialize;
use std::collections::HashSet;

/// Most distinct values a set predicate may carry
pub const MAX_SET_VALUES: usize = 1000;

/// Filterable columns of the `persons` table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    Surname,
    Patronymic,
    Age,
    Gender,
    Nationality,
}

impl Column {
    /// SQL column name (static, never derived from user input)
    pub fn as_str(self) -> &'static str {
        match self {
            Column::Name => "name",
            Column::Surname => "surname",
            Column::Patronymic => "patronymic",
            Column::Age => "age",
            Column::Gender => "gender",
            Column::Nationality => "nationality",
        }
    }
}

/// One `AND`-combined constraint
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate<'a> {
    /// `column = value`
    Equals { column: Column, value: &'a str },
    /// `column IN (values...)`, never empty, no duplicates
    OneOf { column: Column, values: Vec<&'a str> },
    /// `column LIKE '%needle%'`
    Contains { column: Column, needle: &'a str },
    /// `column >= bound`
    AtLeast { column: Column, bound: u32 },
    /// `column <= bound`
    AtMost { column: Column, bound: u32 },
}

/// Multi-predicate query over persons
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PersonFilter {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub patronymic: Option<String>,
    /// Match any of these country codes
    pub nationalities: Vec<String>,
    /// Match any of these gender labels
    pub genders: Vec<String>,

    pub name_like: Option<String>,
    pub surname_like: Option<String>,
    pub patronymic_like: Option<String>,
    /// Inclusive lower age bound
    pub age_min: Option<u32>,
    /// Inclusive upper age bound
    pub age_max: Option<u32>,
}

impl PersonFilter {
    /// Reject predicate combinations that cannot be lowered
    pub fn validate(&self) -> Result<()> {
        let sets = [
            ("nationalities", &self.nationalities),
            ("genders", &self.genders),
        ];
        for (field, values) in sets {
            let count = distinct(values).len();
            if count > MAX_SET_VALUES {
                return Err(Error::InvalidInput(format!(
                    "{} has {} distinct values, at most {} allowed",
                    field, count, MAX_SET_VALUES
                )));
            }
        }

        if let (Some(min), Some(max)) = (self.age_min, self.age_max) {
            if min > max {
                return Err(Error::InvalidInput(format!(
                    "age_min ({}) is greater than age_max ({})",
                    min, max
                )));
            }
        }
        Ok(())
    }

    /// Predicates in fixed order: exact matches, sets, patterns, age bounds
    pub fn predicates(&self) -> Vec<Predicate<'_>> {
        let mut predicates = Vec::new();

        let exact = [
            (Column::Name, &self.name),
            (Column::Surname, &self.surname),
            (Column::Patronymic, &self.patronymic),
        ];
        for (column, value) in exact {
            if let Some(value) = value {
                predicates.push(Predicate::Equals { column, value });
            }
        }

        let sets = [
            (Column::Nationality, &self.nationalities),
            (Column::Gender, &self.genders),
        ];
        for (column, values) in sets {
            if !values.is_empty() {
                predicates.push(Predicate::OneOf {
                    column,
                    values: distinct(values),
                });
            }
        }

        let patterns = [
            (Column::Name, &self.name_like),
            (Column::Surname, &self.surname_like),
            (Column::Patronymic, &self.patronymic_like),
        ];
        for (column, needle) in patterns {
            if let Some(needle) = needle {
                predicates.push(Predicate::Contains { column, needle });
            }
        }

        if let Some(bound) = self.age_min {
            predicates.push(Predicate::AtLeast { column: Column::Age, bound });
        }
        if let Some(bound) = self.age_max {
            predicates.push(Predicate::AtMost { column: Column::Age, bound });
        }

        predicates
    }

    /// True when the filter constrains nothing
    pub fn is_unconstrained(&self) -> bool {
        self.predicates().is_empty()
    }
}

/// Values in first-seen order with repeats removed
fn distinct(values: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    values
        .iter()
        .map(String::as_str)
        .filter(|value| seen.insert(*value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_has_no_predicates() {
        assert!(PersonFilter::default().is_unconstrained());
    }

    #[test]
    fn test_empty_sets_add_nothing() {
        let filter = PersonFilter {
            nationalities: vec![],
            genders: vec![],
            ..Default::default()
        };
        assert!(filter.predicates().is_empty());
    }

    #[test]
    fn test_empty_string_and_zero_are_constraints() {
        let filter = PersonFilter {
            patronymic: Some(String::new()),
            age_min: Some(0),
            ..Default::default()
        };

        assert_eq!(
            filter.predicates(),
            vec![
                Predicate::Equals { column: Column::Patronymic, value: "" },
                Predicate::AtLeast { column: Column::Age, bound: 0 },
            ]
        );
    }

    #[test]
    fn test_predicate_order_is_fixed() {
        let filter = PersonFilter {
            age_max: Some(40),
            surname_like: Some("bro".to_string()),
            nationalities: vec!["RU".to_string(), "KZ".to_string()],
            name: Some("Ivan".to_string()),
            ..Default::default()
        };

        assert_eq!(
            filter.predicates(),
            vec![
                Predicate::Equals { column: Column::Name, value: "Ivan" },
                Predicate::OneOf { column: Column::Nationality, values: vec!["RU", "KZ"] },
                Predicate::Contains { column: Column::Surname, needle: "bro" },
                Predicate::AtMost { column: Column::Age, bound: 40 },
            ]
        );
    }

    #[test]
    fn test_age_bounds_are_independent() {
        let only_min = PersonFilter { age_min: Some(18), ..Default::default() };
        assert_eq!(only_min.predicates().len(), 1);

        let both = PersonFilter { age_min: Some(18), age_max: Some(18), ..Default::default() };
        assert_eq!(both.predicates().len(), 2);
        assert!(both.validate().is_ok());
    }

    #[test]
    fn test_inverted_age_range_is_rejected() {
        let filter = PersonFilter { age_min: Some(50), age_max: Some(20), ..Default::default() };
        assert!(matches!(filter.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_set_values_are_deduplicated_in_order() {
        let filter = PersonFilter {
            genders: ["male", "female", "male", "female", "male"]
                .iter()
                .map(|g| g.to_string())
                .collect(),
            ..Default::default()
        };

        assert_eq!(
            filter.predicates(),
            vec![Predicate::OneOf { column: Column::Gender, values: vec!["male", "female"] }]
        );
    }

    #[test]
    fn test_repeated_value_counts_once_towards_limit() {
        let filter = PersonFilter {
            nationalities: vec!["RU".to_string(); MAX_SET_VALUES * 40],
            ..Default::default()
        };
        assert!(filter.validate().is_ok());
    }

    #[test]
    fn test_too_many_distinct_values_rejected() {
        let at_limit = PersonFilter {
            nationalities: (0..MAX_SET_VALUES).map(|i| format!("C{}", i)).collect(),
            ..Default::default()
        };
        assert!(at_limit.validate().is_ok());

        let over_limit = PersonFilter {
            genders: (0..=MAX_SET_VALUES).map(|i| format!("g{}", i)).collect(),
            ..Default::default()
        };
        assert!(matches!(over_limit.validate(), Err(Error::InvalidInput(_))));
    }
}
