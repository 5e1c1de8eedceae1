//! Post-sort filtering by fixed fields.

use crate::value::{Record, Scalar};

/// How a filter value is matched against a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Substring of the field's text (free-text fields such as usernames).
    Contains,
    /// Equality of the textual forms (categorical fields such as roles).
    Exact,
}

/// One field constraint. A falsy `expected` value constrains nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub expected: Scalar,
    pub mode: MatchMode,
}

impl FieldFilter {
    pub fn is_active(&self) -> bool {
        self.expected.is_truthy()
    }

    pub fn matches(&self, record: &Record) -> bool {
        if !self.is_active() {
            return true;
        }
        match record.get(&self.field) {
            None | Some(Scalar::Null) => false,
            Some(actual) => match self.mode {
                MatchMode::Contains => actual.to_string().contains(&self.expected.to_string()),
                MatchMode::Exact => actual.loose_eq(&self.expected),
            },
        }
    }
}

/// A set of field constraints, all of which must hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldFilters {
    filters: Vec<FieldFilter>,
}

impl FieldFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to contain `expected`, if `expected` is set.
    pub fn contains(self, field: impl Into<String>, expected: impl Into<Scalar>) -> Self {
        self.with(field, expected, MatchMode::Contains)
    }

    /// Require `field` to equal `expected`, if `expected` is set.
    pub fn exact(self, field: impl Into<String>, expected: impl Into<Scalar>) -> Self {
        self.with(field, expected, MatchMode::Exact)
    }

    pub fn with(
        mut self,
        field: impl Into<String>,
        expected: impl Into<Scalar>,
        mode: MatchMode,
    ) -> Self {
        self.filters.push(FieldFilter {
            field: field.into(),
            expected: expected.into(),
            mode,
        });
        self
    }

    /// True when no filter would constrain anything.
    pub fn is_empty(&self) -> bool {
        !self.filters.iter().any(FieldFilter::is_active)
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.filters.iter().all(|f| f.matches(record))
    }
}

/// Keep the records that satisfy every active filter, in input order.
pub fn filter_by_fields(records: &[Record], filters: &FieldFilters) -> Vec<Record> {
    if filters.is_empty() {
        return records.to_vec();
    }
    let kept: Vec<Record> = records
        .iter()
        .filter(|r| filters.matches(r))
        .cloned()
        .collect();
    tracing::debug!(before = records.len(), after = kept.len(), "filtered records");
    kept
}
