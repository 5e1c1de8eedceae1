//! Multi-field search filters with per-field match strategies.
//!
//! A single pass over the parameters; each field is matched according to a
//! [`StrategyTable`]:
//!
//! - [`MatchKind::InList`]: comma separated value, `#f in (:ids_0,:ids_1)`
//! - [`MatchKind::Exact`]: `#f = :Value{i}` (also used for any boolean value)
//! - [`MatchKind::Fuzzy`]: `contains(#f, :Value{i})`
//!
//! Fuzzy clauses are or-ed with what follows them, the others are and-ed.

use super::{ExpressionArtifact, Presence};
use crate::value::{ParamSet, Scalar};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Separator between the elements of an in-list value.
pub const IN_LIST_SEPARATOR: char = ',';

/// How a field is matched in a search filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    InList,
    Exact,
    Fuzzy,
}

impl MatchKind {
    fn joiner(self) -> &'static str {
        match self {
            MatchKind::InList | MatchKind::Exact => " and ",
            MatchKind::Fuzzy => " or ",
        }
    }
}

/// Field name -> match kind. Unlisted fields are fuzzy unless their value is boolean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyTable {
    fields: HashMap<String, MatchKind>,
}

impl Default for StrategyTable {
    /// `District` is an in-list field, `channelId` an exact one.
    fn default() -> Self {
        Self::empty()
            .with("District", MatchKind::InList)
            .with("channelId", MatchKind::Exact)
    }
}

impl StrategyTable {
    /// A table with no field overrides.
    pub fn empty() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    pub fn with(mut self, field: impl Into<String>, kind: MatchKind) -> Self {
        self.set(field, kind);
        self
    }

    pub fn set(&mut self, field: impl Into<String>, kind: MatchKind) {
        self.fields.insert(field.into(), kind);
    }

    /// Resolve the match kind for one field/value pair.
    pub fn kind_for(&self, field: &str, value: &Scalar) -> MatchKind {
        match self.fields.get(field) {
            Some(MatchKind::InList) => MatchKind::InList,
            Some(MatchKind::Exact) => MatchKind::Exact,
            _ if value.is_bool() => MatchKind::Exact,
            _ => MatchKind::Fuzzy,
        }
    }
}

/// Search filter using the default [`StrategyTable`].
///
/// # Example
///
/// ```
/// use dynexpr::{ParamSet, build_fuzzy_or_exact_filter_expression};
///
/// let params = ParamSet::new().with("District", "A,B,C");
/// let filter = build_fuzzy_or_exact_filter_expression(&params).unwrap();
/// assert_eq!(filter.expression, "#District in (:ids_0,:ids_1,:ids_2)");
/// ```
pub fn build_fuzzy_or_exact_filter_expression(params: &ParamSet) -> Option<ExpressionArtifact> {
    build_search_expression(params, &StrategyTable::default())
}

/// Search filter with an explicit strategy table. `None` if no field qualified.
pub fn build_search_expression(
    params: &ParamSet,
    table: &StrategyTable,
) -> Option<ExpressionArtifact> {
    let mut artifact = ExpressionArtifact::default();
    let mut clauses: Vec<(String, MatchKind)> = Vec::new();
    let mut list_index = 0usize;

    for (index, (field, value)) in params.iter().enumerate() {
        if !Presence::Search.admits(value) {
            continue;
        }
        let name = format!("#{}", field);
        let kind = table.kind_for(field, value);

        let clause = match kind {
            MatchKind::InList => {
                let text = value.to_string();
                let mut placeholders: Vec<String> = Vec::new();
                for item in text.split(IN_LIST_SEPARATOR) {
                    let placeholder = format!(":ids_{}", list_index);
                    list_index += 1;
                    artifact.bind_value(placeholder.clone(), Scalar::from(item));
                    placeholders.push(placeholder);
                }
                format!("{} in ({})", name, placeholders.join(","))
            }
            MatchKind::Exact => {
                let placeholder = format!(":Value{}", index);
                artifact.bind_value(placeholder.clone(), value.clone());
                format!("{} = {}", name, placeholder)
            }
            MatchKind::Fuzzy => {
                let placeholder = format!(":Value{}", index);
                artifact.bind_value(placeholder.clone(), value.clone());
                format!("contains({}, {})", name, placeholder)
            }
        };

        artifact.bind_name(name, field);
        clauses.push((clause, kind));
    }

    if clauses.is_empty() {
        return None;
    }

    let last = clauses.len() - 1;
    let mut expression = String::new();
    for (i, (clause, kind)) in clauses.iter().enumerate() {
        expression.push_str(clause);
        if i < last {
            expression.push_str(kind.joiner());
        }
    }

    artifact.expression = expression;
    tracing::debug!(expression = %artifact.expression, "built search expression");
    Some(artifact)
}
