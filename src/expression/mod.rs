//! Placeholder-safe expression synthesis.
//!
//! The store's query language rejects reserved words and literal values in
//! expression strings, so every field goes through a name alias (`#Key0`,
//! `#field`) and every value through a value alias (`:Value0`, `:val0`,
//! `:ids_0`). Builders only synthesize; they never talk to the store.
//!
//! | Builder                                   | Clause shape                  | Joiner      |
//! |-------------------------------------------|-------------------------------|-------------|
//! | [`build_update_expression`]               | `#Key{i} = :Value{i}`         | `,`         |
//! | [`build_exact_filter_expression`]         | `#k = :Value{i}`              | ` and `     |
//! |                                           | `contains(#k, :val{i})`       | ` and `     |
//! | [`build_fuzzy_or_exact_filter_expression`]| per [`MatchKind`]             | per clause  |
//!
//! Alias indices are the key's position in the whole [`ParamSet`](crate::ParamSet), skipped
//! keys included.

mod filter;
mod search;
mod update;

pub use filter::{FuzzyGate, build_exact_filter_expression, build_filter_expression};
pub use search::{
    IN_LIST_SEPARATOR, MatchKind, StrategyTable, build_fuzzy_or_exact_filter_expression,
    build_search_expression,
};
pub use update::{UPDATE_KEYWORD, build_update_expression};

use crate::value::Scalar;
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;

/// A synthesized expression plus its placeholder maps.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExpressionArtifact {
    /// Expression text; only aliases appear in it.
    pub expression: String,
    /// Name alias -> real field name.
    pub attribute_names: BTreeMap<String, String>,
    /// Value alias -> real value.
    pub attribute_values: BTreeMap<String, Scalar>,
}

impl ExpressionArtifact {
    pub(crate) fn bind_name(&mut self, alias: impl Into<String>, field: &str) {
        self.attribute_names.insert(alias.into(), field.to_string());
    }

    pub(crate) fn bind_value(&mut self, alias: impl Into<String>, value: Scalar) {
        self.attribute_values.insert(alias.into(), value);
    }

    /// True for the bare `set` expression produced when no key qualified.
    ///
    /// Sending it to the store is an error there, so callers skip the update.
    pub fn is_noop_update(&self) -> bool {
        self.attribute_names.is_empty() && self.expression.trim() == UPDATE_KEYWORD
    }

    /// Request fragment for an update call.
    pub fn to_update_input(&self) -> Value {
        json!({
            "UpdateExpression": self.expression,
            "ExpressionAttributeNames": self.attribute_names,
            "ExpressionAttributeValues": self.attribute_values,
        })
    }

    /// Request fragment for a scan/query call.
    pub fn to_filter_input(&self) -> Value {
        json!({
            "FilterExpression": self.expression,
            "ExpressionAttributeNames": self.attribute_names,
            "ExpressionAttributeValues": self.attribute_values,
        })
    }
}

/// Which values take part in a synthesized expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Presence {
    /// Anything but null: truthy, or loosely equal to `""` (`""`, `0`, `false`).
    Update,
    /// Truthy, numerically zero, or any boolean.
    Filter,
    /// Truthy or numerically zero.
    Search,
}

impl Presence {
    pub(crate) fn admits(self, value: &Scalar) -> bool {
        match self {
            Presence::Update => {
                value.is_truthy()
                    || matches!(value, Scalar::String(_) | Scalar::Bool(_))
                    || value.is_zero()
            }
            Presence::Filter => value.is_truthy() || value.is_zero() || value.is_bool(),
            Presence::Search => value.is_truthy() || value.is_zero(),
        }
    }
}
