//! Scan filters from exact and fuzzy parameter sets.

use super::{ExpressionArtifact, Presence};
use crate::value::ParamSet;

/// Whether fuzzy clauses may stand on their own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FuzzyGate {
    /// No exact clause means no filter at all, fuzzy clauses are dropped.
    ///
    /// This is what existing scan callers rely on.
    #[default]
    RequireExact,
    /// Fuzzy clauses form a filter even without exact clauses.
    Independent,
}

/// Exact + fuzzy scan filter, with the [`FuzzyGate::RequireExact`] behaviour.
///
/// `params` become `#k = :Value{i}` clauses, `fuzzy_params` become a
/// parenthesized `contains(#k, :val{i})` group. Returns `None` when `params`
/// yields no clause, whatever `fuzzy_params` holds.
pub fn build_exact_filter_expression(
    params: &ParamSet,
    fuzzy_params: &ParamSet,
) -> Option<ExpressionArtifact> {
    build_filter_expression(params, fuzzy_params, FuzzyGate::RequireExact)
}

/// Exact + fuzzy scan filter with an explicit [`FuzzyGate`].
pub fn build_filter_expression(
    params: &ParamSet,
    fuzzy_params: &ParamSet,
    gate: FuzzyGate,
) -> Option<ExpressionArtifact> {
    let mut artifact = ExpressionArtifact::default();

    let mut exact: Vec<String> = Vec::new();
    for (index, (field, value)) in params.iter().enumerate() {
        if !Presence::Filter.admits(value) {
            continue;
        }
        let name = format!("#{}", field);
        let placeholder = format!(":Value{}", index);
        exact.push(format!("{} = {}", name, placeholder));
        artifact.bind_name(name, field);
        artifact.bind_value(placeholder, value.clone());
    }

    if exact.is_empty() && gate == FuzzyGate::RequireExact {
        tracing::debug!(
            fuzzy_fields = fuzzy_params.len(),
            "no exact filter clause, skipping filter"
        );
        return None;
    }

    let mut fuzzy: Vec<String> = Vec::new();
    for (index, (field, value)) in fuzzy_params.iter().enumerate() {
        if !Presence::Filter.admits(value) {
            continue;
        }
        let name = format!("#{}", field);
        let placeholder = format!(":val{}", index);
        fuzzy.push(format!("contains({}, {})", name, placeholder));
        artifact.bind_name(name, field);
        artifact.bind_value(placeholder, value.clone());
    }

    let mut expression = exact.join(" and ");
    if !fuzzy.is_empty() {
        let group = format!("( {} )", fuzzy.join(" and "));
        if expression.is_empty() {
            expression = group;
        } else {
            expression.push_str(" and ");
            expression.push_str(&group);
        }
    }

    if expression.is_empty() {
        return None;
    }

    artifact.expression = expression;
    tracing::debug!(expression = %artifact.expression, "built filter expression");
    Some(artifact)
}
