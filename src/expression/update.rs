//! Update expression synthesis (`set #Key0 = :Value0,...`).

use super::{ExpressionArtifact, Presence};
use crate::value::ParamSet;

/// Keyword every update expression starts with.
pub const UPDATE_KEYWORD: &str = "set";

/// Build a `set` expression assigning every present parameter.
///
/// Only `null` values are skipped: empty strings, `0` and `false` are written.
/// When nothing qualifies the expression is the bare keyword, see
/// [`ExpressionArtifact::is_noop_update`].
///
/// # Example
///
/// ```
/// use dynexpr::{ParamSet, build_update_expression};
///
/// let params = ParamSet::new().with("name", "Alice").with("age", 30);
/// let update = build_update_expression(&params);
/// assert_eq!(update.expression, "set #Key0 = :Value0,#Key1 = :Value1");
/// ```
pub fn build_update_expression(params: &ParamSet) -> ExpressionArtifact {
    let mut artifact = ExpressionArtifact::default();
    let mut assignments: Vec<String> = Vec::new();

    for (index, (field, value)) in params.iter().enumerate() {
        if !Presence::Update.admits(value) {
            continue;
        }
        let name = format!("#Key{}", index);
        let placeholder = format!(":Value{}", index);
        assignments.push(format!("{} = {}", name, placeholder));
        artifact.bind_name(name, field);
        artifact.bind_value(placeholder, value.clone());
    }

    artifact.expression = if assignments.is_empty() {
        UPDATE_KEYWORD.to_string()
    } else {
        format!("{} {}", UPDATE_KEYWORD, assignments.join(","))
    };

    tracing::debug!(expression = %artifact.expression, "built update expression");
    artifact
}
