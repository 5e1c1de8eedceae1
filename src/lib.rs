//! # dynexpr
//!
//! Placeholder-safe expressions for a wide-column store, and table shaping
//! for the pages it returns.
//!
//! ## Quick Example
//!
//! ```rust
//! use dynexpr::prelude::*;
//!
//! let params = ParamSet::new().with("role", "admin");
//! let fuzzy = ParamSet::new().with("city", "Hong");
//!
//! let filter = build_exact_filter_expression(&params, &fuzzy).unwrap();
//! assert_eq!(filter.expression, "#role = :Value0 and ( contains(#city, :val0) )");
//! assert_eq!(filter.attribute_names["#city"], "city");
//! ```
//!
//! ## Aliases
//!
//! | Alias      | Bound to    | Produced by                      |
//! |------------|-------------|----------------------------------|
//! | `#Key{i}`  | field name  | update expressions               |
//! | `#field`   | field name  | filter and search expressions    |
//! | `:Value{i}`| value       | update, exact and search clauses |
//! | `:val{i}`  | value       | fuzzy filter clauses             |
//! | `:ids_{i}` | list item   | in-list search clauses           |

pub mod config;
pub mod error;
pub mod expression;
pub mod response;
pub mod table;
pub mod text;
pub mod users;
pub mod value;

pub use expression::{
    ExpressionArtifact, FuzzyGate, MatchKind, StrategyTable, build_exact_filter_expression,
    build_filter_expression, build_fuzzy_or_exact_filter_expression, build_search_expression,
    build_update_expression,
};
pub use table::{FieldFilters, MatchMode, SortOrder, TableSorter, filter_by_fields, sort_records};
pub use value::{ParamSet, Record, Scalar};

pub mod prelude {
    pub use crate::config::DynexprConfig;
    pub use crate::error::*;
    pub use crate::expression::*;
    pub use crate::response::ApiResponse;
    pub use crate::table::*;
    pub use crate::text::{is_chinese_name, join_list, split_list};
    pub use crate::users::{CognitoUser, UserListQuery, UserPage, list_user_page};
    pub use crate::value::*;
}
