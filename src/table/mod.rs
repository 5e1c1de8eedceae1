//! Table shaping for records already fetched from the store.
//!
//! [`sort_records`] orders a page by one column with type-aware comparison
//! and null bucketing; [`filter_by_fields`] then narrows it by fixed fields.
//! Neither touches its input.

mod filter;
mod sort;

pub use filter::{FieldFilter, FieldFilters, MatchMode, filter_by_fields};
pub use sort::{
    ColumnKind, DEFAULT_NUMERIC_COLUMNS, SortOrder, SortSpec, TableSorter, parse_int,
    parse_timestamp, sort_by_modified_or_created, sort_records,
};
