//! Field-aware record sorting with null bucketing.

use crate::value::{Record, Scalar};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::cmp::Ordering;
use std::fmt;

/// Columns compared as integers unless configured otherwise.
pub const DEFAULT_NUMERIC_COLUMNS: &[&str] = &["sequence"];

/// Sort direction as sent by the table UI (`ascend` / `descend`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascend,
    Descend,
    /// Any other value: records keep their order, nulls still go last.
    Unordered,
}

impl From<&str> for SortOrder {
    fn from(s: &str) -> Self {
        match s {
            "ascend" => SortOrder::Ascend,
            "descend" => SortOrder::Descend,
            _ => SortOrder::Unordered,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Ascend => write!(f, "ascend"),
            SortOrder::Descend => write!(f, "descend"),
            SortOrder::Unordered => write!(f, "unordered"),
        }
    }
}

/// An explicit sort request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub column: String,
    pub order: SortOrder,
}

impl SortSpec {
    /// Both parts must be present and non-empty, otherwise there is no explicit sort.
    pub fn from_params(column: Option<&str>, order: Option<&str>) -> Option<Self> {
        match (column, order) {
            (Some(column), Some(order)) if !column.is_empty() && !order.is_empty() => Some(Self {
                column: column.to_string(),
                order: SortOrder::from(order),
            }),
            _ => None,
        }
    }
}

/// How values of a column are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Timestamp,
    Integer,
    Raw,
}

/// Sorts records by column, with a configurable numeric allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSorter {
    numeric_columns: Vec<String>,
}

impl Default for TableSorter {
    fn default() -> Self {
        Self::with_numeric_columns(DEFAULT_NUMERIC_COLUMNS.iter().copied())
    }
}

impl TableSorter {
    pub fn with_numeric_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            numeric_columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Column kind from its name: `date`/`time` anywhere (any case) wins over the
    /// numeric allow-list.
    pub fn column_kind(&self, column: &str) -> ColumnKind {
        let lower = column.to_lowercase();
        if lower.contains("date") || lower.contains("time") {
            ColumnKind::Timestamp
        } else if self.numeric_columns.iter().any(|c| c == column) {
            ColumnKind::Integer
        } else {
            ColumnKind::Raw
        }
    }

    /// Sort `records` by `column`/`order`, or return `fallback()` if either is missing.
    ///
    /// The input is never reordered; the result is a fresh copy. `fallback` only
    /// runs when there is no explicit sort.
    pub fn sort<F>(
        &self,
        records: &[Record],
        column: Option<&str>,
        order: Option<&str>,
        fallback: F,
    ) -> Vec<Record>
    where
        F: FnOnce() -> Vec<Record>,
    {
        match SortSpec::from_params(column, order) {
            Some(spec) => self.sort_by_spec(records, &spec),
            None => {
                tracing::debug!("no explicit sort, using fallback");
                fallback()
            }
        }
    }

    /// Sort by an explicit spec. Records without a truthy value go last, in input order.
    pub fn sort_by_spec(&self, records: &[Record], spec: &SortSpec) -> Vec<Record> {
        let kind = self.column_kind(&spec.column);
        tracing::debug!(column = %spec.column, order = %spec.order, ?kind, "sorting records");

        let (present, missing): (Vec<&Record>, Vec<&Record>) = records
            .iter()
            .partition(|r| r.get(&spec.column).is_some_and(Scalar::is_truthy));

        let mut keyed: Vec<(SortKey, &Record)> = present
            .into_iter()
            .map(|r| (SortKey::new(kind, &r[&spec.column]), r))
            .collect();

        if spec.order != SortOrder::Unordered {
            keyed.sort_by(|(a, _), (b, _)| a.compare(b, spec.order));
        }

        keyed
            .into_iter()
            .map(|(_, r)| r)
            .chain(missing)
            .cloned()
            .collect()
    }
}

/// Sort with the default [`TableSorter`].
///
/// # Example
///
/// ```
/// use dynexpr::{Record, Scalar, sort_records};
///
/// let rows: Vec<Record> = ["b", "", "a"]
///     .iter()
///     .map(|v| Record::from([("name".to_string(), Scalar::from(*v))]))
///     .collect();
/// let sorted = sort_records(&rows, Some("name"), Some("ascend"), || rows.clone());
/// assert_eq!(sorted[0]["name"], Scalar::from("a"));
/// assert_eq!(sorted[2]["name"], Scalar::from(""));
/// ```
pub fn sort_records<F>(
    records: &[Record],
    sort_column: Option<&str>,
    sort_type: Option<&str>,
    fallback: F,
) -> Vec<Record>
where
    F: FnOnce() -> Vec<Record>,
{
    TableSorter::default().sort(records, sort_column, sort_type, fallback)
}

/// Order by `modifiedTime`, falling back to `createdTime`.
///
/// `Descend` puts the newest first; anything else sorts oldest first. Records
/// with neither timestamp end up last.
pub fn sort_by_modified_or_created(records: &[Record], order: SortOrder) -> Vec<Record> {
    let order = match order {
        SortOrder::Descend => SortOrder::Descend,
        _ => SortOrder::Ascend,
    };
    let mut keyed: Vec<(SortKey, &Record)> = records
        .iter()
        .map(|r| {
            let stamp = ["modifiedTime", "createdTime"]
                .iter()
                .filter_map(|f| r.get(*f))
                .find(|v| v.is_truthy())
                .and_then(parse_timestamp);
            (SortKey::Ordinal(stamp), r)
        })
        .collect();
    keyed.sort_by(|(a, _), (b, _)| a.compare(b, order));
    keyed.into_iter().map(|(_, r)| r.clone()).collect()
}

/// Comparison key for one record.
#[derive(Debug)]
enum SortKey<'a> {
    /// Timestamps and integers; `None` when the value does not parse.
    Ordinal(Option<i64>),
    Raw(&'a Scalar),
}

impl<'a> SortKey<'a> {
    fn new(kind: ColumnKind, value: &'a Scalar) -> Self {
        match kind {
            ColumnKind::Timestamp => SortKey::Ordinal(parse_timestamp(value)),
            ColumnKind::Integer => SortKey::Ordinal(parse_int(value)),
            ColumnKind::Raw => SortKey::Raw(value),
        }
    }

    fn compare(&self, other: &Self, order: SortOrder) -> Ordering {
        let directed = |ord: Ordering| match order {
            SortOrder::Descend => ord.reverse(),
            _ => ord,
        };
        match (self, other) {
            // Unparseable values trail the parseable ones in either direction.
            (SortKey::Ordinal(Some(a)), SortKey::Ordinal(Some(b))) => directed(a.cmp(b)),
            (SortKey::Ordinal(Some(_)), SortKey::Ordinal(None)) => Ordering::Less,
            (SortKey::Ordinal(None), SortKey::Ordinal(Some(_))) => Ordering::Greater,
            (SortKey::Ordinal(None), SortKey::Ordinal(None)) => Ordering::Equal,
            (SortKey::Raw(a), SortKey::Raw(b)) => directed(compare_raw(a, b)),
            (SortKey::Ordinal(_), SortKey::Raw(_)) => Ordering::Less,
            (SortKey::Raw(_), SortKey::Ordinal(_)) => Ordering::Greater,
        }
    }
}

/// Total order over raw values: booleans, then numbers, then strings.
fn compare_raw(a: &Scalar, b: &Scalar) -> Ordering {
    fn rank(v: &Scalar) -> u8 {
        match v {
            Scalar::Null => 0,
            Scalar::Bool(_) => 1,
            Scalar::Int(_) | Scalar::Float(_) => 2,
            Scalar::String(_) => 3,
        }
    }

    match (a, b) {
        (Scalar::Bool(x), Scalar::Bool(y)) => x.cmp(y),
        (Scalar::Int(x), Scalar::Int(y)) => x.cmp(y),
        (Scalar::String(x), Scalar::String(y)) => x.cmp(y),
        (Scalar::Float(x), Scalar::Float(y)) => compare_floats(*x, *y),
        (Scalar::Int(x), Scalar::Float(y)) => compare_int_float(*x, *y),
        (Scalar::Float(x), Scalar::Int(y)) => compare_int_float(*y, *x).reverse(),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Numeric order with `-0.0 == 0.0`; NaNs fall back to their total order.
fn compare_floats(x: f64, y: f64) -> Ordering {
    x.partial_cmp(&y).unwrap_or_else(|| x.total_cmp(&y))
}

/// Exact comparison, with no rounding of `i` through `f64`.
fn compare_int_float(i: i64, f: f64) -> Ordering {
    // 2^63
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    if f.is_nan() {
        return (i as f64).total_cmp(&f);
    }
    if f >= LIMIT {
        return Ordering::Less;
    }
    if f < -LIMIT {
        return Ordering::Greater;
    }
    let whole = f.trunc();
    i.cmp(&(whole as i64))
        .then_with(|| 0.0_f64.partial_cmp(&(f - whole)).unwrap_or(Ordering::Equal))
}

/// Milliseconds since the epoch.
///
/// Numbers are taken as milliseconds already. Strings may be RFC 3339,
/// RFC 2822, a naive date-time (read as UTC) or a bare date, with `-` or `/`
/// between the date parts.
pub fn parse_timestamp(value: &Scalar) -> Option<i64> {
    const NAIVE_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S%.f",
        "%Y/%m/%d %H:%M",
    ];
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

    match value {
        Scalar::Int(n) => Some(*n),
        Scalar::Float(f) if f.is_finite() => Some(f.trunc() as i64),
        Scalar::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.timestamp_millis());
            }
            if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
                return Some(dt.timestamp_millis());
            }
            for format in NAIVE_FORMATS {
                if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
                    return Some(dt.and_utc().timestamp_millis());
                }
            }
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc().timestamp_millis())
        }
        _ => None,
    }
}

/// Leading integer of the value's text (`"12abc"` -> 12, `"3.9"` -> 3).
pub fn parse_int(value: &Scalar) -> Option<i64> {
    match value {
        Scalar::Int(n) => Some(*n),
        Scalar::Float(f) if f.is_finite() => Some(f.trunc() as i64),
        Scalar::String(s) => {
            let s = s.trim_start();
            let (sign, digits) = match s.as_bytes().first() {
                Some(b'-') => (-1, &s[1..]),
                Some(b'+') => (1, &s[1..]),
                _ => (1, s),
            };
            let end = digits
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(digits.len());
            digits[..end].parse::<i64>().ok().map(|n| sign * n)
        }
        _ => None,
    }
}
