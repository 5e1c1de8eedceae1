//! Configuration loaded from `dynexpr.toml`.
//!
//! ```toml
//! log_filter = "dynexpr=debug"
//!
//! [sort]
//! numeric_columns = ["sequence", "rank"]
//!
//! [search]
//! in_list_fields = ["District"]
//! exact_fields = ["channelId", "status"]
//!
//! [users]
//! default_page_size = 20
//! ```

use crate::error::{DynexprError, DynexprResult};
use crate::expression::{MatchKind, StrategyTable};
use crate::table::{DEFAULT_NUMERIC_COLUMNS, TableSorter};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = "dynexpr.toml";

/// Main configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DynexprConfig {
    /// `tracing` filter directive, overridden by `RUST_LOG`.
    pub log_filter: String,
    pub sort: SortConfig,
    pub search: SearchConfig,
    pub users: UsersConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SortConfig {
    /// Columns compared as integers.
    pub numeric_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Fields holding comma separated lists, matched with `in (...)`.
    pub in_list_fields: Vec<String>,
    /// Fields matched by equality instead of `contains`.
    pub exact_fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UsersConfig {
    pub default_page_size: usize,
}

impl Default for DynexprConfig {
    fn default() -> Self {
        Self {
            log_filter: "dynexpr=info".to_string(),
            sort: SortConfig::default(),
            search: SearchConfig::default(),
            users: UsersConfig::default(),
        }
    }
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            numeric_columns: DEFAULT_NUMERIC_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            in_list_fields: vec!["District".to_string()],
            exact_fields: vec!["channelId".to_string()],
        }
    }
}

impl Default for UsersConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
        }
    }
}

impl DynexprConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> DynexprResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or from the first default location that exists.
    ///
    /// An explicit path must exist. Without one, `./dynexpr.toml` and then
    /// `<config dir>/dynexpr/config.toml` are tried; if neither exists the
    /// defaults are used.
    pub fn load(path: Option<&Path>) -> DynexprResult<Self> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_locations().into_iter().find(|p| p.exists()),
        };

        match path {
            Some(p) => {
                tracing::debug!(path = %p.display(), "loading config");
                let content = std::fs::read_to_string(&p).map_err(|e| {
                    DynexprError::Config(format!("cannot read {}: {}", p.display(), e))
                })?;
                Self::from_toml_str(&content)
            }
            None => Ok(Self::default()),
        }
    }

    fn default_locations() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("dynexpr").join("config.toml"));
        }
        paths
    }

    fn validate(&self) -> DynexprResult<()> {
        if self.users.default_page_size == 0 {
            return Err(DynexprError::Config(
                "users.default_page_size must be at least 1".to_string(),
            ));
        }
        if let Some(field) = self
            .search
            .in_list_fields
            .iter()
            .find(|f| self.search.exact_fields.contains(f))
        {
            return Err(DynexprError::Config(format!(
                "search field '{}' is both in-list and exact",
                field
            )));
        }
        Ok(())
    }

    /// Sorter with the configured numeric columns.
    pub fn sorter(&self) -> TableSorter {
        TableSorter::with_numeric_columns(self.sort.numeric_columns.iter().cloned())
    }

    /// Search strategy table with the configured field kinds.
    pub fn strategy_table(&self) -> StrategyTable {
        let mut table = StrategyTable::empty();
        for field in &self.search.in_list_fields {
            table.set(field.clone(), MatchKind::InList);
        }
        for field in &self.search.exact_fields {
            table.set(field.clone(), MatchKind::Exact);
        }
        table
    }
}
