//! Table descriptors.
//!
//! A descriptor holds the strings a query needs for one table: the
//! database-qualified name, the aliased `FROM` fragment and a qualified
//! reference per column, keyed by the upper-cased column name.
//!
//! ```rust,ignore
//! let tables = TableFactory::new(SqlConfig::new("billing").with_table_prefix("tb_"));
//! let orders = tables.make_table(TableOptions::new("tb_orders", ["id", "total"]));
//!
//! assert_eq!(orders.table(), "[billing].tb_orders");
//! assert_eq!(orders.aliased(), "[billing].tb_orders as [ORDERS]");
//! assert_eq!(orders.column("TOTAL"), Some("[billing].tb_orders.total"));
//! ```

use serde::{Deserialize, Serialize};

/// Database settings shared by every descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlConfig {
    pub database: String,
    /// Stripped from table names when deriving the default alias
    #[serde(default)]
    pub table_prefix: Option<String>,
}

impl SqlConfig {
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            table_prefix: None,
        }
    }

    pub fn with_table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = Some(prefix.into());
        self
    }
}

/// Per-table input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOptions {
    pub table: String,
    pub alias: Option<String>,
    pub columns: Vec<String>,
}

impl TableOptions {
    pub fn new<I, S>(table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            table: table.into(),
            alias: None,
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

/// Names for one table. Rebuilt on every call, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
    table: String,
    alias: String,
    aliased: String,
    columns: Vec<(String, String)>,
    raw_columns: Vec<String>,
}

impl TableDescriptor {
    /// `[database].table`
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The bare alias, e.g. `ORDERS`
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// `[database].table as [ALIAS]`
    pub fn aliased(&self) -> &str {
        &self.aliased
    }

    /// Qualified reference for a column; `name` is matched upper-cased
    pub fn column(&self, name: &str) -> Option<&str> {
        let key = name.to_uppercase();
        self.columns
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// `(UPPER_NAME, qualified reference)` pairs in first-seen order
    pub fn columns(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Column names exactly as given
    pub fn raw_columns(&self) -> &[String] {
        &self.raw_columns
    }

    /// Raw column names whose upper-cased key was already taken by an
    /// earlier column. Their reference replaced the earlier one.
    pub fn duplicate_columns(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.raw_columns
            .iter()
            .filter(|c| !seen.insert(c.to_uppercase()))
            .map(String::as_str)
            .collect()
    }
}

/// Builds descriptors for one database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableFactory {
    config: SqlConfig,
}

impl TableFactory {
    pub fn new(config: SqlConfig) -> Self {
        Self { config }
    }

    pub fn make_table(&self, options: TableOptions) -> TableDescriptor {
        let table = format!("[{}].{}", self.config.database, options.table);

        let prefix = self.config.table_prefix.as_deref().unwrap_or("");
        let alias = options
            .alias
            .unwrap_or_else(|| options.table.replacen(prefix, "", 1).to_uppercase());
        let aliased = format!("{table} as [{alias}]");

        let mut columns: Vec<(String, String)> = Vec::with_capacity(options.columns.len());
        for column in &options.columns {
            let key = column.to_uppercase();
            let reference = format!("{table}.{column}");
            match columns.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => {
                    tracing::debug!(
                        %column,
                        %key,
                        "column overwrites an earlier one after upper-casing"
                    );
                    slot.1 = reference;
                }
                None => columns.push((key, reference)),
            }
        }

        TableDescriptor {
            table,
            alias,
            aliased,
            columns,
            raw_columns: options.columns,
        }
    }
}
