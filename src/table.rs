//! Table identifiers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Fully qualified table name, `cluster.schema.table`.
///
/// Identifiers listed in a `DOWNSTREAM_DEPS` field are taken as-is, so an
/// identifier is not required to have exactly three parts.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct TableId(String);

impl TableId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Compose an identifier from its cluster, schema and table name
    pub fn from_parts(cluster: &str, schema: &str, table: &str) -> Self {
        Self(format!("{}.{}.{}", cluster, schema, table))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File stem for artifacts named after this table.
    ///
    /// Path separators and characters rejected by common filesystems are
    /// replaced with `_`. Dots are kept so `a.b.c` stays readable.
    pub fn file_stem(&self) -> String {
        let stem: String = self
            .0
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect();

        // "." and ".." would resolve to directories
        if stem.chars().all(|c| c == '.') {
            stem.replace('.', "_")
        } else {
            stem
        }
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for TableId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TableId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TableId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TableId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
