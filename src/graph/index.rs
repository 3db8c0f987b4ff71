//! Adjacency index built from declared downstream dependencies.

use crate::table::TableId;
use ahash::AHashMap;
use std::collections::BTreeSet;

static EMPTY: BTreeSet<TableId> = BTreeSet::new();

/// Both directions of the dependency relation.
///
/// For every recorded edge `a -> b`, `b` is in `downstream_of(a)` and `a` is
/// in `upstream_of(b)`. Every table mentioned as a source or a target has an
/// entry in both maps, possibly empty. Tables are never removed.
#[derive(Debug, Default, Clone)]
pub struct EdgeIndex {
    downstream: AHashMap<TableId, BTreeSet<TableId>>,
    upstream: AHashMap<TableId, BTreeSet<TableId>>,
}

impl EdgeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from `(table, downstream deps)` pairs.
    ///
    /// A pair with no deps still registers the table as a node.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (TableId, Vec<TableId>)>,
    {
        let mut index = Self::new();
        for (table, deps) in rows {
            index.add_table(table.clone());
            for dep in deps {
                index.add_downstream_edge(table.clone(), dep);
            }
        }
        index
    }

    /// Register a table with empty neighbor sets if it is not known yet
    pub fn add_table(&mut self, table: TableId) {
        self.upstream.entry(table.clone()).or_default();
        self.downstream.entry(table).or_default();
    }

    /// Record that `target` is an immediate downstream dependency of `source`
    pub fn add_downstream_edge(&mut self, source: TableId, target: TableId) {
        self.add_table(source.clone());
        self.add_table(target.clone());

        if let Some(children) = self.downstream.get_mut(&source) {
            children.insert(target.clone());
        }
        if let Some(parents) = self.upstream.get_mut(&target) {
            parents.insert(source);
        }
    }

    /// Immediate downstream neighbors; empty for unknown tables
    pub fn downstream_of(&self, table: &str) -> &BTreeSet<TableId> {
        self.downstream.get(table).unwrap_or(&EMPTY)
    }

    /// Immediate upstream neighbors; empty for unknown tables
    pub fn upstream_of(&self, table: &str) -> &BTreeSet<TableId> {
        self.upstream.get(table).unwrap_or(&EMPTY)
    }

    pub fn contains(&self, table: &str) -> bool {
        self.downstream.contains_key(table)
    }

    /// All known tables, sorted
    pub fn tables(&self) -> Vec<&TableId> {
        let mut tables: Vec<_> = self.downstream.keys().collect();
        tables.sort();
        tables
    }

    /// Number of tables
    pub fn len(&self) -> usize {
        self.downstream.len()
    }

    pub fn is_empty(&self) -> bool {
        self.downstream.is_empty()
    }

    /// Number of distinct edges
    pub fn edge_count(&self) -> usize {
        self.downstream.values().map(BTreeSet::len).sum()
    }
}
