//! Catalog collaborator interface.
//!
//! The binder resolves table references against a [`Catalog`] when it
//! builds scan operators; this crate only consumes the resolved
//! [`TableRef`]s. The trait is synchronous: the memo and the transformer
//! are pure in-memory algorithms with no suspension points.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use crate::column::Schema;

pub trait TableProvider: Debug {
    fn name(&self) -> &str;

    fn schema(&self) -> &Schema;
}

pub type TableRef = Arc<dyn TableProvider>;

pub trait Catalog: Debug {
    fn table(&self, name: &str) -> Option<TableRef>;
}

/// Table backed by nothing but its schema. Enough for plan compilation,
/// which never touches data.
#[derive(Debug)]
pub struct MemoryTable {
    name: String,
    schema: Schema,
}

impl MemoryTable {
    pub fn new<S: Into<String>>(name: S, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

impl TableProvider for MemoryTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }
}

#[derive(Debug, Default)]
pub struct MemoryCatalog {
    tables: HashMap<String, TableRef>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_table(&mut self, table: TableRef) {
        self.tables.insert(table.name().to_string(), table);
    }
}

impl Catalog for MemoryCatalog {
    fn table(&self, name: &str) -> Option<TableRef> {
        self.tables.get(name).cloned()
    }
}
