use std::fmt::Formatter;
use std::hash::{Hash, Hasher};

use itertools::Itertools;

use crate::catalog::TableRef;
use crate::column::Column;
use crate::operator::DisplayFields;

/// Table access operator.
///
/// The optional scan predicate is the only child of the owning expression;
/// everything else a scan needs is payload.
#[derive(Clone, Debug)]
pub struct Scan {
    table: TableRef,
    columns: Vec<Column>,
}

impl Scan {
    pub fn new(table: TableRef, columns: Vec<Column>) -> Self {
        Self { table, columns }
    }

    pub fn table(&self) -> &TableRef {
        &self.table
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }
}

/// Tables compare by name; the catalog guarantees name uniqueness within
/// one compilation request.
impl PartialEq for Scan {
    fn eq(&self, other: &Self) -> bool {
        self.table.name() == other.table.name() && self.columns == other.columns
    }
}

impl Eq for Scan {}

impl Hash for Scan {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.table.name().hash(state);
        self.columns.hash(state);
    }
}

impl DisplayFields for Scan {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("")
            .field("table", &self.table.name())
            .field("columns", &format_args!("[{}]", self.columns.iter().format(", ")))
            .finish()
    }
}
