use std::fmt::{Display, Formatter};

use enum_as_inner::EnumAsInner;
use serde::{Deserialize, Serialize};

use crate::value::DataType;

/// Stable identity of a column, preserved across operators.
///
/// Provenance tracking in the transformer compares columns by id, never by
/// name: a projection may rename a column without changing what it is.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ColumnId(pub u64);

impl Display for ColumnId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A column read directly from a base table.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct TableColumn {
    id: ColumnId,
    table_name: String,
    /// Position of the column in the base table layout.
    base_offset: usize,
    name: String,
    data_type: DataType,
}

impl TableColumn {
    pub fn new<T, S>(id: ColumnId, table_name: T, base_offset: usize, name: S, data_type: DataType) -> Self
    where
        T: Into<String>,
        S: Into<String>,
    {
        Self {
            id,
            table_name: table_name.into(),
            base_offset,
            name: name.into(),
            data_type,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn base_offset(&self) -> usize {
        self.base_offset
    }
}

/// A column computed by an expression, e.g. a projection target.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct DerivedColumn {
    id: ColumnId,
    name: String,
    data_type: DataType,
}

impl DerivedColumn {
    pub fn new<S: Into<String>>(id: ColumnId, name: S, data_type: DataType) -> Self {
        Self {
            id,
            name: name.into(),
            data_type,
        }
    }
}

#[derive(Clone, Debug, Hash, Eq, PartialEq, EnumAsInner, Serialize, Deserialize)]
pub enum Column {
    Table(TableColumn),
    Derived(DerivedColumn),
}

impl Column {
    pub fn id(&self) -> ColumnId {
        match self {
            Column::Table(c) => c.id,
            Column::Derived(c) => c.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Column::Table(c) => &c.name,
            Column::Derived(c) => &c.name,
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Column::Table(c) => c.data_type,
            Column::Derived(c) => c.data_type,
        }
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Column::Table(c) => write!(f, "{}.{}", c.table_name, c.name),
            Column::Derived(c) => write!(f, "{}", c.name),
        }
    }
}

/// Ordered column list of a table or a plan node output.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn index_of(&self, id: ColumnId) -> Option<usize> {
        self.columns.iter().position(|c| c.id() == id)
    }
}
