use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::column::Column;
use crate::operator::DisplayFields;

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct SortKey {
    column: Column,
    ascending: bool,
}

impl SortKey {
    pub fn new(column: Column, ascending: bool) -> Self {
        Self { column, ascending }
    }

    pub fn column(&self) -> &Column {
        &self.column
    }

    pub fn ascending(&self) -> bool {
        self.ascending
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.column, if self.ascending { "ASC" } else { "DESC" })
    }
}

/// Ordering enforcer.
///
/// Entered into a group with the `enforced` flag by the property search: it
/// is a valid member of the equivalence class but not an alternative
/// formulation of the computation.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Sort {
    sort_keys: Vec<SortKey>,
}

impl Sort {
    pub fn new(sort_keys: Vec<SortKey>) -> Self {
        Self { sort_keys }
    }

    pub fn sort_keys(&self) -> &[SortKey] {
        &self.sort_keys
    }
}

impl DisplayFields for Sort {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("")
            .field("keys", &format_args!("[{}]", self.sort_keys.iter().format(", ")))
            .finish()
    }
}
