use std::fmt::Formatter;

use derive_more::Display;
use strum_macros::EnumIter;

use crate::operator::DisplayFields;

#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Display, EnumIter)]
pub enum JoinType {
    #[display(fmt = "Inner")]
    Inner,
    #[display(fmt = "Left")]
    Left,
    #[display(fmt = "Right")]
    Right,
    #[display(fmt = "Full")]
    Full,
}

/// Logical join operator. Children of the owning expression are
/// `[left, right, predicate]`.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct Join {
    join_type: JoinType,
}

impl Join {
    pub fn new(join_type: JoinType) -> Self {
        Self { join_type }
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }
}

impl DisplayFields for Join {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("")
            .field("join_type", &self.join_type)
            .finish()
    }
}

/// Physical nested loop join, any join type. Same child shape as [`Join`].
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct NestedLoopJoin {
    join_type: JoinType,
}

impl NestedLoopJoin {
    pub fn new(join_type: JoinType) -> Self {
        Self { join_type }
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }
}

impl DisplayFields for NestedLoopJoin {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("")
            .field("join_type", &self.join_type)
            .finish()
    }
}

/// Physical hash join, any join type. Same child shape as [`Join`].
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct HashJoin {
    join_type: JoinType,
}

impl HashJoin {
    pub fn new(join_type: JoinType) -> Self {
        Self { join_type }
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }
}

impl DisplayFields for HashJoin {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("")
            .field("join_type", &self.join_type)
            .finish()
    }
}
