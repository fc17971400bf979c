//! Relational and scalar operators.
//!
//! Operators are classified into logical and physical relational operators
//! plus scalar operators, each a closed enum with one payload struct per
//! kind. Scalar subtrees (predicates, projection target lists) are children
//! of the owning relational expression, not payload, so they participate in
//! memoization like everything else.

mod scan;
pub use scan::*;
mod projection;
pub use projection::*;
mod filter;
pub use filter::*;
mod join;
pub use join::*;
mod sort;
pub use sort::*;
mod scalar;
pub use scalar::*;
mod logical;
pub use logical::*;
mod physical;
pub use physical::*;
mod expression;
pub use expression::*;

use std::fmt::{Display, Formatter};

use derive_more::From;
use enum_as_inner::EnumAsInner;
use enum_dispatch::enum_dispatch;

use crate::memo::GroupId;

/// Field level display of an operator payload, rendered after the kind
/// name as `Kind { field: value }`.
#[enum_dispatch(LogicalOperator, PhysicalOperator, ScalarOperator)]
pub trait DisplayFields {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result;
}

/// Placeholder operator referencing an already memoized group.
///
/// Rule outputs use it to re-enter the memo without re-materializing the
/// subtree it stands for; its origin group is authoritative.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct Leaf {
    origin_group: GroupId,
}

impl Leaf {
    pub fn new(origin_group: GroupId) -> Self {
        Self { origin_group }
    }

    pub fn origin_group(&self) -> GroupId {
        self.origin_group
    }
}

impl DisplayFields for Leaf {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("")
            .field("origin_group", &self.origin_group)
            .finish()
    }
}

#[derive(Clone, Debug, Hash, Eq, PartialEq, EnumAsInner, From)]
pub enum Operator {
    Leaf(Leaf),
    Logical(LogicalOperator),
    Physical(PhysicalOperator),
    Scalar(ScalarOperator),
}

impl Operator {
    /// Kind name, used in display output and structured errors.
    pub fn name(&self) -> &str {
        match self {
            Operator::Leaf(_) => "Leaf",
            Operator::Logical(op) => op.as_ref(),
            Operator::Physical(op) => op.as_ref(),
            Operator::Scalar(op) => op.as_ref(),
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::Leaf(leaf) => {
                write!(f, "Leaf")?;
                leaf.display(f)
            }
            Operator::Logical(op) => Display::fmt(op, f),
            Operator::Physical(op) => Display::fmt(op, f),
            Operator::Scalar(op) => Display::fmt(op, f),
        }
    }
}
