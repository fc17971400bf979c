use std::fmt::{Display, Formatter};

use enum_as_inner::EnumAsInner;
use enum_dispatch::enum_dispatch;
use strum_macros::AsRefStr;

use crate::column::Column;
use crate::operator::DisplayFields;
use crate::value::Value;

#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, derive_more::Display)]
pub enum CompareType {
    #[display(fmt = "=")]
    Equal,
    #[display(fmt = "!=")]
    NotEqual,
    #[display(fmt = "<")]
    LessThan,
    #[display(fmt = "<=")]
    LessThanOrEqual,
    #[display(fmt = ">")]
    GreaterThan,
    #[display(fmt = ">=")]
    GreaterThanOrEqual,
}

#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, derive_more::Display)]
pub enum BoolOpType {
    #[display(fmt = "AND")]
    And,
    #[display(fmt = "OR")]
    Or,
    #[display(fmt = "NOT")]
    Not,
}

/// Reference to a column visible in the input of the owning operator.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Variable {
    column: Column,
}

impl Variable {
    pub fn new(column: Column) -> Self {
        Self { column }
    }

    pub fn column(&self) -> &Column {
        &self.column
    }
}

impl DisplayFields for Variable {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("")
            .field("column", &format_args!("{}", self.column))
            .finish()
    }
}

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Constant {
    value: Value,
}

impl Constant {
    pub fn new<V: Into<Value>>(value: V) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl DisplayFields for Constant {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("")
            .field("value", &format_args!("{}", self.value))
            .finish()
    }
}

/// Binary comparison; the operands are the two children of the owning
/// expression.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct Compare {
    kind: CompareType,
}

impl Compare {
    pub fn new(kind: CompareType) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> CompareType {
        self.kind
    }
}

impl DisplayFields for Compare {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("").field("kind", &self.kind).finish()
    }
}

/// Boolean connective over child expressions.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct BoolOp {
    kind: BoolOpType,
}

impl BoolOp {
    pub fn new(kind: BoolOpType) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> BoolOpType {
        self.kind
    }
}

impl DisplayFields for BoolOp {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("").field("kind", &self.kind).finish()
    }
}

/// Target list head of [`super::ComputeExprs`]; its children are
/// `ProjectColumn` subtrees, one per output position.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Default)]
pub struct ProjectList;

impl DisplayFields for ProjectList {
    fn display(&self, _f: &mut Formatter<'_>) -> std::fmt::Result {
        Ok(())
    }
}

/// One projection target: the output column it produces plus, as its only
/// child, the expression that computes it.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct ProjectColumn {
    column: Column,
}

impl ProjectColumn {
    pub fn new(column: Column) -> Self {
        Self { column }
    }

    pub fn column(&self) -> &Column {
        &self.column
    }
}

impl DisplayFields for ProjectColumn {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("")
            .field("column", &format_args!("{}", self.column))
            .finish()
    }
}

/// Scalar operator, the building block of predicate and projection
/// subtrees.
#[derive(Clone, Debug, Hash, Eq, PartialEq, EnumAsInner, AsRefStr)]
#[enum_dispatch]
pub enum ScalarOperator {
    Variable(Variable),
    Constant(Constant),
    Compare(Compare),
    BoolOp(BoolOp),
    ProjectList(ProjectList),
    ProjectColumn(ProjectColumn),
}

impl Display for ScalarOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())?;
        self.display(f)
    }
}
