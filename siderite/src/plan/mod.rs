//! Executable plan tree produced by lowering a chosen operator tree.

mod explain;
pub use explain::*;

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use itertools::Itertools;
use strum_macros::AsRefStr;

use crate::catalog::TableRef;
use crate::column::Schema;
use crate::expression::ExecExprRef;
use crate::operator::{DisplayFields, JoinType};

pub type PlanRef = Arc<PlanNode>;

/// One node in an executable plan.
#[derive(Debug)]
pub struct PlanNode {
    operator: PlanOperator,
    /// Output schema, derived from the inputs' columns during lowering.
    schema: Schema,
    inputs: Vec<PlanRef>,
}

impl PlanNode {
    pub fn new(operator: PlanOperator, schema: Schema, inputs: Vec<PlanRef>) -> Self {
        Self {
            operator,
            schema,
            inputs,
        }
    }

    pub fn operator(&self) -> &PlanOperator {
        &self.operator
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn inputs(&self) -> &[PlanRef] {
        &self.inputs
    }
}

#[derive(Debug, AsRefStr)]
pub enum PlanOperator {
    SeqScan(SeqScanPlan),
    Projection(ProjectionPlan),
    Filter(FilterPlan),
    NestedLoopJoin(NestedLoopJoinPlan),
    HashJoin(HashJoinPlan),
}

impl DisplayFields for PlanOperator {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanOperator::SeqScan(plan) => plan.display(f),
            PlanOperator::Projection(plan) => plan.display(f),
            PlanOperator::Filter(plan) => plan.display(f),
            PlanOperator::NestedLoopJoin(plan) => plan.display(f),
            PlanOperator::HashJoin(plan) => plan.display(f),
        }
    }
}

impl Display for PlanOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())?;
        self.display(f)
    }
}

/// Sequential scan over a base table.
#[derive(Debug)]
pub struct SeqScanPlan {
    table: TableRef,
    predicate: Option<ExecExprRef>,
    /// Base-table positions of the produced columns.
    column_ids: Vec<usize>,
}

impl SeqScanPlan {
    pub fn new(table: TableRef, predicate: Option<ExecExprRef>, column_ids: Vec<usize>) -> Self {
        Self {
            table,
            predicate,
            column_ids,
        }
    }

    pub fn table(&self) -> &TableRef {
        &self.table
    }

    pub fn predicate(&self) -> Option<&ExecExprRef> {
        self.predicate.as_ref()
    }

    pub fn column_ids(&self) -> &[usize] {
        &self.column_ids
    }
}

impl DisplayFields for SeqScanPlan {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("");
        s.field("table", &self.table.name());
        if let Some(predicate) = &self.predicate {
            s.field("predicate", &format_args!("{}", predicate));
        }
        s.finish()
    }
}

/// Ordered `(output position, expression)` pairs of a projection.
#[derive(Debug, Default)]
pub struct ProjectInfo {
    targets: Vec<(usize, ExecExprRef)>,
}

impl ProjectInfo {
    /// Builds a target list assigning output positions in input order.
    pub fn from_exprs<I: IntoIterator<Item = ExecExprRef>>(exprs: I) -> Self {
        Self {
            targets: exprs.into_iter().enumerate().collect(),
        }
    }

    pub fn targets(&self) -> &[(usize, ExecExprRef)] {
        &self.targets
    }
}

#[derive(Debug)]
pub struct ProjectionPlan {
    project_info: ProjectInfo,
}

impl ProjectionPlan {
    pub fn new(project_info: ProjectInfo) -> Self {
        Self { project_info }
    }

    pub fn project_info(&self) -> &ProjectInfo {
        &self.project_info
    }
}

impl DisplayFields for ProjectionPlan {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("")
            .field(
                "exprs",
                &format_args!(
                    "[{}]",
                    self.project_info.targets().iter().map(|(_, e)| e).format(", ")
                ),
            )
            .finish()
    }
}

/// Row filter. Distinct node kind; schema passes through from its input.
#[derive(Debug)]
pub struct FilterPlan {
    predicate: ExecExprRef,
}

impl FilterPlan {
    pub fn new(predicate: ExecExprRef) -> Self {
        Self { predicate }
    }

    pub fn predicate(&self) -> &ExecExprRef {
        &self.predicate
    }
}

impl DisplayFields for FilterPlan {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("")
            .field("predicate", &format_args!("{}", self.predicate))
            .finish()
    }
}

#[derive(Debug)]
pub struct NestedLoopJoinPlan {
    join_type: JoinType,
    predicate: Option<ExecExprRef>,
}

impl NestedLoopJoinPlan {
    pub fn new(join_type: JoinType, predicate: Option<ExecExprRef>) -> Self {
        Self {
            join_type,
            predicate,
        }
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    pub fn predicate(&self) -> Option<&ExecExprRef> {
        self.predicate.as_ref()
    }
}

impl DisplayFields for NestedLoopJoinPlan {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("");
        s.field("join_type", &self.join_type);
        if let Some(predicate) = &self.predicate {
            s.field("predicate", &format_args!("{}", predicate));
        }
        s.finish()
    }
}

#[derive(Debug)]
pub struct HashJoinPlan {
    join_type: JoinType,
    predicate: Option<ExecExprRef>,
}

impl HashJoinPlan {
    pub fn new(join_type: JoinType, predicate: Option<ExecExprRef>) -> Self {
        Self {
            join_type,
            predicate,
        }
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    pub fn predicate(&self) -> Option<&ExecExprRef> {
        self.predicate.as_ref()
    }
}

impl DisplayFields for HashJoinPlan {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("");
        s.field("join_type", &self.join_type);
        if let Some(predicate) = &self.predicate {
            s.field("predicate", &format_args!("{}", predicate));
        }
        s.finish()
    }
}
