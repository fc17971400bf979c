use std::fmt::{Display, Formatter};

use enum_as_inner::EnumAsInner;
use enum_dispatch::enum_dispatch;
use strum_macros::AsRefStr;

use crate::operator::{
    ComputeExprs, DisplayFields, Filter, HashJoin, NestedLoopJoin, Project, Scan, Sort,
};

/// Physical relational operator. The subset with a lowering rule in the
/// transformer is executable; `PhysicalProject` is a binder placeholder and
/// `PhysicalSort` an enforcer, neither reaches execution.
#[derive(Clone, Debug, Hash, Eq, PartialEq, EnumAsInner, AsRefStr)]
#[enum_dispatch]
pub enum PhysicalOperator {
    PhysicalScan(Scan),
    PhysicalProject(Project),
    PhysicalComputeExprs(ComputeExprs),
    PhysicalFilter(Filter),
    PhysicalNestedLoopJoin(NestedLoopJoin),
    PhysicalHashJoin(HashJoin),
    PhysicalSort(Sort),
}

impl Display for PhysicalOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())?;
        self.display(f)
    }
}
