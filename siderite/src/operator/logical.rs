use std::fmt::{Display, Formatter};

use enum_as_inner::EnumAsInner;
use enum_dispatch::enum_dispatch;
use strum_macros::AsRefStr;

use crate::operator::{DisplayFields, Filter, Join, Project, Scan};

/// Logical relational operator. Produced by binding, expanded by the rule
/// engine; never lowered to a plan directly.
#[derive(Clone, Debug, Hash, Eq, PartialEq, EnumAsInner, AsRefStr)]
#[enum_dispatch]
pub enum LogicalOperator {
    LogicalGet(Scan),
    LogicalFilter(Filter),
    LogicalProject(Project),
    LogicalJoin(Join),
}

impl Display for LogicalOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())?;
        self.display(f)
    }
}
