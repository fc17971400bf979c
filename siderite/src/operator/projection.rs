use std::fmt::Formatter;

use crate::operator::DisplayFields;

/// Bare projection placeholder produced by binding, before the target list
/// has been rewritten into computable expressions. It never lowers to a
/// plan node; [`ComputeExprs`] is the projection that does.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Default)]
pub struct Project;

impl DisplayFields for Project {
    fn display(&self, _f: &mut Formatter<'_>) -> std::fmt::Result {
        Ok(())
    }
}

/// Expression-computing projection.
///
/// Children of the owning expression are `[input, project_list]`, where the
/// project list is a `ProjectList` scalar subtree carrying one
/// `ProjectColumn` per output position.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Default)]
pub struct ComputeExprs;

impl DisplayFields for ComputeExprs {
    fn display(&self, _f: &mut Formatter<'_>) -> std::fmt::Result {
        Ok(())
    }
}
