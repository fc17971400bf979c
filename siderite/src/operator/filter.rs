use std::fmt::Formatter;

use crate::operator::DisplayFields;

/// Row filtering operator. Children of the owning expression are
/// `[input, predicate]`; output columns pass through unchanged.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Default)]
pub struct Filter;

impl DisplayFields for Filter {
    fn display(&self, _f: &mut Formatter<'_>) -> std::fmt::Result {
        Ok(())
    }
}
