use std::fmt::{Debug, Formatter};
use std::ops::Index;

use crate::operator::Operator;

/// Operator tree produced by binding and rule application.
///
/// The shape mirrors the query structure: relational inputs come first,
/// followed by whatever scalar subtrees (predicate, target list) the
/// operator kind defines. The tree is immutable once built; both the memo
/// and the transformer only read it.
#[derive(Clone, Hash, Eq, PartialEq)]
pub struct OperatorExpression {
    operator: Operator,
    children: Vec<OperatorExpression>,
}

impl OperatorExpression {
    pub fn with_operator<O, I>(operator: O, children: I) -> Self
    where
        O: Into<Operator>,
        I: IntoIterator<Item = OperatorExpression>,
    {
        Self {
            operator: operator.into(),
            children: children.into_iter().collect(),
        }
    }

    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    pub fn children(&self) -> &[OperatorExpression] {
        &self.children
    }
}

/// Creates a childless expression from an operator.
impl From<Operator> for OperatorExpression {
    fn from(operator: Operator) -> Self {
        OperatorExpression::with_operator(operator, vec![])
    }
}

/// Index of children.
impl Index<usize> for OperatorExpression {
    type Output = OperatorExpression;

    fn index(&self, index: usize) -> &Self::Output {
        &self.children[index]
    }
}

impl Debug for OperatorExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.format(f, 0)
    }
}

impl OperatorExpression {
    fn format(&self, f: &mut Formatter<'_>, level: usize) -> std::fmt::Result {
        let prefix = if level > 0 {
            let mut buffer = String::with_capacity(2 * level);
            for _ in 0..(level - 1) {
                buffer.push_str("  ");
            }
            buffer.push_str("--");
            buffer
        } else {
            "".to_string()
        };

        writeln!(f, "{}{}", prefix, self.operator)?;
        for child in &self.children {
            child.format(f, level + 1)?;
        }

        Ok(())
    }
}
