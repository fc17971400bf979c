//! Expression compiler collaborator interface.

use std::fmt::{Debug, Display};
use std::sync::Arc;

use crate::error::OptResult;
use crate::operator::OperatorExpression;

/// Executable scalar expression produced by the expression compiler.
///
/// The optimizer core never evaluates these; it only carries them from the
/// chosen operator tree into plan nodes.
pub trait ExecutableExpr: Debug + Display {}

pub type ExecExprRef = Arc<dyn ExecutableExpr>;

/// Compiles a scalar operator subtree into an executable expression.
///
/// Implemented by the expression subsystem of the surrounding engine. An
/// absent subtree compiles to `None`, which readers interpret as an
/// always-true predicate.
pub trait ExpressionCompiler {
    fn compile(&self, expr: Option<&OperatorExpression>) -> OptResult<Option<ExecExprRef>>;
}
