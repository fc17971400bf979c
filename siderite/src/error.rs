use thiserror::Error;

pub type OptResult<T> = anyhow::Result<T>;

/// Structured compilation errors surfaced to the caller of the transformer.
///
/// Invariant violations inside the memo (target group mismatch, out of
/// range group ids) are caller bugs, not user facing conditions; they abort
/// through assertions instead of appearing here.
#[derive(Debug, Error)]
pub enum OptimizerError {
    #[error("operator {operator} has no plan lowering rule")]
    UnsupportedOperator { operator: String },

    #[error("operator {operator} expects {expected} children, found {actual}")]
    InvalidChildCount {
        operator: String,
        expected: &'static str,
        actual: usize,
    },

    #[error("column {column} is not visible to operator {operator}")]
    ColumnNotInSchema { column: String, operator: String },

    #[error("malformed input to operator {operator}: {message}")]
    MalformedExpression { operator: String, message: String },
}
