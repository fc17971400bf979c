//! Shared helpers for in-crate tests.

use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

use crate::catalog::{MemoryTable, TableRef};
use crate::column::{Column, ColumnId, Schema, TableColumn};
use crate::error::{OptResult, OptimizerError};
use crate::expression::{ExecExprRef, ExecutableExpr, ExpressionCompiler};
use crate::operator::{
    BoolOpType, Compare, CompareType, ComputeExprs, Constant, Filter, Operator,
    OperatorExpression, PhysicalOperator, ProjectColumn, ProjectList, ScalarOperator, Scan,
    Variable,
};
use crate::value::{DataType, Value};

/// Builds a schema-only table from a JSON column list, e.g.
/// `[["a", "Integer"], ["b", "Varchar"]]`. Column ids are `base_id + i`.
pub fn test_table(name: &str, base_id: u64, json_columns: &str) -> (TableRef, Vec<Column>) {
    let parsed: Vec<(String, DataType)> = serde_json::from_str(json_columns).unwrap();
    let columns: Vec<Column> = parsed
        .into_iter()
        .enumerate()
        .map(|(i, (column_name, data_type))| {
            Column::Table(TableColumn::new(
                ColumnId(base_id + i as u64),
                name,
                i,
                column_name,
                data_type,
            ))
        })
        .collect();
    let table: TableRef = Arc::new(MemoryTable::new(name, Schema::new(columns.clone())));
    (table, columns)
}

/// Compiled expression that is just its own rendering; stands in for the
/// engine's executable expressions.
pub struct CompiledExpr {
    text: String,
}

impl CompiledExpr {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self { text: text.into() }
    }
}

impl Debug for CompiledExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl Display for CompiledExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl ExecutableExpr for CompiledExpr {}

pub fn compiled(text: &str) -> ExecExprRef {
    Arc::new(CompiledExpr::new(text))
}

/// Renders scalar subtrees to text instead of compiling them; stands in
/// for the engine's expression compiler.
#[derive(Debug, Default)]
pub struct TestExpressionCompiler;

impl ExpressionCompiler for TestExpressionCompiler {
    fn compile(&self, expr: Option<&OperatorExpression>) -> OptResult<Option<ExecExprRef>> {
        match expr {
            None => Ok(None),
            Some(expr) => Ok(Some(Arc::new(CompiledExpr::new(render_scalar(expr)?)))),
        }
    }
}

fn render_scalar(expr: &OperatorExpression) -> OptResult<String> {
    let Operator::Scalar(op) = expr.operator() else {
        return Err(OptimizerError::MalformedExpression {
            operator: expr.operator().name().to_string(),
            message: "not a scalar expression".to_string(),
        }
        .into());
    };

    match op {
        ScalarOperator::Variable(variable) => Ok(variable.column().to_string()),
        ScalarOperator::Constant(constant) => Ok(constant.value().to_string()),
        ScalarOperator::Compare(compare) => Ok(format!(
            "{} {} {}",
            render_scalar(&expr[0])?,
            compare.kind(),
            render_scalar(&expr[1])?
        )),
        ScalarOperator::BoolOp(bool_op) => match bool_op.kind() {
            BoolOpType::Not => Ok(format!("NOT {}", render_scalar(&expr[0])?)),
            kind => {
                let operands: Vec<String> = expr
                    .children()
                    .iter()
                    .map(render_scalar)
                    .collect::<OptResult<_>>()?;
                Ok(operands.join(&format!(" {kind} ")))
            }
        },
        ScalarOperator::ProjectList(_) | ScalarOperator::ProjectColumn(_) => {
            Err(OptimizerError::MalformedExpression {
                operator: expr.operator().name().to_string(),
                message: "projection structure is not a compilable expression".to_string(),
            }
            .into())
        }
    }
}

pub fn var(column: &Column) -> OperatorExpression {
    Operator::Scalar(ScalarOperator::Variable(Variable::new(column.clone()))).into()
}

pub fn lit<V: Into<Value>>(value: V) -> OperatorExpression {
    Operator::Scalar(ScalarOperator::Constant(Constant::new(value))).into()
}

pub fn cmp(
    kind: CompareType,
    left: OperatorExpression,
    right: OperatorExpression,
) -> OperatorExpression {
    OperatorExpression::with_operator(
        Operator::Scalar(ScalarOperator::Compare(Compare::new(kind))),
        vec![left, right],
    )
}

pub fn scan_expr(
    table: &TableRef,
    columns: &[Column],
    predicate: Option<OperatorExpression>,
) -> OperatorExpression {
    OperatorExpression::with_operator(
        Operator::Physical(PhysicalOperator::PhysicalScan(Scan::new(
            table.clone(),
            columns.to_vec(),
        ))),
        predicate,
    )
}

pub fn filter_expr(
    input: OperatorExpression,
    predicate: OperatorExpression,
) -> OperatorExpression {
    OperatorExpression::with_operator(
        Operator::Physical(PhysicalOperator::PhysicalFilter(Filter)),
        vec![input, predicate],
    )
}

/// `ComputeExprs` over `input` with one `(output column, expression)` pair
/// per target.
pub fn compute_exprs(
    input: OperatorExpression,
    targets: Vec<(Column, OperatorExpression)>,
) -> OperatorExpression {
    let project_columns: Vec<OperatorExpression> = targets
        .into_iter()
        .map(|(column, value)| {
            OperatorExpression::with_operator(
                Operator::Scalar(ScalarOperator::ProjectColumn(ProjectColumn::new(column))),
                vec![value],
            )
        })
        .collect();
    let project_list = OperatorExpression::with_operator(
        Operator::Scalar(ScalarOperator::ProjectList(ProjectList)),
        project_columns,
    );
    OperatorExpression::with_operator(
        Operator::Physical(PhysicalOperator::PhysicalComputeExprs(ComputeExprs)),
        vec![input, project_list],
    )
}
