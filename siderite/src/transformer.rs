//! Lowering of a chosen physical operator tree into an executable plan.

use std::sync::Arc;

use itertools::Itertools;
use log::debug;

use crate::column::{Column, Schema};
use crate::error::{OptResult, OptimizerError};
use crate::expression::{ExecExprRef, ExpressionCompiler};
use crate::operator::{
    Operator, OperatorExpression, PhysicalOperator, Scan, ScalarOperator,
};
use crate::plan::{
    FilterPlan, HashJoinPlan, NestedLoopJoinPlan, PlanNode, PlanOperator, PlanRef, ProjectInfo,
    ProjectionPlan, SeqScanPlan,
};

/// Lowers one fully-decided physical operator tree into an executable plan
/// tree.
///
/// Lowering is a recursive descent, not a per-node map: joins and
/// projections need the output columns of their already-lowered inputs to
/// build their own schemas. That context is threaded explicitly, subtree
/// in, [`LoweredPlan`] out, so the transformer holds no mutable traversal
/// state and stays safe under reentrant use.
pub struct OperatorToPlanTransformer<'a> {
    compiler: &'a dyn ExpressionCompiler,
}

/// A lowered subtree together with its column provenance.
struct LoweredPlan {
    plan: PlanRef,
    output_columns: Vec<Column>,
}

impl<'a> OperatorToPlanTransformer<'a> {
    pub fn new(compiler: &'a dyn ExpressionCompiler) -> Self {
        Self { compiler }
    }

    /// Lowers `expr` and returns the rooted plan tree.
    pub fn convert_op_expression(&self, expr: &OperatorExpression) -> OptResult<PlanRef> {
        Ok(self.lower(expr)?.plan)
    }

    fn lower(&self, expr: &OperatorExpression) -> OptResult<LoweredPlan> {
        debug!("Lowering {}", expr.operator().name());
        match expr.operator() {
            Operator::Physical(PhysicalOperator::PhysicalScan(scan)) => {
                self.lower_scan(scan, expr)
            }
            Operator::Physical(PhysicalOperator::PhysicalComputeExprs(_)) => {
                self.lower_compute_exprs(expr)
            }
            Operator::Physical(PhysicalOperator::PhysicalFilter(_)) => self.lower_filter(expr),
            Operator::Physical(PhysicalOperator::PhysicalNestedLoopJoin(join)) => self
                .lower_join(expr, "PhysicalNestedLoopJoin", |predicate| {
                    PlanOperator::NestedLoopJoin(NestedLoopJoinPlan::new(
                        join.join_type(),
                        predicate,
                    ))
                }),
            Operator::Physical(PhysicalOperator::PhysicalHashJoin(join)) => {
                self.lower_join(expr, "PhysicalHashJoin", |predicate| {
                    PlanOperator::HashJoin(HashJoinPlan::new(join.join_type(), predicate))
                })
            }
            op => Err(OptimizerError::UnsupportedOperator {
                operator: op.name().to_string(),
            }
            .into()),
        }
    }

    fn lower_scan(&self, scan: &Scan, expr: &OperatorExpression) -> OptResult<LoweredPlan> {
        let children = expr.children();
        if children.len() > 1 {
            return Err(OptimizerError::InvalidChildCount {
                operator: "PhysicalScan".to_string(),
                expected: "at most 1",
                actual: children.len(),
            }
            .into());
        }

        let predicate_expr = children.first();
        if let Some(predicate) = predicate_expr {
            check_column_refs(predicate, scan.columns(), "PhysicalScan")?;
        }
        let predicate = self.compiler.compile(predicate_expr)?;

        let column_ids = scan
            .columns()
            .iter()
            .map(|column| {
                column
                    .as_table()
                    .map(|table_column| table_column.base_offset())
                    .ok_or_else(|| OptimizerError::MalformedExpression {
                        operator: "PhysicalScan".to_string(),
                        message: format!("scan column {column} is not a base table column"),
                    })
            })
            .try_collect()?;

        let output_columns = scan.columns().to_vec();
        let plan = PlanNode::new(
            PlanOperator::SeqScan(SeqScanPlan::new(scan.table().clone(), predicate, column_ids)),
            Schema::new(output_columns.clone()),
            vec![],
        );
        Ok(LoweredPlan {
            plan: Arc::new(plan),
            output_columns,
        })
    }

    fn lower_compute_exprs(&self, expr: &OperatorExpression) -> OptResult<LoweredPlan> {
        let children = expr.children();
        if children.len() != 2 {
            return Err(OptimizerError::InvalidChildCount {
                operator: "PhysicalComputeExprs".to_string(),
                expected: "exactly 2",
                actual: children.len(),
            }
            .into());
        }

        let input = self.lower(&children[0])?;

        let target_list = &children[1];
        if !matches!(
            target_list.operator(),
            Operator::Scalar(ScalarOperator::ProjectList(_))
        ) {
            return Err(OptimizerError::MalformedExpression {
                operator: "PhysicalComputeExprs".to_string(),
                message: "second child must be a ProjectList".to_string(),
            }
            .into());
        }

        let mut proj_columns = Vec::with_capacity(target_list.children().len());
        let mut exprs = Vec::with_capacity(target_list.children().len());
        for target in target_list.children() {
            let Operator::Scalar(ScalarOperator::ProjectColumn(proj_column)) = target.operator()
            else {
                return Err(OptimizerError::MalformedExpression {
                    operator: "PhysicalComputeExprs".to_string(),
                    message: "every projection target must be a ProjectColumn".to_string(),
                }
                .into());
            };
            if target.children().len() != 1 {
                return Err(OptimizerError::InvalidChildCount {
                    operator: "ProjectColumn".to_string(),
                    expected: "exactly 1",
                    actual: target.children().len(),
                }
                .into());
            }

            let value = &target.children()[0];
            check_column_refs(value, &input.output_columns, "PhysicalComputeExprs")?;
            exprs.push(self.compile_required(value, "PhysicalComputeExprs")?);
            proj_columns.push(proj_column.column().clone());
        }

        let plan = PlanNode::new(
            PlanOperator::Projection(ProjectionPlan::new(ProjectInfo::from_exprs(exprs))),
            Schema::new(proj_columns.clone()),
            vec![input.plan],
        );
        Ok(LoweredPlan {
            plan: Arc::new(plan),
            output_columns: proj_columns,
        })
    }

    fn lower_filter(&self, expr: &OperatorExpression) -> OptResult<LoweredPlan> {
        let children = expr.children();
        if children.len() != 2 {
            return Err(OptimizerError::InvalidChildCount {
                operator: "PhysicalFilter".to_string(),
                expected: "exactly 2",
                actual: children.len(),
            }
            .into());
        }

        let input = self.lower(&children[0])?;
        check_column_refs(&children[1], &input.output_columns, "PhysicalFilter")?;
        let predicate = self.compile_required(&children[1], "PhysicalFilter")?;

        // Schema and output columns pass through unchanged.
        let schema = input.plan.schema().clone();
        let plan = PlanNode::new(
            PlanOperator::Filter(FilterPlan::new(predicate)),
            schema,
            vec![input.plan],
        );
        Ok(LoweredPlan {
            plan: Arc::new(plan),
            output_columns: input.output_columns,
        })
    }

    fn lower_join<F>(
        &self,
        expr: &OperatorExpression,
        name: &str,
        build: F,
    ) -> OptResult<LoweredPlan>
    where
        F: FnOnce(Option<ExecExprRef>) -> PlanOperator,
    {
        let children = expr.children();
        if children.len() != 3 {
            return Err(OptimizerError::InvalidChildCount {
                operator: name.to_string(),
                expected: "exactly 3",
                actual: children.len(),
            }
            .into());
        }

        let left = self.lower(&children[0])?;
        let right = self.lower(&children[1])?;

        // Left columns first, then right. Downstream column addressing
        // relies on this order.
        let output_columns: Vec<Column> = left
            .output_columns
            .into_iter()
            .chain(right.output_columns)
            .collect();

        check_column_refs(&children[2], &output_columns, name)?;
        let predicate = self.compiler.compile(Some(&children[2]))?;

        let plan = PlanNode::new(
            build(predicate),
            Schema::new(output_columns.clone()),
            vec![left.plan, right.plan],
        );
        Ok(LoweredPlan {
            plan: Arc::new(plan),
            output_columns,
        })
    }

    fn compile_required(
        &self,
        expr: &OperatorExpression,
        operator: &str,
    ) -> OptResult<ExecExprRef> {
        match self.compiler.compile(Some(expr))? {
            Some(compiled) => Ok(compiled),
            None => Err(OptimizerError::MalformedExpression {
                operator: operator.to_string(),
                message: "expression compiler produced no result for a present expression"
                    .to_string(),
            }
            .into()),
        }
    }
}

/// Walks a scalar subtree and verifies every `Variable` resolves against
/// the columns visible at `operator`.
fn check_column_refs(
    expr: &OperatorExpression,
    visible: &[Column],
    operator: &str,
) -> OptResult<()> {
    if let Operator::Scalar(ScalarOperator::Variable(variable)) = expr.operator() {
        let column = variable.column();
        if !visible.iter().any(|c| c.id() == column.id()) {
            return Err(OptimizerError::ColumnNotInSchema {
                column: column.to_string(),
                operator: operator.to_string(),
            }
            .into());
        }
    }
    for child in expr.children() {
        check_column_refs(child, visible, operator)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::OperatorToPlanTransformer;
    use crate::column::Column;
    use crate::error::OptimizerError;
    use crate::operator::CompareType::{Equal, GreaterThan};
    use crate::operator::{
        HashJoin, JoinType, LogicalOperator, NestedLoopJoin, Operator, OperatorExpression,
        PhysicalOperator, Project, Scan, Sort, SortKey,
    };
    use crate::plan::{PlanNode, PlanOperator};
    use crate::test_utils::{
        cmp, compute_exprs, filter_expr, lit, scan_expr, test_table, var, TestExpressionCompiler,
    };

    fn lower(expr: &OperatorExpression) -> crate::error::OptResult<crate::plan::PlanRef> {
        let compiler = TestExpressionCompiler;
        let transformer = OperatorToPlanTransformer::new(&compiler);
        transformer.convert_op_expression(expr)
    }

    fn assert_seq_scan(plan: &PlanNode, table: &str, column_ids: &[usize]) {
        match plan.operator() {
            PlanOperator::SeqScan(scan) => {
                assert_eq!(table, scan.table().name());
                assert_eq!(column_ids, scan.column_ids());
            }
            other => panic!("expected SeqScan, got {other}"),
        }
    }

    #[test]
    fn test_lower_scan_with_predicate() {
        let (t1, columns) = test_table(
            "t1",
            1,
            r#"[["a", "Integer"], ["b", "Integer"], ["c", "Integer"]]"#,
        );
        let predicate = cmp(GreaterThan, var(&columns[0]), lit(5i64));
        let expr = scan_expr(&t1, &columns, Some(predicate));

        let plan = lower(&expr).unwrap();

        assert_seq_scan(&plan, "t1", &[0, 1, 2]);
        match plan.operator() {
            PlanOperator::SeqScan(scan) => {
                assert_eq!("t1.a > 5", scan.predicate().unwrap().to_string());
            }
            _ => unreachable!(),
        }
        assert_eq!(columns.as_slice(), plan.schema().columns());
        assert!(plan.inputs().is_empty());
    }

    #[test]
    fn test_lower_scan_without_predicate() {
        let (t1, columns) = test_table("t1", 1, r#"[["a", "Integer"]]"#);
        let plan = lower(&scan_expr(&t1, &columns, None)).unwrap();

        match plan.operator() {
            PlanOperator::SeqScan(scan) => assert!(scan.predicate().is_none()),
            other => panic!("expected SeqScan, got {other}"),
        }
    }

    #[test]
    fn test_filter_passes_columns_through() {
        let (t1, columns) = test_table("t1", 1, r#"[["a", "Integer"], ["b", "Integer"]]"#);
        let scan = scan_expr(&t1, &columns, None);
        let expr = filter_expr(scan, cmp(Equal, var(&columns[1]), lit(7i64)));

        let plan = lower(&expr).unwrap();

        match plan.operator() {
            PlanOperator::Filter(filter) => {
                assert_eq!("t1.b = 7", filter.predicate().to_string());
            }
            other => panic!("expected Filter, got {other}"),
        }
        assert_eq!(columns.as_slice(), plan.schema().columns());
        assert_eq!(1, plan.inputs().len());
        assert_seq_scan(&plan.inputs()[0], "t1", &[0, 1]);
    }

    /// Projection over filter over scan, the full lowering scenario.
    #[test]
    fn test_lower_projection_filter_scan() {
        let (t1, columns) = test_table(
            "t1",
            1,
            r#"[["a", "Integer"], ["b", "Integer"], ["c", "Integer"]]"#,
        );
        let scan = scan_expr(&t1, &columns, Some(cmp(GreaterThan, var(&columns[0]), lit(5i64))));
        let filter = filter_expr(scan, cmp(Equal, var(&columns[1]), lit(7i64)));
        let project = compute_exprs(
            filter,
            vec![
                (columns[1].clone(), var(&columns[1])),
                (columns[2].clone(), var(&columns[2])),
            ],
        );

        let plan = lower(&project).unwrap();

        match plan.operator() {
            PlanOperator::Projection(projection) => {
                let targets = projection.project_info().targets();
                assert_eq!(2, targets.len());
                assert_eq!(0, targets[0].0);
                assert_eq!("t1.b", targets[0].1.to_string());
                assert_eq!(1, targets[1].0);
                assert_eq!("t1.c", targets[1].1.to_string());
            }
            other => panic!("expected Projection, got {other}"),
        }
        assert_eq!(&columns[1..], plan.schema().columns());

        let filter_plan = &plan.inputs()[0];
        match filter_plan.operator() {
            PlanOperator::Filter(filter) => {
                assert_eq!("t1.b = 7", filter.predicate().to_string());
            }
            other => panic!("expected Filter, got {other}"),
        }

        let scan_plan = &filter_plan.inputs()[0];
        assert_seq_scan(scan_plan, "t1", &[0, 1, 2]);
        match scan_plan.operator() {
            PlanOperator::SeqScan(scan) => {
                assert_eq!("t1.a > 5", scan.predicate().unwrap().to_string());
            }
            _ => unreachable!(),
        }
    }

    /// Output columns of any join variant are left columns then right
    /// columns.
    #[test]
    fn test_join_output_column_order() {
        let (t1, left_columns) = test_table("t1", 1, r#"[["a", "Integer"], ["b", "Integer"]]"#);
        let (t2, right_columns) = test_table("t2", 10, r#"[["c", "Integer"], ["d", "Integer"]]"#);

        for join_type in JoinType::iter() {
            for hash in [false, true] {
                let operator = if hash {
                    PhysicalOperator::PhysicalHashJoin(HashJoin::new(join_type))
                } else {
                    PhysicalOperator::PhysicalNestedLoopJoin(NestedLoopJoin::new(join_type))
                };
                let expr = OperatorExpression::with_operator(
                    Operator::Physical(operator),
                    vec![
                        scan_expr(&t1, &left_columns, None),
                        scan_expr(&t2, &right_columns, None),
                        cmp(Equal, var(&left_columns[0]), var(&right_columns[0])),
                    ],
                );

                let plan = lower(&expr).unwrap();

                let expected: Vec<Column> =
                    [left_columns.clone(), right_columns.clone()].concat();
                assert_eq!(expected.as_slice(), plan.schema().columns());

                match (hash, plan.operator()) {
                    (true, PlanOperator::HashJoin(join)) => {
                        assert_eq!(join_type, join.join_type());
                        assert_eq!("t1.a = t2.c", join.predicate().unwrap().to_string());
                    }
                    (false, PlanOperator::NestedLoopJoin(join)) => {
                        assert_eq!(join_type, join.join_type());
                        assert_eq!("t1.a = t2.c", join.predicate().unwrap().to_string());
                    }
                    (_, other) => panic!("unexpected join plan {other}"),
                }

                assert_eq!(2, plan.inputs().len());
                assert_seq_scan(&plan.inputs()[0], "t1", &[0, 1]);
                assert_seq_scan(&plan.inputs()[1], "t2", &[0, 1]);
            }
        }
    }

    #[test]
    fn test_unsupported_operator_is_an_error() {
        let (t1, columns) = test_table("t1", 1, r#"[["a", "Integer"]]"#);

        let unsupported = [
            OperatorExpression::with_operator(
                Operator::Physical(PhysicalOperator::PhysicalProject(Project)),
                vec![scan_expr(&t1, &columns, None)],
            ),
            OperatorExpression::with_operator(
                Operator::Physical(PhysicalOperator::PhysicalSort(Sort::new(vec![
                    SortKey::new(columns[0].clone(), true),
                ]))),
                vec![scan_expr(&t1, &columns, None)],
            ),
            // A logical operator reaching the transformer is a search bug
            // surfaced as the same structured error.
            OperatorExpression::with_operator(
                Operator::Logical(LogicalOperator::LogicalGet(Scan::new(
                    t1.clone(),
                    columns.clone(),
                ))),
                vec![],
            ),
        ];

        for expr in &unsupported {
            let err = lower(expr).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<OptimizerError>(),
                Some(OptimizerError::UnsupportedOperator { .. })
            ));
        }
    }

    #[test]
    fn test_filter_arity_is_checked() {
        let (t1, columns) = test_table("t1", 1, r#"[["a", "Integer"]]"#);
        let expr = OperatorExpression::with_operator(
            Operator::Physical(PhysicalOperator::PhysicalFilter(Default::default())),
            vec![scan_expr(&t1, &columns, None)],
        );

        let err = lower(&expr).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OptimizerError>(),
            Some(OptimizerError::InvalidChildCount { actual: 1, .. })
        ));
    }

    #[test]
    fn test_unknown_column_in_predicate_is_an_error() {
        let (t1, columns) = test_table("t1", 1, r#"[["a", "Integer"]]"#);
        let (_, other_columns) = test_table("t2", 10, r#"[["b", "Integer"]]"#);

        let scan = scan_expr(&t1, &columns, None);
        let expr = filter_expr(scan, cmp(Equal, var(&other_columns[0]), lit(1i64)));

        let err = lower(&expr).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OptimizerError>(),
            Some(OptimizerError::ColumnNotInSchema { .. })
        ));
    }

    #[test]
    fn test_unknown_column_in_projection_is_an_error() {
        let (t1, columns) = test_table("t1", 1, r#"[["a", "Integer"]]"#);
        let (_, other_columns) = test_table("t2", 10, r#"[["b", "Integer"]]"#);

        let scan = scan_expr(&t1, &columns, None);
        let expr = compute_exprs(
            scan,
            vec![(other_columns[0].clone(), var(&other_columns[0]))],
        );

        let err = lower(&expr).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OptimizerError>(),
            Some(OptimizerError::ColumnNotInSchema { .. })
        ));
    }
}
