//! ## Background
//!
//! A cost based query optimizer searches a space of semantically equivalent
//! plans and keeps the cheapest one. Enumerating that space naively is
//! exponential: the same subexpression reappears under every alternative of
//! every ancestor. The memo structure introduced by the Volcano/Cascades
//! line of optimizers [1] collapses the space into equivalence classes
//! (*groups*) of interchangeable expressions, so each distinct
//! subexpression is represented exactly once no matter how many plans share
//! it.
//!
//! This crate implements the two load bearing pieces of such an optimizer:
//!
//! * the [`memo::Memo`], which owns all groups and deduplicates every
//!   expression inserted during exploration through a single structural
//!   index, and
//! * the [`transformer::OperatorToPlanTransformer`], which lowers the
//!   physical operator tree chosen after search into an executable plan
//!   tree, tracking column provenance across project/filter/join
//!   boundaries.
//!
//! Rule application, costing and search order are deliberately not here:
//! they operate *on* these structures and live in the surrounding engine,
//! as do the binder, the catalog and the expression compiler (consumed
//! through the narrow traits in [`catalog`] and [`expression`]).
//!
//! ## Design
//!
//! * [`operator`] Relational and scalar operators and the operator
//!   expression tree produced by binding.
//! * [`memo`] Groups, group expressions and the deduplicating memo.
//! * [`plan`] Executable plan nodes and plan explain rendering.
//! * [`transformer`] Lowering of a chosen operator tree into a plan tree.
//! * [`column`], [`value`], [`catalog`], [`expression`] Shared data model
//!   and collaborator interfaces.
//!
//! ## Reference
//!
//! 1. Graefe, G., 1995. The cascades framework for query optimization.
//! IEEE Data Eng. Bull., 18(3), pp.19-29.
//! 2. Columbia Project, https://github.com/yongwen/columbia

pub mod catalog;
pub mod column;
pub mod error;
pub mod expression;
pub mod memo;
pub mod operator;
pub mod plan;
pub mod transformer;
pub mod value;

#[cfg(test)]
pub(crate) mod test_utils;
