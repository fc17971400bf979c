use std::collections::HashMap;
use std::fmt::{Debug, Display, Formatter};
use std::ops::{Index, IndexMut};
use std::sync::{Arc, OnceLock};

use log::debug;
use prettytable::{row, Table};
use smallvec::SmallVec;

use crate::operator::Operator;

/// A group id is an index into the group arena of [`Memo`].
#[derive(Hash, Eq, PartialEq, Clone, Copy, Ord, PartialOrd)]
pub struct GroupId(pub usize);

impl Debug for GroupId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for GroupId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Structural identity of a group expression.
///
/// Two expressions denote the same search-space point iff operator kind,
/// operator payload and the ordered child group ids all match, regardless
/// of which concrete subtree proposed them. This is what lets two
/// syntactically different subtrees compare equal once their children have
/// been normalized into the same groups.
#[derive(Clone, Hash, Eq, PartialEq, Debug)]
pub struct GroupExprKey {
    operator: Operator,
    inputs: SmallVec<[GroupId; 2]>,
}

impl GroupExprKey {
    pub fn new<I: IntoIterator<Item = GroupId>>(operator: Operator, inputs: I) -> Self {
        Self {
            operator,
            inputs: inputs.into_iter().collect(),
        }
    }

    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    pub fn inputs(&self) -> &[GroupId] {
        &self.inputs
    }
}

pub type GroupExprRef = Arc<GroupExpr>;

/// One operator choice inside a group, with children expressed as group
/// references rather than owned subtrees.
#[derive(Debug)]
pub struct GroupExpr {
    key: GroupExprKey,
    /// Owning group, stamped exactly once by the memo.
    group_id: OnceLock<GroupId>,
    enforced: bool,
}

impl GroupExpr {
    pub fn new<O, I>(operator: O, inputs: I) -> Self
    where
        O: Into<Operator>,
        I: IntoIterator<Item = GroupId>,
    {
        Self {
            key: GroupExprKey::new(operator.into(), inputs),
            group_id: OnceLock::new(),
            enforced: false,
        }
    }

    pub fn key(&self) -> &GroupExprKey {
        &self.key
    }

    pub fn operator(&self) -> &Operator {
        self.key.operator()
    }

    pub fn inputs(&self) -> &[GroupId] {
        self.key.inputs()
    }

    pub fn is_enforced(&self) -> bool {
        self.enforced
    }

    pub fn is_logical(&self) -> bool {
        matches!(self.operator(), Operator::Logical(_))
    }

    pub fn is_physical(&self) -> bool {
        matches!(self.operator(), Operator::Physical(_))
    }

    /// Owning group id.
    ///
    /// # Panics
    ///
    /// Panics when called before the expression went through
    /// [`Memo::insert_expression`].
    pub fn group_id(&self) -> GroupId {
        *self
            .group_id
            .get()
            .expect("group expression was never inserted into a memo")
    }

    fn assign_group_id(&self, group_id: GroupId) {
        if self.group_id.set(group_id).is_err() {
            let existing = self.group_id();
            assert_eq!(
                existing, group_id,
                "group expression already owned by group {existing}, refusing reassignment to {group_id}"
            );
        }
    }
}

/// An equivalence class: expressions guaranteed to compute the same result.
pub struct Group {
    group_id: GroupId,
    expressions: Vec<GroupExprRef>,
    /// Property enforcers. Members of the class, but not alternative
    /// formulations of the computation.
    enforced_expressions: Vec<GroupExprRef>,
}

impl Group {
    fn new(group_id: GroupId) -> Self {
        Self {
            group_id,
            expressions: Vec::new(),
            enforced_expressions: Vec::new(),
        }
    }

    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    pub fn expressions(&self) -> &[GroupExprRef] {
        &self.expressions
    }

    pub fn enforced_expressions(&self) -> &[GroupExprRef] {
        &self.enforced_expressions
    }

    /// Number of expressions in this group, enforcers included.
    pub fn expr_count(&self) -> usize {
        self.expressions.len() + self.enforced_expressions.len()
    }

    /// Appends without deduplication: that responsibility belongs entirely
    /// to the memo's structural index, which is why nothing outside
    /// [`Memo::insert_expression`] may grow a group.
    pub(crate) fn add_expression(&mut self, expr: GroupExprRef, enforced: bool) {
        if enforced {
            self.enforced_expressions.push(expr);
        } else {
            self.expressions.push(expr);
        }
    }
}

impl Debug for Group {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Group {}:", self.group_id)?;

        let mut table = Table::new();
        table.add_row(row!["Operator", "Inputs", "Enforced"]);
        for expr in &self.expressions {
            table.add_row(row![
                format!("{}", expr.operator()),
                format!("{:?}", expr.inputs()),
                "false"
            ]);
        }
        for expr in &self.enforced_expressions {
            table.add_row(row![
                format!("{}", expr.operator()),
                format!("{:?}", expr.inputs()),
                "true"
            ]);
        }

        writeln!(f, "{}", table)
    }
}

/// Deduplicating container of the whole search space for one optimization
/// request.
///
/// All growth goes through [`Memo::insert_expression`]; the structural
/// index guarantees each distinct [`GroupExprKey`] is represented exactly
/// once across all groups, which keeps the explored plan space polynomial
/// in the number of distinct subexpressions. The memo supports repeated
/// and reentrant insertion from a single thread; concurrent mutation is
/// ruled out by `&mut self`.
#[derive(Default)]
pub struct Memo {
    groups: Vec<Group>,
    group_exprs: HashMap<GroupExprKey, GroupExprRef>,
}

impl Memo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical entry point of all search-space growth.
    ///
    /// Returns the canonical expression for `expr`'s structural key with
    /// its group id set. On a dedup hit that is the previously registered
    /// expression and the caller's instance is discarded; group count and
    /// expression count are unchanged. Passing `None` as `target_group`
    /// allocates a fresh group for a structurally new expression.
    ///
    /// # Panics
    ///
    /// Panics when an explicit `target_group` contradicts the group the
    /// expression already belongs to. That is a caller bug, never a
    /// recoverable condition.
    pub fn insert_expression(
        &mut self,
        mut expr: GroupExpr,
        target_group: Option<GroupId>,
        enforced: bool,
    ) -> GroupExprRef {
        // A leaf re-enters the memo: its origin group is authoritative and
        // no new entry is created.
        if let Operator::Leaf(leaf) = expr.operator() {
            let origin = leaf.origin_group();
            if let Some(target) = target_group {
                assert_eq!(
                    target, origin,
                    "leaf targets group {target} but originates from group {origin}"
                );
            }
            expr.assign_group_id(origin);
            return Arc::new(expr);
        }

        if let Some(existing) = self.group_exprs.get(expr.key()) {
            let group_id = existing.group_id();
            if let Some(target) = target_group {
                assert_eq!(
                    target, group_id,
                    "expression already canonical in group {group_id}, caller expected group {target}"
                );
            }
            debug!("Dedup hit for {} in group {}", existing.operator(), group_id);
            return existing.clone();
        }

        let group_id = target_group.unwrap_or_else(|| self.add_new_group());
        expr.enforced = enforced;
        expr.assign_group_id(group_id);
        let expr: GroupExprRef = Arc::new(expr);
        self.group_exprs.insert(expr.key().clone(), expr.clone());
        self[group_id].add_expression(expr.clone(), enforced);
        debug!("Inserted {} into group {}", expr.operator(), group_id);
        expr
    }

    /// Allocates one empty group. Ids are dense and assigned in call order.
    pub fn add_new_group(&mut self) -> GroupId {
        let group_id = GroupId(self.groups.len());
        self.groups.push(Group::new(group_id));
        group_id
    }

    /// # Panics
    ///
    /// Panics on an id that was never allocated by this memo.
    pub fn group_at(&self, group_id: GroupId) -> &Group {
        let count = self.groups.len();
        self.groups
            .get(group_id.0)
            .unwrap_or_else(|| panic!("group {group_id} out of range, memo has {count} groups"))
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of distinct expressions in the structural index.
    pub fn expr_count(&self) -> usize {
        self.group_exprs.len()
    }
}

impl Index<GroupId> for Memo {
    type Output = Group;

    fn index(&self, index: GroupId) -> &Group {
        self.group_at(index)
    }
}

impl IndexMut<GroupId> for Memo {
    fn index_mut(&mut self, index: GroupId) -> &mut Group {
        let count = self.groups.len();
        self.groups
            .get_mut(index.0)
            .unwrap_or_else(|| panic!("group {index} out of range, memo has {count} groups"))
    }
}

impl Debug for Memo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        writeln!(f, "Groups in memo:")?;
        writeln!(f)?;

        for group in &self.groups {
            writeln!(f, "{:?}", group)?;
        }

        Ok(())
    }
}
