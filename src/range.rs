//! Constraint and objective handles.
//!
//! A [Range] is `lb <= expr <= ub`. The native model only knows one-sided
//! rows and equalities, so a range with two distinct finite bounds is
//! installed as `expr - slack = lb` with a slack bounded by `[0, ub - lb]`.
//! Bounds at or beyond `f64::MAX` in absolute value mean "no bound".
use std::cmp::Ordering;

use crate::error::{ModelError, Result};
use crate::expr::LinearExpr;
use crate::ids::{ConstrRef, ModelId};
use crate::lp_format::LpObjective;
use crate::variable::Var;

/// Handles that designate a row of the native model
pub trait AsConstraint {
    /// The row
    fn constr_ref(&self) -> ConstrRef;
}

/// `lb <= expr <= ub`, see the module documentation
#[derive(Debug, Clone, PartialEq)]
pub struct Range {
    id: ConstrRef,
    lb: f64,
    ub: f64,
    name: Option<String>,
    expr: LinearExpr,
    slack: Option<Var>,
}

impl Range {
    pub(crate) fn new(
        id: ConstrRef,
        lb: f64,
        ub: f64,
        name: Option<String>,
        expr: LinearExpr,
        slack: Option<Var>,
    ) -> Range {
        Range {
            id,
            lb,
            ub,
            name,
            expr,
            slack,
        }
    }

    /// Position of the row in the native model
    pub fn index(&self) -> usize {
        self.id.index()
    }

    /// Lower bound, as given at creation
    pub fn lb(&self) -> f64 {
        self.lb
    }

    /// Upper bound, as given at creation
    pub fn ub(&self) -> f64 {
        self.ub
    }

    /// Name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The expression currently governing the row
    pub fn expr(&self) -> &LinearExpr {
        &self.expr
    }

    /// The auxiliary variable of a two-sided range
    pub fn slack_var(&self) -> Option<&Var> {
        self.slack.as_ref()
    }

    pub(crate) fn plan(&self) -> RowPlan {
        // bounds were validated when the range was created
        RowPlan::new(self.lb, self.ub).unwrap_or(RowPlan::Equal(self.lb))
    }

    pub(crate) fn set_expr(&mut self, expr: LinearExpr) {
        self.expr = expr;
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = Some(name);
    }
}

impl AsConstraint for Range {
    fn constr_ref(&self) -> ConstrRef {
        self.id
    }
}

/// A plain relation between two expressions, e.g. `x = 2 y + 1`
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    id: ConstrRef,
    relation: Ordering,
    name: Option<String>,
}

impl Constraint {
    pub(crate) fn new(id: ConstrRef, relation: Ordering, name: Option<String>) -> Constraint {
        Constraint { id, relation, name }
    }

    /// Position of the row in the native model
    pub fn index(&self) -> usize {
        self.id.index()
    }

    /// Less is `<=`, Equal is `=`, Greater is `>=`
    pub fn relation(&self) -> Ordering {
        self.relation
    }

    /// Name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl AsConstraint for Constraint {
    fn constr_ref(&self) -> ConstrRef {
        self.id
    }
}

/// The objective of a model. Installing another objective replaces this one
/// and makes this handle stale.
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    model: ModelId,
    generation: u64,
    sense: LpObjective,
    expr: LinearExpr,
}

impl Objective {
    pub(crate) fn new(
        model: ModelId,
        generation: u64,
        sense: LpObjective,
        expr: LinearExpr,
    ) -> Objective {
        Objective {
            model,
            generation,
            sense,
            expr,
        }
    }

    /// Minimize or maximize
    pub fn sense(&self) -> LpObjective {
        self.sense
    }

    /// The expression this objective was installed with, updated by
    /// [crate::Model::replace_objective_expression] and
    /// [crate::Model::set_linear_coef].
    ///
    /// Coefficients brought in by [crate::Model::add_var_with_column] are
    /// not part of it; [crate::Model::objective_coefficients] reads the
    /// installed objective back.
    pub fn expr(&self) -> &LinearExpr {
        &self.expr
    }

    pub(crate) fn model(&self) -> ModelId {
        self.model
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn expr_mut(&mut self) -> &mut LinearExpr {
        &mut self.expr
    }
}

/// How a range becomes a native row
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum RowPlan {
    /// `expr - slack = lb`, slack in `[0, ub - lb]`
    Ranged { lb: f64, ub: f64 },
    /// `expr >= lb`
    AtLeast(f64),
    /// `expr <= ub`
    AtMost(f64),
    /// `expr = value`
    Equal(f64),
}

impl RowPlan {
    pub(crate) fn new(lb: f64, ub: f64) -> Result<RowPlan> {
        let invalid = ModelError::InvalidBounds { lb, ub };
        if lb.is_nan() || ub.is_nan() {
            return Err(invalid);
        }
        let has_lb = lb > f64::MIN;
        let has_ub = ub < f64::MAX;
        let plan = match (has_lb, has_ub) {
            (true, true) if lb == ub => RowPlan::Equal(lb),
            (true, true) => RowPlan::Ranged { lb, ub },
            (true, false) => RowPlan::AtLeast(lb),
            (false, true) => RowPlan::AtMost(ub),
            (false, false) => return Err(invalid),
        };
        Ok(plan)
    }

    pub(crate) fn relation(self) -> Ordering {
        match self {
            RowPlan::Ranged { .. } | RowPlan::Equal(_) => Ordering::Equal,
            RowPlan::AtLeast(_) => Ordering::Greater,
            RowPlan::AtMost(_) => Ordering::Less,
        }
    }

    /// Right hand side for an expression with the given constant term
    pub(crate) fn rhs(self, constant: f64) -> f64 {
        let bound = match self {
            RowPlan::Ranged { lb, .. } | RowPlan::AtLeast(lb) => lb,
            RowPlan::AtMost(ub) => ub,
            RowPlan::Equal(value) => value,
        };
        bound - constant
    }

    /// Upper bound of the slack variable, for two-sided ranges
    pub(crate) fn slack_upper_bound(self) -> Option<f64> {
        match self {
            RowPlan::Ranged { lb, ub } => Some(ub - lb),
            _ => None,
        }
    }
}
