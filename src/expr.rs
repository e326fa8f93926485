//! Linear expressions: a sparse map from variable to coefficient plus a constant.
//!
//! Adding a term for a variable that is already present accumulates into its
//! coefficient. Coefficients that cancel out to exactly zero stay in the map,
//! so a replaced constraint row can still clear them (see [crate::reconcile]).
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::error::{ModelError, Result};
use crate::ids::VarRef;
use crate::variable::Var;

/// Sum of coefficient-weighted variables plus a constant
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: BTreeMap<VarRef, f64>,
    constant: f64,
}

impl LinearExpr {
    /// The empty expression
    pub fn new() -> Self {
        Self::default()
    }

    /// Just a constant, no variable terms
    pub fn from_constant(constant: f64) -> Self {
        LinearExpr {
            terms: BTreeMap::new(),
            constant,
        }
    }

    /// Single term `coeff * var`
    pub fn term(var: &Var, coeff: f64) -> Self {
        let mut expr = Self::new();
        expr.add_term(var, coeff);
        expr
    }

    /// Add `coeff * var` in place
    pub fn add_term(&mut self, var: &Var, coeff: f64) -> &mut Self {
        self.add_ref(var.id(), coeff);
        self
    }

    pub(crate) fn add_ref(&mut self, var: VarRef, coeff: f64) {
        match self.terms.entry(var) {
            Entry::Occupied(mut e) => *e.get_mut() += coeff,
            Entry::Vacant(e) => {
                e.insert(coeff);
            }
        }
    }

    /// Overwrite the coefficient of `var`, adding the term if it is missing
    pub fn set_coefficient(&mut self, var: &Var, coeff: f64) -> &mut Self {
        self.terms.insert(var.id(), coeff);
        self
    }

    /// Accumulate another expression into this one
    pub fn add_expr(&mut self, other: &LinearExpr) -> &mut Self {
        for (&var, &coeff) in &other.terms {
            self.add_ref(var, coeff);
        }
        self.constant += other.constant;
        self
    }

    /// Add to the constant term
    pub fn add_constant(&mut self, value: f64) -> &mut Self {
        self.constant += value;
        self
    }

    /// A copy with every coefficient and the constant multiplied by `by`
    pub fn scale(&self, by: f64) -> Self {
        LinearExpr {
            terms: self.terms.iter().map(|(&v, &c)| (v, c * by)).collect(),
            constant: self.constant * by,
        }
    }

    /// Net coefficient of a variable, `None` if it never appeared
    pub fn coefficient(&self, var: &Var) -> Option<f64> {
        self.terms.get(&var.id()).copied()
    }

    /// Net coefficients, ordered by variable
    pub fn coefficients(&self) -> impl Iterator<Item = (VarRef, f64)> + '_ {
        self.terms.iter().map(|(&v, &c)| (v, c))
    }

    /// The constant term
    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Copy with the constant set to zero
    pub fn without_constant(&self) -> Self {
        LinearExpr {
            terms: self.terms.clone(),
            constant: 0.0,
        }
    }

    /// Number of distinct variables
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether no variable appears in the expression
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Sum of several expressions
pub fn sum<'a, I>(exprs: I) -> LinearExpr
where
    I: IntoIterator<Item = &'a LinearExpr>,
{
    let mut result = LinearExpr::new();
    for expr in exprs {
        result.add_expr(expr);
    }
    result
}

/// Sum of variables, each with coefficient 1
pub fn sum_vars<'a, I>(vars: I) -> LinearExpr
where
    I: IntoIterator<Item = &'a Var>,
{
    let mut result = LinearExpr::new();
    for var in vars {
        result.add_term(var, 1.0);
    }
    result
}

/// `coeffs[0] * vars[0] + coeffs[1] * vars[1] + ...`
pub fn scalar_product(coeffs: &[f64], vars: &[Var]) -> Result<LinearExpr> {
    if coeffs.len() != vars.len() {
        return Err(ModelError::LengthMismatch {
            what: "coefficients",
            expected: vars.len(),
            found: coeffs.len(),
        });
    }
    let mut result = LinearExpr::new();
    for (var, &coeff) in vars.iter().zip(coeffs) {
        result.add_term(var, coeff);
    }
    Ok(result)
}

/// `coeff * var`
pub fn product(coeff: f64, var: &Var) -> LinearExpr {
    LinearExpr::term(var, coeff)
}

/// `constant - expr`
pub fn difference(constant: f64, expr: &LinearExpr) -> LinearExpr {
    let mut result = expr.scale(-1.0);
    result.add_constant(constant);
    result
}

impl From<&Var> for LinearExpr {
    fn from(var: &Var) -> Self {
        LinearExpr::term(var, 1.0)
    }
}

impl From<f64> for LinearExpr {
    fn from(constant: f64) -> Self {
        LinearExpr::from_constant(constant)
    }
}

impl AddAssign<&LinearExpr> for LinearExpr {
    fn add_assign(&mut self, rhs: &LinearExpr) {
        self.add_expr(rhs);
    }
}

impl AddAssign<LinearExpr> for LinearExpr {
    fn add_assign(&mut self, rhs: LinearExpr) {
        self.add_expr(&rhs);
    }
}

impl SubAssign<LinearExpr> for LinearExpr {
    fn sub_assign(&mut self, rhs: LinearExpr) {
        self.add_expr(&rhs.scale(-1.0));
    }
}

impl AddAssign<&Var> for LinearExpr {
    fn add_assign(&mut self, rhs: &Var) {
        self.add_term(rhs, 1.0);
    }
}

impl SubAssign<&LinearExpr> for LinearExpr {
    fn sub_assign(&mut self, rhs: &LinearExpr) {
        self.add_expr(&rhs.scale(-1.0));
    }
}

impl SubAssign<&Var> for LinearExpr {
    fn sub_assign(&mut self, rhs: &Var) {
        self.add_term(rhs, -1.0);
    }
}

impl AddAssign<f64> for LinearExpr {
    fn add_assign(&mut self, rhs: f64) {
        self.constant += rhs;
    }
}

impl SubAssign<f64> for LinearExpr {
    fn sub_assign(&mut self, rhs: f64) {
        self.constant -= rhs;
    }
}

impl<T> Add<T> for LinearExpr
where
    LinearExpr: AddAssign<T>,
{
    type Output = LinearExpr;

    fn add(mut self, rhs: T) -> LinearExpr {
        self += rhs;
        self
    }
}

impl<T> Sub<T> for LinearExpr
where
    LinearExpr: SubAssign<T>,
{
    type Output = LinearExpr;

    fn sub(mut self, rhs: T) -> LinearExpr {
        self -= rhs;
        self
    }
}

impl Mul<f64> for LinearExpr {
    type Output = LinearExpr;

    fn mul(self, rhs: f64) -> LinearExpr {
        self.scale(rhs)
    }
}

impl Mul<&Var> for f64 {
    type Output = LinearExpr;

    fn mul(self, rhs: &Var) -> LinearExpr {
        LinearExpr::term(rhs, self)
    }
}

impl Neg for LinearExpr {
    type Output = LinearExpr;

    fn neg(self) -> LinearExpr {
        self.scale(-1.0)
    }
}
