//! The modeling facade.
//!
//! A [Model] owns one [NativeModel] and the [Environment] it was created
//! with. Every builder call is projected onto the native model right away;
//! whether the native model applies it immediately or on the next flush is
//! controlled by [IntParam::UpdateMode].
//!
//! ```
//! use lp_modeling::{scalar_product, Environment, Model};
//!
//! let mut model = Model::new("diet", Environment::new());
//! let food = model.num_var_array(2, 0.0, f64::INFINITY).unwrap();
//! let protein = scalar_product(&[2.0, 3.0], &food).unwrap();
//! let range = model.add_ge(protein, 21.0, Some("protein")).unwrap();
//! model.add_minimize(scalar_product(&[20.0, 10.0], &food).unwrap()).unwrap();
//! assert_eq!(model.row_coefficients(&range).unwrap().len(), 2);
//! ```
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, info};

use crate::column::Column;
use crate::error::{ModelError, NativeError, Result};
use crate::expr::LinearExpr;
use crate::ids::{ConstrRef, ModelId, VarRef};
use crate::lp_format::LpObjective;
use crate::native::{ConstrAttr, NativeColumn, NativeModel, VarAttr};
use crate::params::{DoubleParam, IntParam, Params};
use crate::range::{AsConstraint, Constraint, Objective, Range, RowPlan};
use crate::reconcile::{net_coefficients, row_delta};
use crate::solvers::{AllSolvers, SolverTrait};
use crate::status::ModelStatus;
use crate::variable::{Var, VarType};

/// The solver program and parameter table models are created with
#[derive(Debug, Clone, Default)]
pub struct Environment<S = AllSolvers> {
    solver: S,
    params: Params,
}

impl Environment<AllSolvers> {
    /// Default parameters, first installed solver among Gurobi, Cplex, Cbc and Glpk
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S> Environment<S> {
    /// Default parameters with the given solver program
    pub fn with_solver(solver: S) -> Self {
        Environment {
            solver,
            params: Params::default(),
        }
    }

    /// The solver program
    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// The parameter table
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Set an integer parameter
    pub fn set_int_param(&mut self, param: IntParam, value: i32) -> Result<()> {
        self.params.set_int(param, value)
    }

    /// Get an integer parameter
    pub fn get_int_param(&self, param: IntParam) -> i32 {
        self.params.get_int(param)
    }

    /// Set a real parameter
    pub fn set_double_param(&mut self, param: DoubleParam, value: f64) -> Result<()> {
        self.params.set_double(param, value)
    }

    /// Get a real parameter
    pub fn get_double_param(&self, param: DoubleParam) -> f64 {
        self.params.get_double(param)
    }
}

/// A linear or mixed integer model, see the module documentation
#[derive(Debug)]
pub struct Model<S = AllSolvers> {
    id: ModelId,
    env: Environment<S>,
    native: NativeModel,
    vars: Vec<Var>,
    objective_generation: u64,
}

impl<S> Model<S> {
    /// An empty model
    pub fn new(name: &str, env: Environment<S>) -> Model<S> {
        let id = ModelId::fresh();
        info!(model = id.inner(), name, "model created");
        Model {
            id,
            env,
            native: NativeModel::new(name),
            vars: Vec::new(),
            objective_generation: 0,
        }
    }

    /// Identity of the live native model
    pub fn id(&self) -> ModelId {
        self.id
    }

    /// The environment the model was created with
    pub fn env(&self) -> &Environment<S> {
        &self.env
    }

    /// The native model
    pub fn native(&self) -> &NativeModel {
        &self.native
    }

    fn sync(&mut self) {
        if self.env.params.immediate_updates() {
            self.native.update();
        }
    }

    // Parameters

    /// Set an integer parameter. Switching [IntParam::UpdateMode] to 1
    /// applies the modifications queued so far.
    pub fn set_int_param(&mut self, param: IntParam, value: i32) -> Result<()> {
        self.env.set_int_param(param, value)?;
        self.sync();
        Ok(())
    }

    /// Get an integer parameter
    pub fn get_int_param(&self, param: IntParam) -> i32 {
        self.env.get_int_param(param)
    }

    /// Set a real parameter
    pub fn set_double_param(&mut self, param: DoubleParam, value: f64) -> Result<()> {
        self.env.set_double_param(param, value)
    }

    /// Get a real parameter
    pub fn get_double_param(&self, param: DoubleParam) -> f64 {
        self.env.get_double_param(param)
    }

    // Handle validation

    fn check_var(&self, var: VarRef) -> Result<usize> {
        if var.model() == self.id && var.index() < self.native.num_columns() {
            Ok(var.index())
        } else {
            Err(ModelError::InvalidReference {
                kind: "variable",
                index: var.index(),
            })
        }
    }

    fn check_constr(&self, constr: ConstrRef) -> Result<usize> {
        if constr.model() == self.id && constr.index() < self.native.num_rows() {
            Ok(constr.index())
        } else {
            Err(ModelError::InvalidReference {
                kind: "constraint",
                index: constr.index(),
            })
        }
    }

    fn check_objective(&self, model: ModelId, generation: u64) -> Result<()> {
        if model == self.id && generation == self.objective_generation {
            Ok(())
        } else {
            Err(ModelError::InvalidReference {
                kind: "objective",
                index: 0,
            })
        }
    }

    fn expr_terms(&self, expr: &LinearExpr) -> Result<Vec<(usize, f64)>> {
        expr.coefficients()
            .map(|(var, coeff)| Ok((self.check_var(var)?, coeff)))
            .collect()
    }

    // Variables

    /// Add `lbs.len()` variables in one batch. `types` and `names`, when
    /// given, must have one entry per variable; variables are continuous
    /// and unnamed otherwise.
    pub fn add_vars(
        &mut self,
        lbs: &[f64],
        ubs: &[f64],
        types: Option<&[VarType]>,
        names: Option<&[&str]>,
    ) -> Result<Vec<Var>> {
        let count = lbs.len();
        let check = |what, found| {
            if found == count {
                Ok(())
            } else {
                Err(ModelError::LengthMismatch {
                    what,
                    expected: count,
                    found,
                })
            }
        };
        check("upper bounds", ubs.len())?;
        if let Some(types) = types {
            check("types", types.len())?;
        }
        if let Some(names) = names {
            check("names", names.len())?;
        }
        let names: Vec<Option<String>> = match names {
            Some(names) => names.iter().map(|n| Some(n.to_string())).collect(),
            None => vec![None; count],
        };
        let indices = self
            .native
            .add_variables(lbs, ubs, None, types, Some(&names))?;
        let vars: Vec<Var> = indices
            .zip(names)
            .enumerate()
            .map(|(i, (index, name))| {
                let var_type = types.map_or(VarType::Continuous, |t| t[i]);
                Var::new(self.id, index, lbs[i], ubs[i], var_type, name)
            })
            .collect();
        debug!(count, "variables added");
        self.vars.extend(vars.iter().cloned());
        self.sync();
        Ok(vars)
    }

    /// Add one variable
    pub fn add_var(
        &mut self,
        lb: f64,
        ub: f64,
        var_type: VarType,
        name: Option<&str>,
    ) -> Result<Var> {
        let names = name.map(|n| [n]);
        let types = [var_type];
        let mut vars = self.add_vars(
            &[lb],
            &[ub],
            Some(&types[..]),
            names.as_ref().map(|n| &n[..]),
        )?;
        vars.pop().ok_or(ModelError::LengthMismatch {
            what: "variables",
            expected: 1,
            found: 0,
        })
    }

    /// A continuous variable
    pub fn num_var(&mut self, lb: f64, ub: f64, name: Option<&str>) -> Result<Var> {
        self.add_var(lb, ub, VarType::Continuous, name)
    }

    /// An integer variable
    pub fn int_var(&mut self, lb: f64, ub: f64, name: Option<&str>) -> Result<Var> {
        self.add_var(lb, ub, VarType::Integer, name)
    }

    /// A binary variable
    pub fn bool_var(&mut self, name: Option<&str>) -> Result<Var> {
        self.add_var(0.0, 1.0, VarType::Binary, name)
    }

    fn uniform_vars(&mut self, count: usize, lb: f64, ub: f64, var_type: VarType) -> Result<Vec<Var>> {
        self.add_vars(
            &vec![lb; count],
            &vec![ub; count],
            Some(&vec![var_type; count]),
            None,
        )
    }

    /// `count` continuous variables sharing the same bounds
    pub fn num_var_array(&mut self, count: usize, lb: f64, ub: f64) -> Result<Vec<Var>> {
        self.uniform_vars(count, lb, ub, VarType::Continuous)
    }

    /// `count` integer variables sharing the same bounds
    pub fn int_var_array(&mut self, count: usize, lb: f64, ub: f64) -> Result<Vec<Var>> {
        self.uniform_vars(count, lb, ub, VarType::Integer)
    }

    /// `count` binary variables
    pub fn bool_var_array(&mut self, count: usize) -> Result<Vec<Var>> {
        self.uniform_vars(count, 0.0, 1.0, VarType::Binary)
    }

    /// A column holding an objective coefficient
    pub fn objective_column(&self, objective: &Objective, coeff: f64) -> Result<Column> {
        self.check_objective(objective.model(), objective.generation())?;
        Ok(Column::for_objective(
            self.id,
            self.objective_generation,
            coeff,
        ))
    }

    /// A column holding a coefficient in an installed row
    pub fn column(&self, constraint: &impl AsConstraint, coeff: f64) -> Result<Column> {
        let row = constraint.constr_ref();
        self.check_constr(row)?;
        Ok(Column::for_constraint(row, coeff))
    }

    /// Add a variable together with its objective coefficient and its
    /// coefficients in existing rows, in one native call
    pub fn add_var_with_column(
        &mut self,
        column: Column,
        lb: f64,
        ub: f64,
        var_type: VarType,
        name: Option<&str>,
    ) -> Result<Var> {
        let obj = match column.objective() {
            Some((model, generation, coeff)) => {
                self.check_objective(model, generation)?;
                coeff
            }
            None => 0.0,
        };
        let memberships = column
            .terms()
            .map(|(row, coeff)| Ok((self.check_constr(row)?, coeff)))
            .collect::<Result<Vec<_>>>()?;
        let native_column = NativeColumn {
            lb,
            ub,
            obj,
            var_type,
            name: name.map(str::to_string),
        };
        let index = self
            .native
            .add_variable_with_column(native_column, &memberships)?;
        debug!(index, rows = memberships.len(), "column added");
        let var = Var::new(self.id, index, lb, ub, var_type, name.map(str::to_string));
        self.vars.push(var.clone());
        self.sync();
        Ok(var)
    }

    /// Change the type of a variable.
    ///
    /// Fails with [ModelError::IncompatibleType] if the variable's bounds
    /// cannot be represented by the new type, e.g. a fractional bound for
    /// [VarType::Integer]. Bounds are never adjusted.
    pub fn convert_type(&mut self, var: &mut Var, var_type: VarType) -> Result<()> {
        let index = self.check_var(var.id())?;
        let (lb, ub) = (var.lb(), var.ub());
        if !var_type.accepts_bounds(lb, ub) {
            return Err(ModelError::IncompatibleType {
                index,
                lb,
                ub,
                var_type,
            });
        }
        self.native.set_var_type(index, var_type)?;
        var.set_var_type(var_type);
        self.vars[index].set_var_type(var_type);
        self.sync();
        Ok(())
    }

    /// Rename a variable
    pub fn set_var_name(&mut self, var: &mut Var, name: &str) -> Result<()> {
        let index = self.check_var(var.id())?;
        self.native.set_var_name(index, name)?;
        var.set_name(Some(name.to_string()));
        self.vars[index].set_name(Some(name.to_string()));
        self.sync();
        Ok(())
    }

    /// Handles for every variable of the model, slacks of ranges included
    pub fn variables(&self) -> &[Var] {
        &self.vars
    }

    /// Number of variables
    pub fn num_vars(&self) -> usize {
        self.native.num_columns()
    }

    /// Number of rows
    pub fn num_constrs(&self) -> usize {
        self.native.num_rows()
    }

    /// Bounds of a variable as stored by the native model
    pub fn variable_bounds(&self, var: &Var) -> Result<(f64, f64)> {
        let index = self.check_var(var.id())?;
        let lb = self.native.var_attr(VarAttr::LB, &[index])?;
        let ub = self.native.var_attr(VarAttr::UB, &[index])?;
        Ok((lb[0], ub[0]))
    }

    /// Type of a variable as stored by the native model
    pub fn variable_type(&self, var: &Var) -> Result<VarType> {
        let index = self.check_var(var.id())?;
        self.native
            .columns()
            .get(index)
            .map(|c| c.var_type)
            .ok_or_else(|| {
                NativeError::IndexOutOfRange {
                    kind: "column",
                    index,
                    len: self.native.columns().len(),
                }
                .into()
            })
    }

    // Constraints

    /// Add `lb <= expr <= ub`.
    ///
    /// With two distinct finite bounds the row is installed as
    /// `expr - slack = lb` with a new slack variable in `[0, ub - lb]`.
    /// Fails with [ModelError::InvalidBounds] when neither bound is finite.
    pub fn add_range(
        &mut self,
        lb: f64,
        expr: LinearExpr,
        ub: f64,
        name: Option<&str>,
    ) -> Result<Range> {
        let plan = RowPlan::new(lb, ub)?;
        let mut terms = self.expr_terms(&expr)?;
        let slack = match plan.slack_upper_bound() {
            Some(width) => {
                let slack_name = name.map(|n| format!("{}_slack", n));
                let names: Option<Vec<Option<String>>> = slack_name.clone().map(|n| vec![Some(n)]);
                let index = self
                    .native
                    .add_variables(&[0.0], &[width], None, None, names.as_deref())?
                    .start;
                let var = Var::new(self.id, index, 0.0, width, VarType::Continuous, slack_name);
                self.vars.push(var.clone());
                terms.push((index, -1.0));
                Some(var)
            }
            None => None,
        };
        let row = self.native.add_constraint(
            &terms,
            plan.relation(),
            plan.rhs(expr.constant()),
            name,
        )?;
        debug!(row, terms = terms.len(), slack = slack.is_some(), "range added");
        self.sync();
        Ok(Range::new(
            ConstrRef::new(self.id, row),
            lb,
            ub,
            name.map(str::to_string),
            expr,
            slack,
        ))
    }

    /// `expr = rhs`
    pub fn add_eq(&mut self, expr: LinearExpr, rhs: f64, name: Option<&str>) -> Result<Range> {
        self.add_range(rhs, expr, rhs, name)
    }

    /// `expr <= ub`
    pub fn add_le(&mut self, expr: LinearExpr, ub: f64, name: Option<&str>) -> Result<Range> {
        self.add_range(f64::NEG_INFINITY, expr, ub, name)
    }

    /// `expr >= lb`
    pub fn add_ge(&mut self, expr: LinearExpr, lb: f64, name: Option<&str>) -> Result<Range> {
        self.add_range(lb, expr, f64::INFINITY, name)
    }

    /// A range without terms, to be filled by columns or [Model::replace_expression]
    pub fn add_empty_range(&mut self, lb: f64, ub: f64, name: Option<&str>) -> Result<Range> {
        self.add_range(lb, LinearExpr::new(), ub, name)
    }

    /// `lhs relation rhs` between two expressions
    pub fn add_relation(
        &mut self,
        lhs: &LinearExpr,
        relation: Ordering,
        rhs: &LinearExpr,
        name: Option<&str>,
    ) -> Result<Constraint> {
        let diff = lhs.clone() - rhs;
        let terms = self.expr_terms(&diff)?;
        let row = self
            .native
            .add_constraint(&terms, relation, -diff.constant(), name)?;
        debug!(row, terms = terms.len(), "relation added");
        self.sync();
        Ok(Constraint::new(
            ConstrRef::new(self.id, row),
            relation,
            name.map(str::to_string),
        ))
    }

    /// Replace the expression of an installed range.
    ///
    /// The row is read back from the native model and every coefficient is
    /// set in a single batch: columns only in the old row go to 0, the
    /// slack keeps its -1. The right hand side follows the new constant.
    pub fn replace_expression(&mut self, range: &mut Range, expr: LinearExpr) -> Result<()> {
        let row = self.check_constr(range.constr_ref())?;
        let mut desired = self.expr_terms(&expr)?;
        if let Some(slack) = range.slack_var() {
            desired.push((self.check_var(slack.id())?, -1.0));
        }
        self.native.update();
        let installed = self.native.row(row)?;
        let delta = row_delta(&installed, &desired);
        debug!(row, delta = delta.len(), noop = delta.is_noop(), "replacing row expression");
        if !delta.is_noop() {
            let rows = vec![row; delta.len()];
            self.native
                .change_coefficients(&rows, &delta.columns, &delta.values)?;
        }
        let rhs = range.plan().rhs(expr.constant());
        if self.native.constr_attr(ConstrAttr::Rhs, &[row])?[0] != rhs {
            self.native.set_rhs(row, rhs)?;
        }
        range.set_expr(expr);
        self.sync();
        Ok(())
    }

    /// Rename a range
    pub fn set_range_name(&mut self, range: &mut Range, name: &str) -> Result<()> {
        let row = self.check_constr(range.constr_ref())?;
        self.native.set_row_name(row, name)?;
        range.set_name(name.to_string());
        self.sync();
        Ok(())
    }

    /// Net coefficient of every column of a row, read back from the native model
    pub fn row_coefficients(
        &mut self,
        constraint: &impl AsConstraint,
    ) -> Result<BTreeMap<usize, f64>> {
        let row = self.check_constr(constraint.constr_ref())?;
        self.native.update();
        Ok(net_coefficients(&self.native.row(row)?))
    }

    // Objective

    /// Install `expr` as the objective, replacing the current one
    pub fn add_objective(&mut self, expr: LinearExpr, sense: LpObjective) -> Result<Objective> {
        let terms = self.expr_terms(&expr)?;
        self.native.set_objective(&terms, expr.constant(), sense)?;
        self.objective_generation += 1;
        self.sync();
        Ok(Objective::new(
            self.id,
            self.objective_generation,
            sense,
            expr,
        ))
    }

    /// Minimize `expr`
    pub fn add_minimize(&mut self, expr: LinearExpr) -> Result<Objective> {
        self.add_objective(expr, LpObjective::Minimize)
    }

    /// Maximize `expr`
    pub fn add_maximize(&mut self, expr: LinearExpr) -> Result<Objective> {
        self.add_objective(expr, LpObjective::Maximize)
    }

    /// An objective without terms, to be filled by columns
    pub fn add_minimize_empty(&mut self) -> Result<Objective> {
        self.add_minimize(LinearExpr::new())
    }

    /// An objective without terms, to be filled by columns
    pub fn add_maximize_empty(&mut self) -> Result<Objective> {
        self.add_maximize(LinearExpr::new())
    }

    /// Replace the objective expression as a whole, keeping its sense
    pub fn replace_objective_expression(
        &mut self,
        objective: &mut Objective,
        expr: LinearExpr,
    ) -> Result<()> {
        self.check_objective(objective.model(), objective.generation())?;
        let terms = self.expr_terms(&expr)?;
        self.native
            .set_objective(&terms, expr.constant(), objective.sense())?;
        *objective.expr_mut() = expr;
        self.sync();
        Ok(())
    }

    /// Set the objective coefficient of one variable
    pub fn set_linear_coef(
        &mut self,
        objective: &mut Objective,
        var: &Var,
        value: f64,
    ) -> Result<()> {
        self.check_objective(objective.model(), objective.generation())?;
        let index = self.check_var(var.id())?;
        self.native.set_objective_coefficient(index, value)?;
        objective.expr_mut().set_coefficient(var, value);
        self.sync();
        Ok(())
    }

    /// Net objective coefficient of every column, read back from the native
    /// model. Unlike [Objective::expr] this includes coefficients that came
    /// with columns.
    pub fn objective_coefficients(&mut self) -> BTreeMap<usize, f64> {
        self.native.update();
        self.native
            .columns()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.obj != 0.0)
            .map(|(i, c)| (i, c.obj))
            .collect()
    }

    // Solution

    /// Status of the last solve
    pub fn status(&self) -> ModelStatus {
        self.native.status()
    }

    /// Label of [Model::status]
    pub fn status_label(&self) -> &'static str {
        self.status().label()
    }

    /// Code of [Model::status]
    pub fn status_code(&self) -> i32 {
        self.status().code()
    }

    /// Objective value of the current solution, constant term included
    pub fn objective_value(&self) -> Result<f64> {
        Ok(self.native.objective_value()?)
    }

    fn var_values(&self, attr: VarAttr, vars: &[Var]) -> Result<Vec<f64>> {
        let cols = vars
            .iter()
            .map(|v| self.check_var(v.id()))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.native.var_attr(attr, &cols)?)
    }

    fn constr_values<C: AsConstraint>(&self, attr: ConstrAttr, constrs: &[C]) -> Result<Vec<f64>> {
        let rows = constrs
            .iter()
            .map(|c| self.check_constr(c.constr_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.native.constr_attr(attr, &rows)?)
    }

    fn first(values: Vec<f64>) -> Result<f64> {
        values.first().copied().ok_or(ModelError::LengthMismatch {
            what: "attribute values",
            expected: 1,
            found: 0,
        })
    }

    /// Value of a variable in the current solution
    pub fn get_value(&self, var: &Var) -> Result<f64> {
        Self::first(self.var_values(VarAttr::X, std::slice::from_ref(var))?)
    }

    /// Values of several variables in the current solution
    pub fn get_values(&self, vars: &[Var]) -> Result<Vec<f64>> {
        self.var_values(VarAttr::X, vars)
    }

    /// Reduced cost of a variable
    pub fn get_reduced_cost(&self, var: &Var) -> Result<f64> {
        Self::first(self.var_values(VarAttr::RC, std::slice::from_ref(var))?)
    }

    /// Reduced costs of several variables
    pub fn get_reduced_costs(&self, vars: &[Var]) -> Result<Vec<f64>> {
        self.var_values(VarAttr::RC, vars)
    }

    /// Right hand side minus activity of a row in the current solution
    pub fn get_slack<C: AsConstraint>(&self, constraint: &C) -> Result<f64> {
        Self::first(self.constr_values(ConstrAttr::Slack, std::slice::from_ref(constraint))?)
    }

    /// Slacks of several rows
    pub fn get_slacks<C: AsConstraint>(&self, constraints: &[C]) -> Result<Vec<f64>> {
        self.constr_values(ConstrAttr::Slack, constraints)
    }

    /// Dual value of a row
    pub fn get_dual<C: AsConstraint>(&self, constraint: &C) -> Result<f64> {
        Self::first(self.constr_values(ConstrAttr::Pi, std::slice::from_ref(constraint))?)
    }

    /// Dual values of several rows
    pub fn get_duals<C: AsConstraint>(&self, constraints: &[C]) -> Result<Vec<f64>> {
        self.constr_values(ConstrAttr::Pi, constraints)
    }

    // Files

    /// Apply pending modifications and write the model to an .lp file
    pub fn export_model(&mut self, path: impl AsRef<Path>) -> Result<()> {
        Ok(self.native.write(path.as_ref())?)
    }

    /// Replace the live model by one read from an .lp file.
    /// Every handle of the previous model becomes invalid.
    pub fn import_model(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let native = NativeModel::read(path.as_ref())?;
        debug!(model = self.id.inner(), "disposing model before import");
        self.id = ModelId::fresh();
        self.objective_generation = 0;
        self.native = native;
        self.vars = self
            .native
            .columns()
            .iter()
            .enumerate()
            .map(|(i, c)| Var::new(self.id, i, c.lb, c.ub, c.var_type, c.name.clone()))
            .collect();
        info!(model = self.id.inner(), path = %path.as_ref().display(), "model imported");
        Ok(())
    }

    /// Release the model and its environment
    pub fn end(self) {
        info!(model = self.id.inner(), "model ended");
    }
}

impl<S: SolverTrait> Model<S> {
    /// Apply pending modifications and solve the model.
    ///
    /// Returns whether an optimal solution was found; see [Model::status]
    /// for the details.
    pub fn solve(&mut self) -> Result<bool> {
        let status = self.native.optimize(&self.env.solver, &self.env.params)?;
        info!(model = self.id.inner(), status = %status, "solve finished");
        Ok(status == ModelStatus::Optimal)
    }
}

impl<S> Drop for Model<S> {
    fn drop(&mut self) {
        debug!(model = self.id.inner(), "model released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solvers::NoSolver;

    fn model() -> Model<NoSolver> {
        Model::new("test", Environment::with_solver(NoSolver))
    }

    #[test]
    fn handles_of_other_models_are_rejected() {
        let mut a = model();
        let mut b = model();
        let x = a.num_var(0.0, 1.0, Some("x")).unwrap();
        let err = b.add_le(LinearExpr::term(&x, 1.0), 1.0, None).unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidReference {
                kind: "variable",
                ..
            }
        ));
    }

    #[test]
    fn lazy_updates_wait_for_a_flush() {
        let mut m = model();
        m.set_int_param(IntParam::UpdateMode, 0).unwrap();
        let x = m.num_var(0.0, 4.0, None).unwrap();
        assert_eq!(m.num_vars(), 1);
        assert!(m.variable_bounds(&x).is_err());
        m.set_int_param(IntParam::UpdateMode, 1).unwrap();
        assert_eq!(m.variable_bounds(&x).unwrap(), (0.0, 4.0));
    }

    #[test]
    fn solving_without_solver_fails() {
        let mut m = model();
        m.num_var(0.0, 1.0, None).unwrap();
        assert!(matches!(m.solve(), Err(ModelError::Native(NativeError::Solver(_)))));
        assert!(m.get_values(m.variables()).is_err());
    }

    #[test]
    fn replaced_objectives_are_stale() {
        let mut m = model();
        let x = m.num_var(0.0, 1.0, None).unwrap();
        let mut first = m.add_minimize(LinearExpr::term(&x, 1.0)).unwrap();
        let mut second = m.add_maximize(LinearExpr::term(&x, 2.0)).unwrap();
        let err = m.set_linear_coef(&mut first, &x, 5.0).unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidReference {
                kind: "objective",
                ..
            }
        ));
        assert!(m
            .replace_objective_expression(&mut first, LinearExpr::new())
            .is_err());
        assert!(m.objective_column(&first, 1.0).is_err());
        assert_eq!(first.expr().coefficient(&x), Some(1.0));
        m.set_linear_coef(&mut second, &x, 3.0).unwrap();
        assert_eq!(m.native().var_attr(VarAttr::Obj, &[0]).unwrap(), vec![3.0]);
    }

    #[test]
    fn relations_move_everything_left() {
        let mut m = model();
        let xs = m.num_var_array(2, 0.0, 10.0).unwrap();
        let lhs = LinearExpr::term(&xs[0], 1.0);
        let rhs = LinearExpr::term(&xs[1], 2.0) + 3.0;
        let c = m.add_relation(&lhs, Ordering::Equal, &rhs, Some("link")).unwrap();
        assert_eq!(c.relation(), Ordering::Equal);
        let row = m.row_coefficients(&c).unwrap();
        assert_eq!(row.into_iter().collect::<Vec<_>>(), vec![(0, 1.0), (1, -2.0)]);
        assert_eq!(m.native().rows()[0].rhs, 3.0);
    }
}
