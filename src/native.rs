//! The solver-side model: columns, sparse rows and an objective vector.
//!
//! Modifications are queued and only become visible to structural reads
//! ([NativeModel::row], bound attributes, ...) after [NativeModel::update].
//! Indices of new rows and columns are handed out when the modification is
//! queued, so callers can refer to them right away.
//!
//! Solving writes the flushed model through [LpProblem] and hands it to a
//! [SolverTrait] implementation.
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::ops::Range;
use std::path::Path;

use tracing::{debug, info};

use crate::error::NativeError;
use crate::lp_format::{
    parse_lp, AsVariable, Constraint, LpObjective, LpProblem, NamedTerms,
};
use crate::params::Params;
use crate::solvers::{Solution, SolverTrait};
use crate::status::ModelStatus;
use crate::util::UniqueNameGenerator;
use crate::variable::VarType;

type NativeResult<T> = std::result::Result<T, NativeError>;

/// A column of the native model
#[derive(Debug, Clone, PartialEq)]
pub struct NativeColumn {
    /// lower bound
    pub lb: f64,
    /// upper bound
    pub ub: f64,
    /// objective coefficient
    pub obj: f64,
    /// domain
    pub var_type: VarType,
    /// name given by the caller
    pub name: Option<String>,
}

/// A row of the native model: `coefficients relation rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct NativeRow {
    /// (column, coefficient) pairs. A column may be listed more than once,
    /// its net coefficient is the sum of its entries.
    pub coefficients: Vec<(usize, f64)>,
    /// Less is `<=`, Equal is `=`, Greater is `>=`
    pub relation: Ordering,
    /// right hand side
    pub rhs: f64,
    /// name given by the caller
    pub name: Option<String>,
}

/// Column attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarAttr {
    /// value in the current solution
    X,
    /// reduced cost in the current solution
    RC,
    /// lower bound
    LB,
    /// upper bound
    UB,
    /// objective coefficient
    Obj,
}

/// Row attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstrAttr {
    /// dual value in the current solution
    Pi,
    /// right hand side minus row activity in the current solution
    Slack,
    /// right hand side
    Rhs,
}

impl VarAttr {
    fn name(self) -> &'static str {
        match self {
            VarAttr::X => "X",
            VarAttr::RC => "RC",
            VarAttr::LB => "LB",
            VarAttr::UB => "UB",
            VarAttr::Obj => "Obj",
        }
    }
}

impl ConstrAttr {
    fn name(self) -> &'static str {
        match self {
            ConstrAttr::Pi => "Pi",
            ConstrAttr::Slack => "Slack",
            ConstrAttr::Rhs => "RHS",
        }
    }
}

#[derive(Debug, Clone)]
enum PendingUpdate {
    AddColumns(Vec<NativeColumn>),
    AddColumn {
        column: NativeColumn,
        memberships: Vec<(usize, f64)>,
    },
    AddRow(NativeRow),
    SetObjective {
        coefficients: Vec<(usize, f64)>,
        constant: f64,
        sense: LpObjective,
    },
    ChangeCoefficients(Vec<(usize, usize, f64)>),
    SetRhs(usize, f64),
    SetObjectiveCoefficient(usize, f64),
    SetVarType(usize, VarType),
    SetVarName(usize, String),
    SetRowName(usize, String),
}

#[derive(Debug, Clone)]
struct NativeSolution {
    objective: f64,
    values: Vec<f64>,
    reduced_costs: Option<Vec<f64>>,
    duals: Option<Vec<f64>>,
    slacks: Vec<f64>,
}

/// A sparse model in the shape external solvers consume
#[derive(Debug, Clone)]
pub struct NativeModel {
    name: String,
    columns: Vec<NativeColumn>,
    rows: Vec<NativeRow>,
    sense: LpObjective,
    objective_constant: f64,
    pending: Vec<PendingUpdate>,
    queued_columns: usize,
    queued_rows: usize,
    status: ModelStatus,
    solution: Option<NativeSolution>,
}

impl Default for NativeModel {
    fn default() -> Self {
        NativeModel::new("model")
    }
}

impl NativeModel {
    /// An empty model
    pub fn new(name: &str) -> NativeModel {
        NativeModel {
            name: name.to_string(),
            columns: Vec::new(),
            rows: Vec::new(),
            sense: LpObjective::Minimize,
            objective_constant: 0.0,
            pending: Vec::new(),
            queued_columns: 0,
            queued_rows: 0,
            status: ModelStatus::Loaded,
            solution: None,
        }
    }

    /// Smallest solvable model: minimize `x` with `x` in [0, 1]
    pub(crate) fn probe() -> NativeModel {
        let mut model = NativeModel::new("probe");
        model.columns.push(NativeColumn {
            lb: 0.0,
            ub: 1.0,
            obj: 1.0,
            var_type: VarType::Continuous,
            name: Some("x".to_string()),
        });
        model.queued_columns = 1;
        model
    }

    /// Model name, written as a comment at the top of .lp files
    pub fn name(&self) -> &str {
        &self.name
    }

    fn check_column(&self, col: usize) -> NativeResult<()> {
        if col < self.queued_columns {
            Ok(())
        } else {
            Err(NativeError::IndexOutOfRange {
                kind: "column",
                index: col,
                len: self.queued_columns,
            })
        }
    }

    fn check_row(&self, row: usize) -> NativeResult<()> {
        if row < self.queued_rows {
            Ok(())
        } else {
            Err(NativeError::IndexOutOfRange {
                kind: "row",
                index: row,
                len: self.queued_rows,
            })
        }
    }

    fn check_len(what: &'static str, expected: usize, found: usize) -> NativeResult<()> {
        if expected == found {
            Ok(())
        } else {
            Err(NativeError::LengthMismatch {
                what,
                expected,
                found,
            })
        }
    }

    /// Register `lbs.len()` columns in one call. The optional arrays must
    /// have the same length as `lbs`.
    pub fn add_variables(
        &mut self,
        lbs: &[f64],
        ubs: &[f64],
        objs: Option<&[f64]>,
        types: Option<&[VarType]>,
        names: Option<&[Option<String>]>,
    ) -> NativeResult<Range<usize>> {
        let count = lbs.len();
        Self::check_len("upper bounds", count, ubs.len())?;
        if let Some(objs) = objs {
            Self::check_len("objective coefficients", count, objs.len())?;
        }
        if let Some(types) = types {
            Self::check_len("types", count, types.len())?;
        }
        if let Some(names) = names {
            Self::check_len("names", count, names.len())?;
        }
        let columns = (0..count)
            .map(|i| NativeColumn {
                lb: lbs[i],
                ub: ubs[i],
                obj: objs.map_or(0.0, |o| o[i]),
                var_type: types.map_or(VarType::Continuous, |t| t[i]),
                name: names.and_then(|n| n[i].clone()),
            })
            .collect();
        let start = self.queued_columns;
        self.queued_columns += count;
        self.pending.push(PendingUpdate::AddColumns(columns));
        Ok(start..self.queued_columns)
    }

    /// Register one column together with its objective coefficient and its
    /// coefficients in existing rows
    pub fn add_variable_with_column(
        &mut self,
        column: NativeColumn,
        memberships: &[(usize, f64)],
    ) -> NativeResult<usize> {
        for &(row, _) in memberships {
            self.check_row(row)?;
        }
        let index = self.queued_columns;
        self.queued_columns += 1;
        self.pending.push(PendingUpdate::AddColumn {
            column,
            memberships: memberships.to_vec(),
        });
        Ok(index)
    }

    /// Register the row `terms relation rhs`
    pub fn add_constraint(
        &mut self,
        terms: &[(usize, f64)],
        relation: Ordering,
        rhs: f64,
        name: Option<&str>,
    ) -> NativeResult<usize> {
        for &(col, _) in terms {
            self.check_column(col)?;
        }
        let index = self.queued_rows;
        self.queued_rows += 1;
        self.pending.push(PendingUpdate::AddRow(NativeRow {
            coefficients: terms.to_vec(),
            relation,
            rhs,
            name: name.map(str::to_string),
        }));
        Ok(index)
    }

    /// Replace the whole objective
    pub fn set_objective(
        &mut self,
        terms: &[(usize, f64)],
        constant: f64,
        sense: LpObjective,
    ) -> NativeResult<()> {
        for &(col, _) in terms {
            self.check_column(col)?;
        }
        self.pending.push(PendingUpdate::SetObjective {
            coefficients: terms.to_vec(),
            constant,
            sense,
        });
        Ok(())
    }

    /// Set `rows[i], cols[i]` to `values[i]` for every i, in one batch
    pub fn change_coefficients(
        &mut self,
        rows: &[usize],
        cols: &[usize],
        values: &[f64],
    ) -> NativeResult<()> {
        Self::check_len("columns", rows.len(), cols.len())?;
        Self::check_len("values", rows.len(), values.len())?;
        let mut batch = Vec::with_capacity(rows.len());
        for ((&row, &col), &value) in rows.iter().zip(cols).zip(values) {
            self.check_row(row)?;
            self.check_column(col)?;
            batch.push((row, col, value));
        }
        self.pending.push(PendingUpdate::ChangeCoefficients(batch));
        Ok(())
    }

    /// Change the right hand side of a row
    pub fn set_rhs(&mut self, row: usize, value: f64) -> NativeResult<()> {
        self.check_row(row)?;
        self.pending.push(PendingUpdate::SetRhs(row, value));
        Ok(())
    }

    /// Change one objective coefficient
    pub fn set_objective_coefficient(&mut self, col: usize, value: f64) -> NativeResult<()> {
        self.check_column(col)?;
        self.pending
            .push(PendingUpdate::SetObjectiveCoefficient(col, value));
        Ok(())
    }

    /// Change the domain of a column. Bounds are left as they are.
    pub fn set_var_type(&mut self, col: usize, var_type: VarType) -> NativeResult<()> {
        self.check_column(col)?;
        self.pending.push(PendingUpdate::SetVarType(col, var_type));
        Ok(())
    }

    /// Rename a column
    pub fn set_var_name(&mut self, col: usize, name: &str) -> NativeResult<()> {
        self.check_column(col)?;
        self.pending
            .push(PendingUpdate::SetVarName(col, name.to_string()));
        Ok(())
    }

    /// Rename a row
    pub fn set_row_name(&mut self, row: usize, name: &str) -> NativeResult<()> {
        self.check_row(row)?;
        self.pending
            .push(PendingUpdate::SetRowName(row, name.to_string()));
        Ok(())
    }

    /// Whether modifications are waiting for [NativeModel::update]
    pub fn has_pending_updates(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Apply every queued modification, in order
    pub fn update(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let pending = std::mem::take(&mut self.pending);
        debug!(updates = pending.len(), "applying queued model updates");
        for update in pending {
            self.apply(update);
        }
        self.solution = None;
        self.status = ModelStatus::Loaded;
    }

    fn apply(&mut self, update: PendingUpdate) {
        match update {
            PendingUpdate::AddColumns(columns) => self.columns.extend(columns),
            PendingUpdate::AddColumn {
                column,
                memberships,
            } => {
                let col = self.columns.len();
                self.columns.push(column);
                for (row, value) in memberships {
                    self.rows[row].coefficients.push((col, value));
                }
            }
            PendingUpdate::AddRow(row) => self.rows.push(row),
            PendingUpdate::SetObjective {
                coefficients,
                constant,
                sense,
            } => {
                for column in &mut self.columns {
                    column.obj = 0.0;
                }
                for (col, value) in coefficients {
                    self.columns[col].obj += value;
                }
                self.objective_constant = constant;
                self.sense = sense;
            }
            PendingUpdate::ChangeCoefficients(batch) => {
                for (row, col, value) in batch {
                    set_coefficient(&mut self.rows[row].coefficients, col, value);
                }
            }
            PendingUpdate::SetRhs(row, value) => self.rows[row].rhs = value,
            PendingUpdate::SetObjectiveCoefficient(col, value) => self.columns[col].obj = value,
            PendingUpdate::SetVarType(col, var_type) => self.columns[col].var_type = var_type,
            PendingUpdate::SetVarName(col, name) => self.columns[col].name = Some(name),
            PendingUpdate::SetRowName(row, name) => self.rows[row].name = Some(name),
        }
    }

    /// Entries of a flushed row, duplicates included
    pub fn row(&self, row: usize) -> NativeResult<Vec<(usize, f64)>> {
        self.rows
            .get(row)
            .map(|r| r.coefficients.clone())
            .ok_or(NativeError::IndexOutOfRange {
                kind: "row",
                index: row,
                len: self.rows.len(),
            })
    }

    /// Flushed columns
    pub fn columns(&self) -> &[NativeColumn] {
        &self.columns
    }

    /// Flushed rows
    pub fn rows(&self) -> &[NativeRow] {
        &self.rows
    }

    /// Number of columns, queued ones included
    pub fn num_columns(&self) -> usize {
        self.queued_columns
    }

    /// Number of rows, queued ones included
    pub fn num_rows(&self) -> usize {
        self.queued_rows
    }

    /// Objective sense
    pub fn sense(&self) -> LpObjective {
        self.sense
    }

    /// Constant term of the objective
    pub fn objective_constant(&self) -> f64 {
        self.objective_constant
    }

    /// Status of the last solve, [ModelStatus::Loaded] after any modification
    pub fn status(&self) -> ModelStatus {
        self.status
    }

    /// Objective value of the current solution
    pub fn objective_value(&self) -> NativeResult<f64> {
        self.solution
            .as_ref()
            .map(|s| s.objective)
            .ok_or(NativeError::AttributeUnavailable("ObjVal"))
    }

    /// Query a column attribute for several columns
    pub fn var_attr(&self, attr: VarAttr, cols: &[usize]) -> NativeResult<Vec<f64>> {
        let unavailable = || NativeError::AttributeUnavailable(attr.name());
        let per_column: Box<dyn Fn(usize) -> f64 + '_> = match attr {
            VarAttr::X => {
                let values = &self.solution.as_ref().ok_or_else(unavailable)?.values;
                Box::new(move |col| values[col])
            }
            VarAttr::RC => {
                let reduced_costs = self
                    .solution
                    .as_ref()
                    .and_then(|s| s.reduced_costs.as_ref())
                    .ok_or_else(unavailable)?;
                Box::new(move |col| reduced_costs[col])
            }
            VarAttr::LB => Box::new(|col| self.columns[col].lb),
            VarAttr::UB => Box::new(|col| self.columns[col].ub),
            VarAttr::Obj => Box::new(|col| self.columns[col].obj),
        };
        cols.iter()
            .map(|&col| {
                if col < self.columns.len() {
                    Ok(per_column(col))
                } else {
                    Err(NativeError::IndexOutOfRange {
                        kind: "column",
                        index: col,
                        len: self.columns.len(),
                    })
                }
            })
            .collect()
    }

    /// Query a row attribute for several rows
    pub fn constr_attr(&self, attr: ConstrAttr, rows: &[usize]) -> NativeResult<Vec<f64>> {
        let unavailable = || NativeError::AttributeUnavailable(attr.name());
        let per_row: Box<dyn Fn(usize) -> f64 + '_> = match attr {
            ConstrAttr::Pi => {
                let duals = self
                    .solution
                    .as_ref()
                    .and_then(|s| s.duals.as_ref())
                    .ok_or_else(unavailable)?;
                Box::new(move |row| duals[row])
            }
            ConstrAttr::Slack => {
                let slacks = &self.solution.as_ref().ok_or_else(unavailable)?.slacks;
                Box::new(move |row| slacks[row])
            }
            ConstrAttr::Rhs => Box::new(|row| self.rows[row].rhs),
        };
        rows.iter()
            .map(|&row| {
                if row < self.rows.len() {
                    Ok(per_row(row))
                } else {
                    Err(NativeError::IndexOutOfRange {
                        kind: "row",
                        index: row,
                        len: self.rows.len(),
                    })
                }
            })
            .collect()
    }

    /// Flush, then solve with `solver`
    pub fn optimize<S: SolverTrait>(
        &mut self,
        solver: &S,
        params: &Params,
    ) -> NativeResult<ModelStatus> {
        self.update();
        let view = LpView::new(self);
        info!(
            columns = self.columns.len(),
            rows = self.rows.len(),
            "optimizing"
        );
        let solution = solver.run(&view, params)?;
        let status = ModelStatus::from(solution.status);
        let stored = if status.has_solution() {
            Some(self.read_solution(&view, &solution))
        } else {
            None
        };
        info!(status = %status, "solver finished");
        self.status = status;
        self.solution = stored;
        Ok(status)
    }

    fn read_solution(&self, view: &LpView<'_>, solution: &Solution) -> NativeSolution {
        let lookup = |map: &HashMap<String, f64>, names: &[String]| -> Vec<f64> {
            names
                .iter()
                .map(|name| map.get(name).copied().unwrap_or(0.0))
                .collect()
        };
        let values = lookup(&solution.results, &view.column_names);
        let reduced_costs = Some(&solution.reduced_costs)
            .filter(|m| !m.is_empty())
            .map(|m| lookup(m, &view.column_names));
        let duals = Some(&solution.duals)
            .filter(|m| !m.is_empty())
            .map(|m| lookup(m, &view.row_names));
        let objective = self.objective_constant
            + self
                .columns
                .iter()
                .zip(&values)
                .map(|(c, x)| c.obj * x)
                .sum::<f64>();
        let slacks = self
            .rows
            .iter()
            .map(|row| {
                let activity: f64 = row.coefficients.iter().map(|&(c, a)| a * values[c]).sum();
                row.rhs - activity
            })
            .collect();
        NativeSolution {
            objective,
            values,
            reduced_costs,
            duals,
            slacks,
        }
    }

    /// Flush, then write the model to an .lp file.
    /// The objective constant is not part of the written model.
    pub fn write(&mut self, path: &Path) -> NativeResult<()> {
        check_lp_extension(path)?;
        self.update();
        let view = LpView::new(self);
        let mut file = fs::File::create(path)?;
        write!(file, "{}", view.display_lp())?;
        file.flush()?;
        info!(path = %path.display(), "model written");
        Ok(())
    }

    /// The flushed model as an [LpProblem]. Queued modifications are not part
    /// of the view, see [NativeModel::update].
    pub fn lp_view(&self) -> LpView<'_> {
        LpView::new(self)
    }

    /// Read a model from an .lp file
    pub fn read(path: &Path) -> NativeResult<NativeModel> {
        check_lp_extension(path)?;
        let text = fs::read_to_string(path)?;
        let file = parse_lp(&text)?;
        let name = if file.name.is_empty() {
            "model"
        } else {
            file.name.as_str()
        };
        let mut model = NativeModel::new(name);
        let position: HashMap<&str, usize> = file
            .variables
            .iter()
            .enumerate()
            .map(|(i, v)| (v.name.as_str(), i))
            .collect();
        let index = |terms: &[(String, f64)]| -> Vec<(usize, f64)> {
            terms
                .iter()
                .filter_map(|(name, c)| position.get(name.as_str()).map(|&i| (i, *c)))
                .collect()
        };
        model.columns = file
            .variables
            .iter()
            .map(|v| NativeColumn {
                lb: v.lower_bound,
                ub: v.upper_bound,
                obj: 0.0,
                var_type: v.var_type,
                name: Some(v.name.clone()),
            })
            .collect();
        for (col, value) in index(&file.objective) {
            model.columns[col].obj += value;
        }
        model.rows = file
            .constraints
            .iter()
            .map(|c| NativeRow {
                coefficients: index(&c.lhs),
                relation: c.operator,
                rhs: c.rhs,
                name: Some(c.name.clone()),
            })
            .collect();
        model.sense = file.sense;
        model.queued_columns = model.columns.len();
        model.queued_rows = model.rows.len();
        info!(
            path = %path.display(),
            columns = model.queued_columns,
            rows = model.queued_rows,
            "model read"
        );
        Ok(model)
    }
}

fn set_coefficient(entries: &mut Vec<(usize, f64)>, col: usize, value: f64) {
    match entries.iter().position(|&(c, _)| c == col) {
        Some(first) => {
            entries[first].1 = value;
            let mut i = 0;
            entries.retain(|&(c, _)| {
                let keep = c != col || i == first;
                i += 1;
                keep
            });
        }
        None => entries.push((col, value)),
    }
}

fn check_lp_extension(path: &Path) -> NativeResult<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("lp") => Ok(()),
        _ => Err(NativeError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// The flushed part of a [NativeModel] with the unique names it is written
/// and solved with. Rows and columns without a name become `c{i}` and `x{i}`.
#[derive(Debug)]
pub struct LpView<'m> {
    model: &'m NativeModel,
    name: String,
    column_names: Vec<String>,
    row_names: Vec<String>,
}

impl<'m> LpView<'m> {
    /// Name of every flushed column, in column order
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Name of every flushed row, in row order
    pub fn row_names(&self) -> &[String] {
        &self.row_names
    }

    fn new(model: &'m NativeModel) -> Self {
        let mut names = UniqueNameGenerator::default();
        names.reserve("obj");
        let column_names = model
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| match &c.name {
                Some(name) => names.add_variable(name).into_owned(),
                None => names.add_variable(&format!("x{}", i)).into_owned(),
            })
            .collect();
        let row_names = model
            .rows
            .iter()
            .enumerate()
            .map(|(i, r)| match &r.name {
                Some(name) => names.add_variable(name).into_owned(),
                None => names.add_variable(&format!("c{}", i)).into_owned(),
            })
            .collect();
        let name: String = model
            .name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        LpView {
            model,
            name: if name.is_empty() { "model".into() } else { name },
            column_names,
            row_names,
        }
    }
}

/// A column of an [LpView] under its written name
#[derive(Debug, Clone, Copy)]
pub struct ViewVariable<'a> {
    name: &'a str,
    column: &'a NativeColumn,
}

impl AsVariable for ViewVariable<'_> {
    fn name(&self) -> &str {
        self.name
    }

    fn var_type(&self) -> VarType {
        self.column.var_type
    }

    fn lower_bound(&self) -> f64 {
        self.column.lb
    }

    fn upper_bound(&self) -> f64 {
        self.column.ub
    }
}

impl<'a, 'm: 'a> LpProblem<'a> for LpView<'m> {
    type Variable = ViewVariable<'a>;
    type Expression = NamedTerms<'a>;
    type ConstraintIterator = Box<dyn Iterator<Item = Constraint<NamedTerms<'a>>> + 'a>;
    type VariableIterator = Box<dyn Iterator<Item = ViewVariable<'a>> + 'a>;

    fn name(&self) -> &str {
        &self.name
    }

    fn variables(&'a self) -> Self::VariableIterator {
        Box::new(
            self.column_names
                .iter()
                .zip(&self.model.columns)
                .map(|(name, column)| ViewVariable {
                    name: name.as_str(),
                    column,
                }),
        )
    }

    fn objective(&'a self) -> Self::Expression {
        let terms: Vec<(usize, f64)> = self
            .model
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.obj != 0.0)
            .map(|(i, c)| (i, c.obj))
            .collect();
        NamedTerms {
            terms: Cow::Owned(terms),
            names: &self.column_names,
        }
    }

    fn sense(&'a self) -> LpObjective {
        self.model.sense
    }

    fn constraints(&'a self) -> Self::ConstraintIterator {
        Box::new(
            self.model
                .rows
                .iter()
                .zip(&self.row_names)
                .map(move |(row, name)| Constraint {
                    name: name.clone(),
                    lhs: NamedTerms {
                        terms: Cow::Borrowed(&row.coefficients),
                        names: &self.column_names,
                    },
                    operator: row.relation,
                    rhs: row.rhs,
                }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_columns() -> NativeModel {
        let mut model = NativeModel::new("test");
        model
            .add_variables(&[0.0, 0.0], &[10.0, f64::INFINITY], None, None, None)
            .unwrap();
        model.update();
        model
    }

    #[test]
    fn queued_rows_get_indices_before_update() {
        let mut model = two_columns();
        let row = model
            .add_constraint(&[(0, 1.0), (1, 2.0)], Ordering::Less, 4.0, None)
            .unwrap();
        assert_eq!(row, 0);
        assert_eq!(model.num_rows(), 1);
        assert!(model.row(0).is_err());
        model.update();
        assert_eq!(model.row(0).unwrap(), vec![(0, 1.0), (1, 2.0)]);
    }

    #[test]
    fn changed_coefficients_replace_duplicates() {
        let mut model = two_columns();
        model
            .add_constraint(&[(0, 1.0), (1, 2.0), (0, 3.0)], Ordering::Equal, 1.0, None)
            .unwrap();
        model
            .change_coefficients(&[0, 0], &[0, 1], &[5.0, 0.0])
            .unwrap();
        model.update();
        assert_eq!(model.row(0).unwrap(), vec![(0, 5.0), (1, 0.0)]);
    }

    #[test]
    fn batched_arrays_must_agree() {
        let mut model = two_columns();
        let err = model.change_coefficients(&[0], &[0, 1], &[1.0]).unwrap_err();
        assert!(matches!(err, NativeError::LengthMismatch { .. }));
        let err = model
            .add_variables(&[0.0], &[1.0], Some(&[1.0, 2.0]), None, None)
            .unwrap_err();
        assert!(matches!(
            err,
            NativeError::LengthMismatch {
                expected: 1,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn unknown_indices_are_rejected() {
        let mut model = two_columns();
        assert!(matches!(
            model.add_constraint(&[(2, 1.0)], Ordering::Less, 1.0, None),
            Err(NativeError::IndexOutOfRange { kind: "column", .. })
        ));
        assert!(matches!(
            model.set_rhs(0, 1.0),
            Err(NativeError::IndexOutOfRange { kind: "row", .. })
        ));
    }

    #[test]
    fn objective_is_replaced_wholesale() {
        let mut model = two_columns();
        model
            .set_objective(&[(0, 1.0)], 0.0, LpObjective::Minimize)
            .unwrap();
        model
            .set_objective(&[(1, 3.0), (1, 1.0)], 2.0, LpObjective::Maximize)
            .unwrap();
        model.update();
        assert_eq!(model.var_attr(VarAttr::Obj, &[0, 1]).unwrap(), vec![0.0, 4.0]);
        assert_eq!(model.objective_constant(), 2.0);
        assert_eq!(model.sense(), LpObjective::Maximize);
    }

    #[test]
    fn solution_attributes_need_a_solution() {
        let model = two_columns();
        assert!(matches!(
            model.var_attr(VarAttr::X, &[0]),
            Err(NativeError::AttributeUnavailable("X"))
        ));
        assert_eq!(model.var_attr(VarAttr::UB, &[0]).unwrap(), vec![10.0]);
        assert_eq!(model.status(), ModelStatus::Loaded);
    }

    #[test]
    fn only_lp_files_are_supported() {
        let mut model = two_columns();
        let err = model.write(Path::new("model.mps")).unwrap_err();
        assert!(matches!(err, NativeError::UnsupportedFormat(_)));
    }

    #[test]
    fn written_names_are_unique() {
        let mut model = NativeModel::new("names");
        let names = vec![Some("x".to_string()), Some("x".to_string()), None];
        model
            .add_variables(&[0.0; 3], &[1.0; 3], None, None, Some(&names))
            .unwrap();
        model
            .add_constraint(&[(0, 1.0)], Ordering::Less, 1.0, Some("obj"))
            .unwrap();
        model.update();
        let view = LpView::new(&model);
        assert_eq!(view.column_names, vec!["x", "x2", "x22"]);
        assert_eq!(view.row_names, vec!["obj2"]);
    }
}
