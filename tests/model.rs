use std::cmp::Ordering;
use std::ffi::OsString;
use std::fs::File;
use std::path::Path;

use approx::assert_relative_eq;

use lp_modeling::error::SolverError;
use lp_modeling::lp_format::LpProblem;
use lp_modeling::native::VarAttr;
use lp_modeling::solvers::{
    CbcSolver, NoSolver, Solution, SolverProgram, SolverWithSolutionParsing,
};
use lp_modeling::{
    scalar_product, sum_vars, Environment, IntParam, LinearExpr, Model, ModelError, ModelStatus,
    NativeError, Params, Range, Var, VarType,
};

/// Answers every solve with a recorded cbc solution file
struct Replay {
    fixture: &'static str,
}

impl SolverProgram for Replay {
    fn command_name(&self) -> &str {
        "cp"
    }

    fn arguments(&self, _lp_file: &Path, solution_file: &Path, _params: &Params) -> Vec<OsString> {
        let fixture = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/solution_files")
            .join(self.fixture);
        vec![fixture.into(), solution_file.into()]
    }
}

impl SolverWithSolutionParsing for Replay {
    fn read_specific_solution<'a, P: LpProblem<'a>>(
        &self,
        f: &File,
        problem: Option<&'a P>,
    ) -> Result<Solution, SolverError> {
        CbcSolver::new().read_specific_solution(f, problem)
    }
}

fn model() -> Model<NoSolver> {
    Model::new("test", Environment::with_solver(NoSolver))
}

fn net_row(model: &mut Model<NoSolver>, range: &Range) -> Vec<(usize, f64)> {
    model.row_coefficients(range).unwrap().into_iter().collect()
}

#[test]
fn batched_variables_keep_their_bounds() {
    let mut m = model();
    let lbs = [0.0, -1.0, 2.0];
    let ubs = [1.0, 5.0, f64::INFINITY];
    let types = [VarType::Continuous, VarType::Integer, VarType::Continuous];
    let vars = m
        .add_vars(&lbs, &ubs, Some(&types[..]), Some(&["a", "b", "c"][..]))
        .unwrap();
    assert_eq!(vars.len(), 3);
    assert_eq!(m.num_vars(), 3);
    for (i, var) in vars.iter().enumerate() {
        assert_eq!(m.variable_bounds(var).unwrap(), (lbs[i], ubs[i]));
        assert_eq!(m.variable_type(var).unwrap(), types[i]);
        assert_eq!(var.index(), i);
    }
    assert_eq!(vars[1].name(), Some("b"));
}

#[test]
fn uniform_defaults_without_types_or_names() {
    let mut m = model();
    let vars = m.add_vars(&[0.0; 4], &[2.0; 4], None, None).unwrap();
    assert!(vars
        .iter()
        .all(|v| v.var_type() == VarType::Continuous && v.name().is_none()));
    let ints = m.int_var_array(2, 0.0, 9.0).unwrap();
    assert_eq!(m.variable_type(&ints[1]).unwrap(), VarType::Integer);
    let b = m.bool_var(Some("flag")).unwrap();
    assert_eq!(m.variable_bounds(&b).unwrap(), (0.0, 1.0));
    assert_eq!(m.variables().len(), 7);
}

#[test]
fn mismatched_arrays_are_rejected() {
    let mut m = model();
    let err = m.add_vars(&[0.0, 0.0], &[1.0], None, None).unwrap_err();
    assert!(matches!(
        err,
        ModelError::LengthMismatch {
            expected: 2,
            found: 1,
            ..
        }
    ));
    let err = m
        .add_vars(&[0.0, 0.0], &[1.0, 1.0], None, Some(&["x"][..]))
        .unwrap_err();
    assert!(matches!(err, ModelError::LengthMismatch { what: "names", .. }));
    let xs = m.num_var_array(2, 0.0, 1.0).unwrap();
    assert!(matches!(
        scalar_product(&[1.0], &xs),
        Err(ModelError::LengthMismatch { .. })
    ));
    assert_eq!(m.num_vars(), 2);
}

#[test]
fn two_sided_range_gets_a_slack() {
    let mut m = model();
    let x = m.num_var(0.0, 10.0, Some("x")).unwrap();
    let y = m.num_var(0.0, 10.0, Some("y")).unwrap();
    let expr = LinearExpr::term(&x, 1.0) + &LinearExpr::term(&y, 2.0) + 1.0;
    let range = m.add_range(2.0, expr, 5.0, Some("r")).unwrap();
    let slack = range.slack_var().unwrap().clone();
    assert_eq!(m.variable_bounds(&slack).unwrap(), (0.0, 3.0));
    assert_eq!(slack.name(), Some("r_slack"));
    assert_eq!(
        net_row(&mut m, &range),
        vec![(x.index(), 1.0), (y.index(), 2.0), (slack.index(), -1.0)]
    );
    let row = &m.native().rows()[range.index()];
    assert_eq!(row.relation, Ordering::Equal);
    // expr - slack = lb, with the constant moved to the right
    assert_eq!(row.rhs, 1.0);
    assert_eq!((range.lb(), range.ub()), (2.0, 5.0));
}

#[test]
fn equal_bounds_do_not_get_a_slack() {
    let mut m = model();
    let x = m.num_var(0.0, 10.0, None).unwrap();
    let range = m.add_eq(LinearExpr::term(&x, 3.0), 6.0, None).unwrap();
    assert!(range.slack_var().is_none());
    assert_eq!(m.num_vars(), 1);
    assert_eq!(m.native().rows()[0].relation, Ordering::Equal);
}

#[test]
fn one_sided_ranges() {
    let mut m = model();
    let x = m.num_var(0.0, 10.0, None).unwrap();
    let le = m.add_le(LinearExpr::term(&x, 1.0), 4.0, None).unwrap();
    let ge = m
        .add_range(1.0, LinearExpr::term(&x, 1.0), f64::MAX, None)
        .unwrap();
    assert!(le.slack_var().is_none() && ge.slack_var().is_none());
    assert_eq!(m.native().rows()[0].relation, Ordering::Less);
    assert_eq!(m.native().rows()[1].relation, Ordering::Greater);
}

#[test]
fn unbounded_ranges_are_rejected() {
    let mut m = model();
    let x = m.num_var(0.0, 10.0, None).unwrap();
    for (lb, ub) in [(f64::NEG_INFINITY, f64::INFINITY), (f64::MIN, f64::MAX)] {
        let err = m
            .add_range(lb, LinearExpr::term(&x, 1.0), ub, None)
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidBounds { .. }));
    }
    assert_eq!(m.num_constrs(), 0);
}

#[test]
fn installed_rows_read_back_as_their_expression() {
    let mut m = model();
    let xs = m.num_var_array(3, 0.0, 1.0).unwrap();
    let mut expr = sum_vars(&xs);
    expr.add_term(&xs[0], 2.5).add_term(&xs[2], -1.0);
    let range = m.add_le(expr.clone(), 8.0, None).unwrap();
    let expected: Vec<(usize, f64)> = expr
        .coefficients()
        .map(|(var, coeff)| (var.index(), coeff))
        .collect();
    assert_eq!(net_row(&mut m, &range), expected);
    assert_eq!(expected[2], (2, 0.0));
}

#[test]
fn replacing_with_the_same_expression_changes_nothing() {
    let mut m = model();
    let xs = m.num_var_array(2, 0.0, 1.0).unwrap();
    let expr = scalar_product(&[1.0, 4.0], &xs).unwrap();
    let mut range = m.add_range(0.0, expr.clone(), 3.0, None).unwrap();
    let before = net_row(&mut m, &range);
    m.replace_expression(&mut range, expr.clone()).unwrap();
    m.replace_expression(&mut range, expr.clone()).unwrap();
    assert_eq!(net_row(&mut m, &range), before);
    assert_eq!(range.expr(), &expr);
}

#[test]
fn replaced_rows_drop_old_terms_to_zero() {
    let mut m = model();
    let xs = m.num_var_array(3, 0.0, 1.0).unwrap();
    let mut range = m
        .add_range(1.0, sum_vars(&xs[..2]), 4.0, Some("r"))
        .unwrap();
    let slack = range.slack_var().unwrap().index();
    m.replace_expression(&mut range, LinearExpr::term(&xs[2], 3.0) + 1.0)
        .unwrap();
    assert_eq!(
        net_row(&mut m, &range),
        vec![(0, 0.0), (1, 0.0), (2, 3.0), (slack, -1.0)]
    );
    assert_eq!(m.native().rows()[range.index()].rhs, 0.0);
    // the bounds never change
    assert_eq!((range.lb(), range.ub()), (1.0, 4.0));
}

#[test]
fn repeated_replacement_keeps_only_the_latest() {
    let mut m = model();
    let xs = m.num_var_array(4, 0.0, 1.0).unwrap();
    let mut range = m.add_empty_range(f64::NEG_INFINITY, 10.0, None).unwrap();
    for (i, x) in xs.iter().enumerate() {
        let expr = LinearExpr::term(x, (i + 1) as f64);
        m.replace_expression(&mut range, expr).unwrap();
        let row = m.row_coefficients(&range).unwrap();
        let nonzero: Vec<_> = row.into_iter().filter(|&(_, c)| c != 0.0).collect();
        assert_eq!(nonzero, vec![(x.index(), (i + 1) as f64)]);
    }
}

#[test]
fn columns_join_objective_and_rows() {
    let mut m = model();
    let mut obj = m.add_minimize_empty().unwrap();
    let capacity = m.add_empty_range(0.0, 10.0, Some("capacity")).unwrap();
    let demand = m.add_empty_range(f64::NEG_INFINITY, 5.0, Some("demand")).unwrap();
    let column = m
        .objective_column(&obj, 5.0)
        .unwrap()
        .and(m.column(&capacity, 2.0).unwrap())
        .and(m.column(&demand, 1.0).unwrap());
    let v = m
        .add_var_with_column(column, 0.0, f64::INFINITY, VarType::Continuous, Some("v"))
        .unwrap();
    assert_eq!(
        m.native().var_attr(VarAttr::Obj, &[v.index()]).unwrap(),
        vec![5.0]
    );
    assert_eq!(m.row_coefficients(&capacity).unwrap()[&v.index()], 2.0);
    assert_eq!(m.row_coefficients(&demand).unwrap()[&v.index()], 1.0);
    // column coefficients are installed but not part of the handle's expression
    assert_eq!(obj.expr().coefficient(&v), None);
    assert_eq!(
        m.objective_coefficients().into_iter().collect::<Vec<_>>(),
        vec![(v.index(), 5.0)]
    );
    // the objective expression can still be replaced afterwards
    m.replace_objective_expression(&mut obj, LinearExpr::term(&v, 7.0))
        .unwrap();
    assert_eq!(
        m.native().var_attr(VarAttr::Obj, &[v.index()]).unwrap(),
        vec![7.0]
    );
}

#[test]
fn columns_need_installed_rows() {
    let mut other = model();
    let foreign = other.add_empty_range(0.0, 1.0, None).unwrap();
    let m = model();
    assert!(matches!(
        m.column(&foreign, 1.0),
        Err(ModelError::InvalidReference {
            kind: "constraint",
            ..
        })
    ));
}

#[test]
fn objective_updates_do_not_accumulate() {
    let mut m = model();
    let x = m.num_var(0.0, 1.0, Some("x")).unwrap();
    let y = m.num_var(0.0, 1.0, Some("y")).unwrap();
    let mut obj = m.add_maximize(LinearExpr::term(&x, 1.0)).unwrap();
    for i in 1..=5 {
        let coeff = i as f64;
        m.replace_objective_expression(&mut obj, LinearExpr::term(&x, coeff))
            .unwrap();
        m.set_linear_coef(&mut obj, &y, 2.0 * coeff).unwrap();
        assert_eq!(
            m.native().var_attr(VarAttr::Obj, &[0, 1]).unwrap(),
            vec![coeff, 2.0 * coeff]
        );
    }
    assert_eq!(obj.expr().coefficient(&x), Some(5.0));
    assert_eq!(obj.expr().coefficient(&y), Some(10.0));
}

#[test]
fn type_conversion_checks_bounds() {
    let mut m = model();
    let mut frac = m.num_var(0.0, 2.5, None).unwrap();
    let err = m.convert_type(&mut frac, VarType::Integer).unwrap_err();
    assert!(matches!(err, ModelError::IncompatibleType { .. }));
    assert_eq!(m.variable_type(&frac).unwrap(), VarType::Continuous);

    let mut whole = m.num_var(0.0, 3.0, None).unwrap();
    m.convert_type(&mut whole, VarType::Integer).unwrap();
    assert_eq!(whole.var_type(), VarType::Integer);
    assert_eq!(m.variable_type(&whole).unwrap(), VarType::Integer);
    assert!(m.convert_type(&mut whole, VarType::Binary).is_err());
}

#[test]
fn export_then_import() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.lp");
    let mut m = model();
    let x = m.int_var(0.0, 8.0, Some("x")).unwrap();
    let y = m.num_var(f64::NEG_INFINITY, 3.0, Some("y")).unwrap();
    let expr = LinearExpr::term(&x, 2.0) - &y;
    m.add_range(1.0, expr, 6.0, Some("r")).unwrap();
    m.add_minimize(LinearExpr::term(&x, 1.0) + &y).unwrap();
    m.export_model(&path).unwrap();

    m.import_model(&path).unwrap();
    assert_eq!(m.num_vars(), 3);
    assert_eq!(m.num_constrs(), 1);
    let names: Vec<_> = m.variables().iter().map(|v| v.name().unwrap_or("")).collect();
    assert_eq!(names, vec!["x", "y", "r_slack"]);
    let vars: Vec<Var> = m.variables().to_vec();
    assert_eq!(m.variable_type(&vars[0]).unwrap(), VarType::Integer);
    assert_eq!(m.variable_bounds(&vars[1]).unwrap(), (f64::NEG_INFINITY, 3.0));
    assert_eq!(m.variable_bounds(&vars[2]).unwrap(), (0.0, 5.0));
    assert_eq!(
        m.native().var_attr(VarAttr::Obj, &[0, 1, 2]).unwrap(),
        vec![1.0, 1.0, 0.0]
    );
    assert_eq!(
        m.native().rows()[0].coefficients,
        vec![(0, 2.0), (1, -1.0), (2, -1.0)]
    );

    // handles of the replaced model are stale
    assert!(matches!(
        m.variable_bounds(&x),
        Err(ModelError::InvalidReference { .. })
    ));
}

#[test]
fn keyword_names_survive_export() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keywords.lp");
    let mut m = model();
    let end = m.int_var(0.0, 5.0, Some("end")).unwrap();
    let x = m.int_var(0.0, 5.0, Some("x")).unwrap();
    let inf = m.num_var(0.0, 1.0, Some("inf")).unwrap();
    let nan = m.num_var(0.0, 1.0, Some("nan")).unwrap();
    m.add_le(sum_vars([&end, &x]), 4.0, Some("st")).unwrap();
    m.add_minimize(LinearExpr::term(&inf, 2.0) + &nan).unwrap();
    m.export_model(&path).unwrap();

    m.import_model(&path).unwrap();
    let imported: Vec<(&str, VarType)> = m
        .variables()
        .iter()
        .map(|v| (v.name().unwrap_or(""), v.var_type()))
        .collect();
    assert_eq!(
        imported,
        vec![
            ("vend", VarType::Integer),
            ("x", VarType::Integer),
            ("vinf", VarType::Continuous),
            ("vnan", VarType::Continuous),
        ]
    );
    assert_eq!(m.num_constrs(), 1);
    assert_eq!(
        m.native().var_attr(VarAttr::Obj, &[0, 1, 2, 3]).unwrap(),
        vec![0.0, 0.0, 2.0, 1.0]
    );
    assert_eq!(m.native().rows()[0].name.as_deref(), Some("vst"));
}

#[test]
fn only_lp_files_are_exported() {
    let dir = tempfile::tempdir().unwrap();
    let mut m = model();
    m.num_var(0.0, 1.0, None).unwrap();
    let err = m.export_model(dir.path().join("model.mps")).unwrap_err();
    assert!(matches!(
        err,
        ModelError::Native(NativeError::UnsupportedFormat(_))
    ));
}

#[test]
fn new_models_are_loaded() {
    let m = model();
    assert_eq!(m.status(), ModelStatus::Loaded);
    assert_eq!(m.status_label(), "Loaded");
    assert_eq!(m.status_code(), 1);
    assert!(m.objective_value().is_err());
}

#[test]
fn lazy_mode_flushes_before_reading_rows() {
    let mut m = model();
    m.set_int_param(IntParam::UpdateMode, 0).unwrap();
    let xs = m.num_var_array(2, 0.0, 1.0).unwrap();
    let mut range = m.add_ge(sum_vars(&xs), 1.0, None).unwrap();
    m.replace_expression(&mut range, LinearExpr::term(&xs[1], 2.0))
        .unwrap();
    assert!(m.native().has_pending_updates());
    assert_eq!(net_row(&mut m, &range), vec![(0, 0.0), (1, 2.0)]);
}

fn diet<S>(m: &mut Model<S>) -> (Vec<Var>, Vec<Range>) {
    let food = m
        .add_vars(
            &[0.0; 5],
            &[f64::INFINITY; 5],
            None,
            Some(&["bread", "milk", "cheese", "potato", "fish"][..]),
        )
        .unwrap();
    let protein = scalar_product(&[2.0, 0.0, 3.0, 1.0, 2.0], &food).unwrap();
    let fat = scalar_product(&[0.0, 1.0, 2.0, 2.0, 1.0], &food).unwrap();
    let rows = vec![
        m.add_ge(protein, 21.0, Some("protein")).unwrap(),
        m.add_ge(fat, 12.0, Some("fat")).unwrap(),
    ];
    m.add_minimize(scalar_product(&[20.0, 10.0, 31.0, 11.0, 12.0], &food).unwrap())
        .unwrap();
    (food, rows)
}

#[test]
fn diet_solution_is_relayed() {
    let mut m = Model::new(
        "diet",
        Environment::with_solver(Replay {
            fixture: "cbc_diet.sol",
        }),
    );
    let (food, rows) = diet(&mut m);
    let mut objectives = Vec::new();
    for _ in 0..2 {
        assert!(m.solve().unwrap());
        assert_eq!(m.status(), ModelStatus::Optimal);
        objectives.push(m.objective_value().unwrap());
    }
    assert_relative_eq!(objectives[0], 131.0);
    assert_eq!(objectives[0], objectives[1]);

    assert_eq!(
        m.get_values(&food).unwrap(),
        vec![0.0, 0.0, 0.0, 1.0, 10.0]
    );
    assert_eq!(m.get_value(&food[4]).unwrap(), 10.0);
    let duals = m.get_duals(&rows).unwrap();
    assert_relative_eq!(duals[0], 13.0 / 3.0, epsilon = 1e-6);
    assert_relative_eq!(duals[1], 10.0 / 3.0, epsilon = 1e-6);
    let reduced = m.get_reduced_costs(&food).unwrap();
    for (got, expected) in reduced.iter().zip([34.0 / 3.0, 20.0 / 3.0, 34.0 / 3.0, 0.0, 0.0]) {
        assert_relative_eq!(*got, expected, epsilon = 1e-6);
    }
    assert_eq!(m.get_slacks(&rows).unwrap(), vec![0.0, 0.0]);
    assert_eq!(m.get_slack(&rows[1]).unwrap(), 0.0);

    // any modification discards the solution
    m.num_var(0.0, 1.0, None).unwrap();
    assert_eq!(m.status(), ModelStatus::Loaded);
    assert!(m.get_value(&food[0]).is_err());
}

#[test]
fn infeasible_solve_has_no_values() {
    let mut m = Model::new(
        "diet",
        Environment::with_solver(Replay {
            fixture: "cbc_infeasible.sol",
        }),
    );
    let (food, rows) = diet(&mut m);
    assert!(!m.solve().unwrap());
    assert_eq!(m.status(), ModelStatus::Infeasible);
    assert_eq!(m.status_label(), "Infeasible");
    assert!(matches!(
        m.get_value(&food[0]),
        Err(ModelError::Native(NativeError::AttributeUnavailable("X")))
    ));
    assert!(m.get_dual(&rows[0]).is_err());
}
