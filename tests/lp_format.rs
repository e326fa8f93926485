use std::cmp::Ordering;

use lp_modeling::lp_format::{parse_lp, LpObjective, LpProblem};
use lp_modeling::native::NativeModel;
use lp_modeling::VarType;

fn names(names: &[&str]) -> Vec<Option<String>> {
    names.iter().map(|n| Some(n.to_string())).collect()
}

fn int_problem() -> NativeModel {
    let mut model = NativeModel::new("int_problem");
    model
        .add_variables(
            &[-10., f64::NEG_INFINITY, 0.],
            &[10., 16.5, 1.],
            None,
            Some(&[VarType::Integer, VarType::Integer, VarType::Binary][..]),
            Some(&names(&["x", "y", "b"])[..]),
        )
        .unwrap();
    model
        .add_constraint(&[(0, 1.0), (1, -1.0)], Ordering::Less, -5.0, Some("c0"))
        .unwrap();
    model
        .set_objective(&[(0, 1.0), (1, -1.0)], 0.0, LpObjective::Maximize)
        .unwrap();
    model.update();
    model
}

#[test]
fn simple_problem() {
    let mut model = NativeModel::new("my_problem");
    model
        .add_variables(
            &[f64::NEG_INFINITY, 0.0, 1.],
            &[f64::INFINITY, f64::INFINITY, 10.],
            Some(&[2.0, 1.0, 0.0][..]),
            None,
            Some(&names(&["x", "y", "z"])[..]),
        )
        .unwrap();
    model
        .add_constraint(
            &[(0, 1.0), (1, 1.0), (2, 1.0)],
            Ordering::Greater,
            5.0,
            Some("c0"),
        )
        .unwrap();
    model.update();
    let expected_str = "\\ my_problem

Minimize
  obj: 2 x + y

Subject To
  c0: x + y + z >= 5

Bounds
  x free
  0 <= y
  1 <= z <= 10

End
";
    assert_eq!(model.lp_view().display_lp().to_string(), expected_str);
}

#[test]
fn with_integers() {
    let expected_str = "\\ int_problem

Maximize
  obj: x - y

Subject To
  c0: x - y <= -5

Bounds
  -10 <= x <= 10
  -inf <= y <= 16.5
  0 <= b <= 1

Generals
  x
  y

Binaries
  b

End
";
    let model = int_problem();
    assert_eq!(model.lp_view().display_lp().to_string(), expected_str);
}

#[test]
fn written_problems_read_back() {
    let model = int_problem();
    let text = model.lp_view().display_lp().to_string();
    let file = parse_lp(&text).unwrap();
    assert_eq!(file.name, "int_problem");
    assert_eq!(file.sense, LpObjective::Maximize);
    assert_eq!(
        file.objective,
        vec![("x".to_string(), 1.0), ("y".to_string(), -1.0)]
    );
    assert_eq!(file.constraints.len(), 1);
    assert_eq!(file.constraints[0].name, "c0");
    assert_eq!(file.constraints[0].operator, Ordering::Less);
    assert_eq!(file.constraints[0].rhs, -5.0);
    let names: Vec<&str> = file.variables.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["x", "y", "b"]);
    assert_eq!(file.variables[1].lower_bound, f64::NEG_INFINITY);
    assert_eq!(file.variables[1].upper_bound, 16.5);
    assert_eq!(file.variables[1].var_type, VarType::Integer);
    assert_eq!(file.variables[2].var_type, VarType::Binary);
}

#[test]
fn reader_accepts_other_writers() {
    let text = "\\ handwritten
max
 profit: 3 x +2 y
st
 -x + y <= 4
 cap: 2 x + y + 1 >= 3
bounds
 x <= 40
 -1e30 <= y <= 1e30
general
 x
end
";
    let file = parse_lp(text).unwrap();
    assert_eq!(file.sense, LpObjective::Maximize);
    assert_eq!(file.constraints[0].name, "R1");
    assert_eq!(file.constraints[1].name, "cap");
    // the constant moves to the right hand side
    assert_eq!(file.constraints[1].rhs, 2.0);
    let x = &file.variables[0];
    assert_eq!((x.name.as_str(), x.lower_bound, x.upper_bound), ("x", 0.0, 40.0));
    assert_eq!(x.var_type, VarType::Integer);
    let y = &file.variables[1];
    assert_eq!(y.lower_bound, f64::NEG_INFINITY);
    assert_eq!(y.upper_bound, f64::INFINITY);
}
