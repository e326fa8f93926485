//! The COIN-OR Cbc solver
use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::SolverError;
use crate::lp_format::*;
use crate::params::Params;
use crate::solvers::{Solution, SolverProgram, SolverWithSolutionParsing, Status};

/// The open source Cbc solver, run through its `cbc` executable
#[derive(Debug, Clone)]
pub struct CbcSolver {
    name: String,
    command_name: String,
    temp_solution_file: Option<PathBuf>,
}

impl Default for CbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CbcSolver {
    /// create a solver instance
    pub fn new() -> CbcSolver {
        CbcSolver {
            name: "Cbc".to_string(),
            command_name: "cbc".to_string(),
            temp_solution_file: None,
        }
    }

    /// set the name of the cbc executable to use
    pub fn command_name(&self, command_name: String) -> CbcSolver {
        CbcSolver {
            command_name,
            ..self.clone()
        }
    }

    /// write the solution to this file instead of a temporary one
    pub fn with_temp_solution_file(&self, temp_solution_file: String) -> CbcSolver {
        CbcSolver {
            temp_solution_file: Some(temp_solution_file.into()),
            ..self.clone()
        }
    }

    /// Solver display name
    pub fn name(&self) -> &str {
        &self.name
    }
}

fn parse_status(header: &str) -> Result<Status, SolverError> {
    let words: Vec<&str> = header.split_whitespace().collect();
    let status = match words.as_slice() {
        [] => return Err(SolverError::SolutionFormat("empty cbc solution".to_string())),
        ["Optimal", ..] => Status::Optimal,
        // Infeasible status is either "Infeasible" or "Integer infeasible"
        ["Infeasible", ..] | ["Integer", "infeasible", ..] => Status::Infeasible,
        ["Unbounded", ..] => Status::Unbounded,
        ["Stopped", "on", "time", ..] => Status::TimeLimit,
        ["Stopped", "on", "iterations", ..] => Status::IterationLimit,
        ["Stopped", "on", "ctrl-c", ..] => Status::Interrupted,
        // "Stopped on difficulties" or "Stopped on solutions"
        ["Stopped", ..] => Status::SubOptimal,
        _ => Status::NotSolved,
    };
    Ok(status)
}

impl SolverWithSolutionParsing for CbcSolver {
    fn read_specific_solution<'a, P: LpProblem<'a>>(
        &self,
        f: &File,
        problem: Option<&'a P>,
    ) -> Result<Solution, SolverError> {
        let mut solution = Solution::new(Status::NotSolved, HashMap::new());
        let mut row_names = HashSet::new();

        // CBC keeps only non-zero values unless all rows and columns are printed
        if let Some(p) = problem {
            for var in p.variables() {
                solution.results.insert(var.name().to_string(), 0.0);
            }
            row_names.extend(p.constraints().map(|c| c.name));
        }

        let mut file = BufReader::new(f);
        let mut buffer = String::new();
        file.read_line(&mut buffer)
            .map_err(|e| SolverError::SolutionFormat(e.to_string()))?;
        solution.status = parse_status(&buffer)?;

        for line in file.lines() {
            let l = line.map_err(|e| SolverError::SolutionFormat(e.to_string()))?;
            let mut result_line: Vec<_> = l.split_whitespace().collect();
            if result_line.is_empty() {
                continue;
            }
            if result_line[0] == "**" {
                result_line.remove(0);
            };
            if result_line.len() != 4 {
                return Err(SolverError::SolutionFormat(format!(
                    "unexpected cbc line '{}'",
                    l
                )));
            }
            let name = result_line[1].to_string();
            let value: f64 = parse_field(result_line[2])?;
            let dual: f64 = parse_field(result_line[3])?;
            if row_names.contains(&name) {
                solution.duals.insert(name, dual);
            } else {
                solution.results.insert(name.clone(), value);
                solution.reduced_costs.insert(name, dual);
            }
        }
        Ok(solution)
    }
}

fn parse_field(field: &str) -> Result<f64, SolverError> {
    field
        .parse()
        .map_err(|e| SolverError::SolutionFormat(format!("'{}': {}", field, e)))
}

impl SolverProgram for CbcSolver {
    fn command_name(&self) -> &str {
        &self.command_name
    }

    fn arguments(&self, lp_file: &Path, solution_file: &Path, params: &Params) -> Vec<OsString> {
        let mut args = vec![lp_file.as_os_str().to_owned()];
        let options = [
            ("seconds", params.time_limit().map(|s| s.to_string())),
            ("threads", params.threads().map(|t| t.to_string())),
            ("ratioGap", params.mip_gap().map(|g| g.to_string())),
            ("integerTolerance", params.int_feas_tol().map(|t| t.to_string())),
        ];
        for (name, value) in options {
            if let Some(val) = value {
                args.push(name.into());
                args.push(val.into());
            }
        }
        args.extend_from_slice(&[
            "printingOptions".into(),
            "all".into(),
            "solve".into(),
            "solution".into(),
            solution_file.into(),
        ]);
        args
    }

    fn preferred_temp_solution_file(&self) -> Option<&Path> {
        self.temp_solution_file.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::DoubleParam;

    #[test]
    fn status_lines() {
        assert_eq!(
            parse_status("Optimal - objective value 10.00000000").unwrap(),
            Status::Optimal
        );
        assert_eq!(
            parse_status("Integer infeasible - objective value 0").unwrap(),
            Status::Infeasible
        );
        assert_eq!(
            parse_status("Stopped on time - objective value 12").unwrap(),
            Status::TimeLimit
        );
        assert_eq!(
            parse_status("Stopped on difficulties - objective value 3").unwrap(),
            Status::SubOptimal
        );
        assert!(parse_status("").is_err());
    }

    #[test]
    fn parameters_become_options() {
        let mut params = Params::default();
        params.set_double(DoubleParam::TimeLimit, 60.0).unwrap();
        let args = CbcSolver::new().arguments(Path::new("m.lp"), Path::new("m.sol"), &params);
        let args: Vec<_> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            vec!["m.lp", "seconds", "60", "printingOptions", "all", "solve", "solution", "m.sol"]
        );
    }
}
