//! The proprietary gurobi solver
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::SolverError;
use crate::lp_format::*;
use crate::params::Params;
use crate::solvers::{Solution, SolverProgram, SolverWithSolutionParsing, Status};
use crate::util::buf_contains;

/// The proprietary gurobi solver, through its `gurobi_cl` command line tool
#[derive(Debug, Clone)]
pub struct GurobiSolver {
    name: String,
    command_name: String,
    temp_solution_file: Option<PathBuf>,
}

impl Default for GurobiSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl GurobiSolver {
    /// create a solver instance
    pub fn new() -> GurobiSolver {
        GurobiSolver {
            name: "Gurobi".to_string(),
            command_name: "gurobi_cl".to_string(),
            temp_solution_file: None,
        }
    }

    /// set the name of the commandline gurobi executable to use
    pub fn command_name(&self, command_name: String) -> GurobiSolver {
        GurobiSolver {
            command_name,
            ..self.clone()
        }
    }

    /// Solver display name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl SolverWithSolutionParsing for GurobiSolver {
    fn read_specific_solution<'a, P: LpProblem<'a>>(
        &self,
        f: &File,
        _problem: Option<&'a P>,
    ) -> Result<Solution, SolverError> {
        let mut vars_value: HashMap<_, _> = HashMap::new();
        for line in BufReader::new(f).lines() {
            let l = line.map_err(|e| SolverError::SolutionFormat(e.to_string()))?;
            // header and objective value are comments
            if l.starts_with('#') || l.trim().is_empty() {
                continue;
            }
            let result_line: Vec<_> = l.split_whitespace().collect();
            if result_line.len() != 2 {
                return Err(SolverError::SolutionFormat(format!(
                    "unexpected gurobi line '{}'",
                    l
                )));
            }
            let value = result_line[1]
                .parse::<f64>()
                .map_err(|e| SolverError::SolutionFormat(e.to_string()))?;
            vars_value.insert(result_line[0].to_string(), value);
        }
        Ok(Solution::new(Status::Optimal, vars_value))
    }
}

impl SolverProgram for GurobiSolver {
    fn command_name(&self) -> &str {
        &self.command_name
    }

    fn arguments(&self, lp_file: &Path, solution_file: &Path, params: &Params) -> Vec<OsString> {
        let mut result_file: OsString = "ResultFile=".into();
        result_file.push(solution_file.as_os_str());
        let mut args = vec![result_file];
        let settings = [
            ("TimeLimit", params.time_limit().map(|v| v.to_string())),
            ("Threads", params.threads().map(|v| v.to_string())),
            ("Method", params.method().map(|v| v.to_string())),
            ("MIPGap", params.mip_gap().map(|v| v.to_string())),
            ("IntFeasTol", params.int_feas_tol().map(|v| v.to_string())),
        ];
        for (name, value) in settings {
            if let Some(value) = value {
                args.push(format!("{}={}", name, value).into());
            }
        }
        args.push(lp_file.into());
        args
    }

    fn preferred_temp_solution_file(&self) -> Option<&Path> {
        self.temp_solution_file.as_deref()
    }

    fn parse_stdout_status(&self, stdout: &[u8]) -> Option<Status> {
        if buf_contains(stdout, "Optimal solution found") {
            Some(Status::Optimal)
        } else if buf_contains(stdout, "Time limit reached") {
            Some(Status::TimeLimit)
        } else if buf_contains(stdout, "unbounded") {
            Some(Status::Unbounded)
        } else if buf_contains(stdout, "infeasible") {
            Some(Status::Infeasible)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{DoubleParam, IntParam};

    #[test]
    fn settings_are_key_value_pairs() {
        let mut params = Params::default();
        params.set_int(IntParam::Threads, 2).unwrap();
        params.set_double(DoubleParam::MipGap, 0.01).unwrap();
        let args = GurobiSolver::new().arguments(Path::new("m.lp"), Path::new("m.sol"), &params);
        assert_eq!(
            args,
            vec![
                OsString::from("ResultFile=m.sol"),
                OsString::from("Threads=2"),
                OsString::from("MIPGap=0.01"),
                OsString::from("m.lp"),
            ]
        );
    }

    #[test]
    fn stdout_status() {
        let solver = GurobiSolver::new();
        assert_eq!(
            solver.parse_stdout_status(b"Model is infeasible\n"),
            Some(Status::Infeasible)
        );
        assert_eq!(
            solver.parse_stdout_status(b"Time limit reached\nBest objective 3"),
            Some(Status::TimeLimit)
        );
        assert_eq!(solver.parse_stdout_status(b"Read LP format model"), None);
    }
}
