//! This module provides the interface to different solvers.
//!
//! Every solver here is an external program. The problem is written to a
//! temporary .lp file, the program is run on it, and the solution file it
//! writes is parsed back. The solvers need to be installed on your system
//! and reachable through `PATH`, or configured with their `command_name`.
//!
//! Parameters from [Params] are translated to each program's command line.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::fs::File;
use std::path::Path;
use std::process::Command;

use tempfile::TempPath;
use tracing::{debug, warn};

use crate::error::SolverError;
use crate::lp_format::LpProblem;
use crate::params::Params;

pub use self::auto::*;
pub use self::cbc::*;
#[cfg(feature = "cplex")]
pub use self::cplex::*;
pub use self::glpk::*;
pub use self::gurobi::*;

pub mod auto;
pub mod cbc;
#[cfg(feature = "cplex")]
pub mod cplex;
pub mod glpk;
pub mod gurobi;

/// Outcome reported by a solver program
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Status {
    /// proven optimal
    Optimal,
    /// stopped with a feasible but not proven optimal solution
    SubOptimal,
    /// no feasible solution exists
    Infeasible,
    /// the objective is unbounded
    Unbounded,
    /// stopped on the time limit
    TimeLimit,
    /// stopped on an iteration limit
    IterationLimit,
    /// stopped by a signal
    Interrupted,
    /// the solver did not report a usable status
    NotSolved,
}

/// A solution as read from a solver's output, keyed by .lp names
#[derive(Debug, Clone)]
pub struct Solution {
    /// Solver status
    pub status: Status,
    /// Variable values. Solvers that only list non-zero values get 0 for the others.
    pub results: HashMap<String, f64>,
    /// Reduced costs by variable name, when the solver reports them
    pub reduced_costs: HashMap<String, f64>,
    /// Duals by constraint name, when the solver reports them
    pub duals: HashMap<String, f64>,
}

impl Solution {
    /// A solution with variable values only
    pub fn new(status: Status, results: HashMap<String, f64>) -> Solution {
        Solution {
            status,
            results,
            reduced_costs: HashMap::new(),
            duals: HashMap::new(),
        }
    }
}

/// A solver that can run an lp problem
pub trait SolverTrait {
    /// Solve the problem with the given parameters
    fn run<'a, P: LpProblem<'a>>(
        &self,
        problem: &'a P,
        params: &Params,
    ) -> Result<Solution, SolverError>;
}

/// Solvers whose results are read from a solution file
pub trait SolverWithSolutionParsing {
    /// Read the solution file, then delete it
    fn read_solution<'a, P: LpProblem<'a>>(
        &self,
        temp_solution_file: &Path,
        problem: Option<&'a P>,
    ) -> Result<Solution, SolverError> {
        let f = File::open(temp_solution_file).map_err(|source| SolverError::SolutionFile {
            path: temp_solution_file.to_path_buf(),
            source,
        })?;
        let res = self.read_specific_solution(&f, problem)?;
        let _ = fs::remove_file(temp_solution_file);
        Ok(res)
    }
    /// Parse the solver specific solution format
    fn read_specific_solution<'a, P: LpProblem<'a>>(
        &self,
        f: &File,
        problem: Option<&'a P>,
    ) -> Result<Solution, SolverError>;
}

/// A solver program that takes an .lp file and writes a solution file
pub trait SolverProgram {
    /// Name of the executable
    fn command_name(&self) -> &str;

    /// Command line arguments
    fn arguments(&self, lp_file: &Path, solution_file: &Path, params: &Params) -> Vec<OsString>;

    /// Where the solution should be written. A fresh temporary file when `None`.
    fn preferred_temp_solution_file(&self) -> Option<&Path> {
        None
    }

    /// Some solvers only report the status on their standard output
    fn parse_stdout_status(&self, _stdout: &[u8]) -> Option<Status> {
        None
    }

    /// Extension of the solution file
    fn solution_suffix(&self) -> Option<&str> {
        None
    }
}

enum TempSolutionFile<'a> {
    Preferred(&'a Path),
    Tmp(TempPath),
}

impl TempSolutionFile<'_> {
    fn path(&self) -> &Path {
        match self {
            TempSolutionFile::Preferred(p) => *p,
            TempSolutionFile::Tmp(p) => &**p,
        }
    }
}

impl<T: SolverWithSolutionParsing + SolverProgram> SolverTrait for T {
    fn run<'a, P: LpProblem<'a>>(
        &self,
        problem: &'a P,
        params: &Params,
    ) -> Result<Solution, SolverError> {
        let command_name = self.command_name();
        let file_model = problem
            .to_tmp_file()
            .map_err(|source| SolverError::ProblemFile {
                solver: command_name.to_string(),
                source,
            })?;
        let solution_file = match self.preferred_temp_solution_file() {
            Some(path) => TempSolutionFile::Preferred(path),
            None => TempSolutionFile::Tmp(
                tempfile::Builder::new()
                    .prefix(problem.name())
                    .suffix(self.solution_suffix().unwrap_or(".sol"))
                    .tempfile()
                    .map_err(|source| SolverError::ProblemFile {
                        solver: command_name.to_string(),
                        source,
                    })?
                    .into_temp_path(),
            ),
        };
        let arguments = self.arguments(file_model.path(), solution_file.path(), params);
        debug!(command = command_name, ?arguments, "running solver");

        let output = Command::new(command_name)
            .args(&arguments)
            .output()
            .map_err(|source| SolverError::Launch {
                command: command_name.to_string(),
                source,
            })?;
        if !output.status.success() {
            warn!(command = command_name, status = %output.status, "solver failed");
            return Err(SolverError::ExitStatus {
                command: command_name.to_string(),
                status: output.status.to_string(),
            });
        }
        if let Some(status) = self.parse_stdout_status(&output.stdout) {
            if status != Status::Optimal {
                return Ok(Solution::new(status, HashMap::new()));
            }
        }
        self.read_solution(solution_file.path(), Some(problem))
    }
}
