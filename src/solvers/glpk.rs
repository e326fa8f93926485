//! The GNU Linear Programming Kit, through its `glpsol` executable
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::SolverError;
use crate::lp_format::*;
use crate::params::{Algorithm, Params};
use crate::solvers::{Solution, SolverProgram, SolverWithSolutionParsing, Status};

/// glpsol. Only variable values are read back: its printed report has no
/// stable layout for marginals.
#[derive(Debug, Clone)]
pub struct GlpkSolver {
    name: String,
    command_name: String,
    temp_solution_file: Option<PathBuf>,
}

impl Default for GlpkSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl GlpkSolver {
    /// create a solver instance
    pub fn new() -> GlpkSolver {
        GlpkSolver {
            name: "Glpk".to_string(),
            command_name: "glpsol".to_string(),
            temp_solution_file: None,
        }
    }

    /// set the name of the glpsol executable to use
    pub fn command_name(&self, command_name: String) -> GlpkSolver {
        GlpkSolver {
            command_name,
            ..self.clone()
        }
    }

    /// write the solution to this file instead of a temporary one
    pub fn with_temp_solution_file(&self, temp_solution_file: String) -> GlpkSolver {
        GlpkSolver {
            temp_solution_file: Some(temp_solution_file.into()),
            ..self.clone()
        }
    }

    /// Solver display name
    pub fn name(&self) -> &str {
        &self.name
    }
}

fn incorrect(what: &str) -> SolverError {
    SolverError::SolutionFormat(what.to_string())
}

fn read_size(line: Option<std::io::Result<String>>) -> Result<usize, SolverError> {
    match line {
        Some(Ok(l)) => l
            .split_whitespace()
            .nth(1)
            .and_then(|value| value.parse::<usize>().ok())
            .ok_or_else(|| incorrect("size line")),
        _ => Err(incorrect("missing size line")),
    }
}

impl SolverWithSolutionParsing for GlpkSolver {
    fn read_specific_solution<'a, P: LpProblem<'a>>(
        &self,
        f: &File,
        _problem: Option<&'a P>,
    ) -> Result<Solution, SolverError> {
        let mut vars_value: HashMap<_, _> = HashMap::new();

        let file = BufReader::new(f);

        let mut iter = file.lines();
        let row = read_size(iter.nth(1))?;
        let col = read_size(iter.next())?;
        let status = match iter.nth(1) {
            Some(Ok(status_line)) => match status_line.get(12..).map(str::trim) {
                Some("INTEGER OPTIMAL") | Some("OPTIMAL") => Status::Optimal,
                Some("INTEGER NON-OPTIMAL") | Some("FEASIBLE") => Status::SubOptimal,
                Some("INFEASIBLE (FINAL)") | Some("INTEGER EMPTY") => Status::Infeasible,
                Some("UNDEFINED") => Status::NotSolved,
                Some("INTEGER UNDEFINED") | Some("UNBOUNDED") => Status::Unbounded,
                _ => return Err(incorrect("unknown solution status")),
            },
            _ => return Err(incorrect("no solution status found")),
        };
        let mut result_lines = iter.skip(row + 7);
        for _ in 0..col {
            let mut line = match result_lines.next() {
                Some(Ok(l)) => l,
                _ => return Err(incorrect("not all columns are present")),
            };
            // names longer than the column width push the rest of the entry to the next line
            if line.split_whitespace().count() == 2 {
                match result_lines.next() {
                    Some(Ok(rest)) => {
                        line.push(' ');
                        line.push_str(&rest);
                    }
                    _ => return Err(incorrect("truncated column entry")),
                }
            }
            let result_line: Vec<_> = line.split_whitespace().collect();
            if result_line.len() >= 4 {
                match result_line[3].parse::<f64>() {
                    Ok(n) => {
                        vars_value.insert(result_line[1].to_string(), n);
                    }
                    Err(e) => return Err(SolverError::SolutionFormat(e.to_string())),
                }
            } else {
                return Err(incorrect("column line has too few fields"));
            }
        }
        Ok(Solution::new(status, vars_value))
    }
}

impl SolverProgram for GlpkSolver {
    fn command_name(&self) -> &str {
        &self.command_name
    }

    fn arguments(&self, lp_file: &Path, solution_file: &Path, params: &Params) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["--lp".into(), lp_file.into()];
        if let Some(seconds) = params.time_limit() {
            args.push("--tmlim".into());
            args.push((seconds.ceil() as u64).to_string().into());
        }
        if let Some(gap) = params.mip_gap() {
            args.push("--mipgap".into());
            args.push(gap.to_string().into());
        }
        match params.method() {
            Some(Algorithm::PRIMAL) => args.push("--primal".into()),
            Some(Algorithm::DUAL) => args.push("--dual".into()),
            Some(Algorithm::BARRIER) => args.push("--interior".into()),
            _ => {}
        }
        args.push("-o".into());
        args.push(solution_file.into());
        args
    }

    fn preferred_temp_solution_file(&self) -> Option<&Path> {
        self.temp_solution_file.as_deref()
    }
}
