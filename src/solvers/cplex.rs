//! The IBM CPLEX optimizer.
//! You need to activate the "cplex" feature of this crate to use this solver.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::File;
use std::path::Path;

use xml::attribute::OwnedAttribute;
use xml::reader::XmlEvent;
use xml::EventReader;

use crate::error::SolverError;
use crate::lp_format::LpProblem;
use crate::params::Params;
use crate::solvers::{Solution, SolverProgram, SolverWithSolutionParsing, Status};
use crate::util::buf_contains;

/// IBM cplex optimizer
#[derive(Debug, Clone)]
pub struct Cplex {
    command: String,
}

impl Default for Cplex {
    fn default() -> Self {
        Self {
            command: "cplex".into(),
        }
    }
}

impl Cplex {
    /// Create a cplex solver from the given binary
    pub fn with_command(command: String) -> Self {
        Self { command }
    }
}

macro_rules! format_osstr {
    ($($parts:expr)*) => {{
        let mut s = OsString::new();
        $(s.push($parts);)*
        s
    }}
}

impl SolverProgram for Cplex {
    fn command_name(&self) -> &str {
        &self.command
    }

    fn arguments(&self, lp_file: &Path, solution_file: &Path, params: &Params) -> Vec<OsString> {
        let mut args = vec!["-c".into(), format_osstr!("READ \"" lp_file "\"")];
        if let Some(seconds) = params.time_limit() {
            args.push(format!("set timelimit {}", seconds).into());
        }
        if let Some(threads) = params.threads() {
            args.push(format!("set threads {}", threads).into());
        }
        args.push("optimize".into());
        args.push(format_osstr!("WRITE \"" solution_file "\""));
        args
    }

    fn parse_stdout_status(&self, stdout: &[u8]) -> Option<Status> {
        if buf_contains(stdout, "No solution exists") {
            Some(Status::Infeasible)
        } else {
            None
        }
    }

    fn solution_suffix(&self) -> Option<&str> {
        Some(".sol")
    }
}

fn attribute_map(attributes: Vec<OwnedAttribute>) -> HashMap<String, String> {
    attributes
        .into_iter()
        .map(|attr| (attr.name.local_name, attr.value))
        .collect()
}

fn parse_value(element: &str, name: &str, raw: &str) -> Result<f64, SolverError> {
    raw.parse().map_err(|e| {
        SolverError::SolutionFormat(format!("invalid {} value for {:?}: {}", element, name, e))
    })
}

fn status_from_string(status: &str) -> Status {
    let status = status.to_ascii_lowercase();
    if status.contains("infeasible") {
        Status::Infeasible
    } else if status.contains("unbounded") {
        Status::Unbounded
    } else if status.contains("time limit") {
        Status::TimeLimit
    } else if status.contains("optimal") {
        Status::Optimal
    } else {
        Status::SubOptimal
    }
}

impl SolverWithSolutionParsing for Cplex {
    fn read_specific_solution<'a, P: LpProblem<'a>>(
        &self,
        f: &File,
        problem: Option<&'a P>,
    ) -> Result<Solution, SolverError> {
        let len = problem.map(|p| p.variables().size_hint().0).unwrap_or(0);
        let parser = EventReader::new(f);
        let mut solution = Solution::new(Status::Optimal, HashMap::with_capacity(len));
        for e in parser {
            match e {
                Ok(XmlEvent::StartElement {
                    name, attributes, ..
                }) => {
                    let attrs = attribute_map(attributes);
                    match name.local_name.as_str() {
                        "header" => {
                            if let Some(status) = attrs.get("solutionStatusString") {
                                solution.status = status_from_string(status);
                            }
                        }
                        "variable" => {
                            if let Some(var) = attrs.get("name") {
                                if let Some(raw) = attrs.get("value") {
                                    let value = parse_value("variable", var, raw)?;
                                    solution.results.insert(var.clone(), value);
                                }
                                if let Some(raw) = attrs.get("reducedCost") {
                                    let value = parse_value("reduced cost", var, raw)?;
                                    solution.reduced_costs.insert(var.clone(), value);
                                }
                            }
                        }
                        "constraint" => {
                            if let (Some(row), Some(raw)) = (attrs.get("name"), attrs.get("dual")) {
                                let value = parse_value("dual", row, raw)?;
                                solution.duals.insert(row.clone(), value);
                            }
                        }
                        _ => {}
                    }
                }
                Err(e) => return Err(SolverError::SolutionFormat(format!("xml error: {}", e))),
                _ => {}
            }
        }
        Ok(solution)
    }
}
