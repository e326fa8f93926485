//! Error types, one enum per layer.
//!
//! [SolverError] comes from running an external solver program,
//! [NativeError] from the solver-side sparse model, and [ModelError] is what
//! the modeling facade returns to callers. Lower-layer errors are wrapped
//! unmodified.
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::variable::VarType;

/// Failure while writing a problem, launching a solver or reading its solution
#[derive(Error, Debug)]
pub enum SolverError {
    /// The temporary .lp file could not be written
    #[error("unable to create {solver} problem file: {source}")]
    ProblemFile {
        /// command name of the solver
        solver: String,
        /// underlying io error
        #[source]
        source: io::Error,
    },

    /// The solver binary could not be started
    #[error("error running {command}: {source}")]
    Launch {
        /// command that was run
        command: String,
        /// underlying io error
        #[source]
        source: io::Error,
    },

    /// The solver exited with a failure code
    #[error("{command} exited with {status}")]
    ExitStatus {
        /// command that was run
        command: String,
        /// exit status as reported by the OS
        status: String,
    },

    /// The solution file could not be opened
    #[error("cannot open solution file {}: {source}", path.display())]
    SolutionFile {
        /// path of the solution file
        path: PathBuf,
        /// underlying io error
        #[source]
        source: io::Error,
    },

    /// The solution file does not look like what the solver should produce
    #[error("incorrect solution format: {0}")]
    SolutionFormat(String),

    /// No solver of an [crate::solvers::AutoSolver] chain is installed
    #[error("no solver available")]
    NoSolverAvailable,
}

/// Failure reported by the solver-side model
#[derive(Error, Debug)]
pub enum NativeError {
    /// A row or column index that the native model does not hold
    #[error("{kind} index {index} is out of range ({len} registered)")]
    IndexOutOfRange {
        /// "row" or "column"
        kind: &'static str,
        /// offending index
        index: usize,
        /// number of registered entries
        len: usize,
    },

    /// Parallel arrays of a batched call disagree in length
    #[error("length mismatch for {what}: expected {expected}, found {found}")]
    LengthMismatch {
        /// which argument
        what: &'static str,
        /// expected length
        expected: usize,
        /// actual length
        found: usize,
    },

    /// The attribute has no value, e.g. no solution is loaded
    #[error("attribute {0} is not available")]
    AttributeUnavailable(&'static str),

    /// Only the .lp format can be written and read
    #[error("unsupported model file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// An .lp file could not be parsed
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// what went wrong
        message: String,
    },

    /// Reading or writing a model file failed
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The external solver failed
    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// Errors returned by the modeling facade
#[derive(Error, Debug)]
pub enum ModelError {
    /// A range with neither a finite lower nor a finite upper bound
    #[error("invalid range bounds [{lb}, {ub}]: at least one bound must be finite")]
    InvalidBounds {
        /// lower bound
        lb: f64,
        /// upper bound
        ub: f64,
    },

    /// A handle that does not belong to the live model
    #[error("{kind} {index} is not registered in the live model")]
    InvalidReference {
        /// "variable", "constraint" or "objective"
        kind: &'static str,
        /// index carried by the handle
        index: usize,
    },

    /// Array arguments disagree in length
    #[error("length mismatch for {what}: expected {expected}, found {found}")]
    LengthMismatch {
        /// which argument
        what: &'static str,
        /// expected length
        expected: usize,
        /// actual length
        found: usize,
    },

    /// A status code outside of the known status table
    #[error("unknown solver status code {0}")]
    UnknownStatus(i32),

    /// A parameter value outside of the parameter's domain
    #[error("invalid value {value} for parameter {name}")]
    InvalidParam {
        /// parameter name
        name: &'static str,
        /// rejected value
        value: f64,
    },

    /// The variable's bounds cannot hold values of the requested type
    #[error("cannot convert variable {index} with bounds [{lb}, {ub}] to {var_type:?}")]
    IncompatibleType {
        /// column index
        index: usize,
        /// lower bound
        lb: f64,
        /// upper bound
        ub: f64,
        /// requested type
        var_type: VarType,
    },

    /// Failure inside the native model or the external solver
    #[error(transparent)]
    Native(#[from] NativeError),
}

/// Result type of the modeling facade
pub type Result<T, E = ModelError> = std::result::Result<T, E>;
