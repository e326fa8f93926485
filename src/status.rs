//! Solve status of a model.
use std::fmt;

use crate::error::{ModelError, Result};
use crate::solvers::Status;

/// Status of the live model, with stable integer codes.
///
/// Codes outside of the known table are kept as [ModelStatus::Unknown]
/// rather than rejected, see [ModelStatus::from_code].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelStatus {
    /// No model loaded
    Unused,
    /// Model loaded, not solved since the last modification
    Loaded,
    /// Proven optimal solution available
    Optimal,
    /// Proven infeasible
    Infeasible,
    /// Infeasible or unbounded, the solver could not tell which
    InfeasibleOrUnbounded,
    /// Proven unbounded
    Unbounded,
    /// Objective worse than the cutoff value
    Cutoff,
    /// Stopped on the simplex iteration limit
    IterationLimit,
    /// Stopped on the branch-and-bound node limit
    NodeLimit,
    /// Stopped on the time limit
    TimeLimit,
    /// Stopped on the solution count limit
    SolutionLimit,
    /// Stopped by the user
    Interrupted,
    /// Stopped on numerical difficulties
    Numeric,
    /// Feasible solution, optimality not proven
    Suboptimal,
    /// An asynchronous solve is running
    InProgress,
    /// A code outside of the known table
    Unknown(i32),
}

const TABLE: [(ModelStatus, &str); 15] = [
    (ModelStatus::Unused, "Unused"),
    (ModelStatus::Loaded, "Loaded"),
    (ModelStatus::Optimal, "Optimal"),
    (ModelStatus::Infeasible, "Infeasible"),
    (ModelStatus::InfeasibleOrUnbounded, "InfeasibleOrUnbounded"),
    (ModelStatus::Unbounded, "Unbounded"),
    (ModelStatus::Cutoff, "Cutoff"),
    (ModelStatus::IterationLimit, "IterationLimit"),
    (ModelStatus::NodeLimit, "NodeLimit"),
    (ModelStatus::TimeLimit, "TimeLimit"),
    (ModelStatus::SolutionLimit, "SolutionLimit"),
    (ModelStatus::Interrupted, "Interrupted"),
    (ModelStatus::Numeric, "Numeric"),
    (ModelStatus::Suboptimal, "Suboptimal"),
    (ModelStatus::InProgress, "InProgress"),
];

impl ModelStatus {
    /// Status for a code, [ModelStatus::Unknown] if the code is not in the table
    pub fn from_code(code: i32) -> ModelStatus {
        ModelStatus::try_from_code(code).unwrap_or(ModelStatus::Unknown(code))
    }

    /// Status for a code, failing with [ModelError::UnknownStatus] outside of the table
    pub fn try_from_code(code: i32) -> Result<ModelStatus> {
        usize::try_from(code)
            .ok()
            .and_then(|i| TABLE.get(i))
            .map(|&(status, _)| status)
            .ok_or(ModelError::UnknownStatus(code))
    }

    /// Integer code of the status
    pub fn code(self) -> i32 {
        match self {
            ModelStatus::Unknown(code) => code,
            known => TABLE
                .iter()
                .position(|&(status, _)| status == known)
                .map_or(-1, |i| i as i32),
        }
    }

    /// Human readable label
    pub fn label(self) -> &'static str {
        match self {
            ModelStatus::Unknown(_) => "Unknown",
            known => TABLE
                .iter()
                .find(|&&(status, _)| status == known)
                .map_or("Unknown", |&(_, label)| label),
        }
    }

    /// Whether the solver may have left variable values behind
    pub fn has_solution(self) -> bool {
        matches!(
            self,
            ModelStatus::Optimal
                | ModelStatus::Suboptimal
                | ModelStatus::TimeLimit
                | ModelStatus::IterationLimit
                | ModelStatus::NodeLimit
                | ModelStatus::SolutionLimit
                | ModelStatus::Interrupted
        )
    }
}

impl fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelStatus::Unknown(code) => write!(f, "Unknown({})", code),
            known => f.write_str(known.label()),
        }
    }
}

impl From<Status> for ModelStatus {
    fn from(status: Status) -> Self {
        match status {
            Status::Optimal => ModelStatus::Optimal,
            Status::SubOptimal => ModelStatus::Suboptimal,
            Status::Infeasible => ModelStatus::Infeasible,
            Status::Unbounded => ModelStatus::Unbounded,
            Status::TimeLimit => ModelStatus::TimeLimit,
            Status::IterationLimit => ModelStatus::IterationLimit,
            Status::Interrupted => ModelStatus::Interrupted,
            Status::NotSolved => ModelStatus::Loaded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_the_table() {
        for code in 0..15 {
            assert_eq!(ModelStatus::from_code(code).code(), code);
        }
        assert_eq!(ModelStatus::from_code(2), ModelStatus::Optimal);
        assert_eq!(ModelStatus::from_code(5).label(), "Unbounded");
    }

    #[test]
    fn unknown_codes_fall_back() {
        assert_eq!(ModelStatus::from_code(15), ModelStatus::Unknown(15));
        assert_eq!(ModelStatus::from_code(-3).code(), -3);
        assert_eq!(ModelStatus::Unknown(99).label(), "Unknown");
        assert!(matches!(
            ModelStatus::try_from_code(42),
            Err(ModelError::UnknownStatus(42))
        ));
    }

    #[test]
    fn display_uses_labels() {
        assert_eq!(ModelStatus::InfeasibleOrUnbounded.to_string(), "InfeasibleOrUnbounded");
        assert_eq!(ModelStatus::Unknown(20).to_string(), "Unknown(20)");
    }
}
