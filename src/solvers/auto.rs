//! Auto solvers automatically find which of their child solvers is installed on
//! the user's computer and uses it. The [AllSolvers] solvers tries all the supported solvers.

use tracing::debug;

use crate::error::SolverError;
use crate::lp_format::LpProblem;
use crate::native::NativeModel;
use crate::params::Params;
#[cfg(feature = "cplex")]
use crate::solvers::cplex::Cplex;
use crate::solvers::{CbcSolver, GlpkSolver, GurobiSolver, Solution};

use super::SolverTrait;

/// A solver that tries multiple solvers
#[derive(Debug, Clone)]
pub struct AutoSolver<SOLVER, NEXT>(SOLVER, NEXT);

/// The tail of a list of solvers. This one has no children and never finds any solver.
#[derive(Debug, Clone, Default)]
pub struct NoSolver;

#[cfg(not(feature = "cplex"))]
type Cplex = NoSolver;

/// An [AutoSolver] that tries, in order: Gurobi, Cplex, Cbc and Glpk
pub type AllSolvers = AutoSolver<
    GurobiSolver,
    AutoSolver<Cplex, AutoSolver<CbcSolver, AutoSolver<GlpkSolver, NoSolver>>>,
>;

impl SolverTrait for NoSolver {
    fn run<'a, P: LpProblem<'a>>(
        &self,
        _problem: &'a P,
        _params: &Params,
    ) -> Result<Solution, SolverError> {
        Err(SolverError::NoSolverAvailable)
    }
}

/// The default AutoSolver contains all supported solvers
impl<A: Default, B: Default> Default for AutoSolver<A, B> {
    fn default() -> Self {
        AutoSolver(A::default(), B::default())
    }
}

impl<SOLVER: Default, NEXT: Default> AutoSolver<SOLVER, NEXT> {
    /// Instantiate an AutoSolver with all supported solvers
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiate an AutoSolver with the given solvers
    pub fn with_solver<NewSolver>(self, solver: NewSolver) -> AutoSolver<NewSolver, Self> {
        AutoSolver(solver, self)
    }
}

impl<S: SolverTrait, T: SolverTrait> SolverTrait for AutoSolver<S, T> {
    fn run<'a, P: LpProblem<'a>>(
        &self,
        problem: &'a P,
        params: &Params,
    ) -> Result<Solution, SolverError> {
        // Try solving a tiny model first, so a large one is only written for an installed solver
        let probe = NativeModel::probe();
        match self.0.run(&probe.lp_view(), params) {
            Ok(_) => self.0.run(problem, params),
            Err(e) => {
                debug!(error = %e, "solver unavailable, trying the next one");
                self.1.run(problem, params)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_chain_reports_no_solver() {
        let chain = AutoSolver::<NoSolver, NoSolver>::new();
        let probe = NativeModel::probe();
        let err = chain.run(&probe.lp_view(), &Params::default()).unwrap_err();
        assert!(matches!(err, SolverError::NoSolverAvailable));
    }
}
