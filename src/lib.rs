#![deny(missing_docs)]
//! An algebraic modeling layer for linear and mixed integer programs.
//!
//! Models are built from variables, linear expressions, ranges and an
//! objective through [Model]. Every builder call is mirrored into a sparse
//! [native::NativeModel], which is written in the .lp file format and
//! solved by an external solver program (see [solvers]).

pub mod column;
pub mod error;
pub mod expr;
pub mod ids;
pub mod lp_format;
pub mod model;
pub mod native;
pub mod params;
pub mod range;
pub mod reconcile;
pub mod solvers;
pub mod status;
pub mod util;
pub mod variable;

pub use column::Column;
pub use error::{ModelError, NativeError, Result, SolverError};
pub use expr::{difference, product, scalar_product, sum, sum_vars, LinearExpr};
pub use ids::{ConstrRef, ModelId, VarRef};
pub use lp_format::LpObjective;
pub use model::{Environment, Model};
pub use params::{Algorithm, DoubleParam, IntParam, Params};
pub use range::{AsConstraint, Constraint, Objective, Range};
pub use status::ModelStatus;
pub use variable::{Var, VarType};
