//! Solver parameters, split in integer and real valued families so a value
//! can never be forwarded with the wrong type.
use crate::error::{ModelError, Result};

/// Integer valued parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntParam {
    /// Algorithm used for continuous problems, see [Algorithm]
    Method,
    /// Number of threads, 0 lets the solver decide
    Threads,
    /// 1 applies every modification to the native model immediately,
    /// 0 queues them until the next flush
    UpdateMode,
}

/// Real valued parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoubleParam {
    /// Wall clock limit in seconds, INFINITY for none
    TimeLimit,
    /// Integrality tolerance
    IntFeasTol,
    /// Relative MIP optimality gap
    MipGap,
}

/// Values of [IntParam::Method]
pub struct Algorithm;

impl Algorithm {
    /// let the solver choose
    pub const AUTOMATIC: i32 = -1;
    /// primal simplex
    pub const PRIMAL: i32 = 0;
    /// dual simplex
    pub const DUAL: i32 = 1;
    /// interior point
    pub const BARRIER: i32 = 2;
}

/// Parameter table of an [crate::Environment]
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    method: i32,
    threads: i32,
    update_mode: i32,
    time_limit: f64,
    int_feas_tol: f64,
    mip_gap: f64,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            method: Algorithm::AUTOMATIC,
            threads: 0,
            update_mode: 1,
            time_limit: f64::INFINITY,
            int_feas_tol: 1e-5,
            mip_gap: 1e-4,
        }
    }
}

impl IntParam {
    /// Parameter name as used in error messages
    pub fn name(self) -> &'static str {
        match self {
            IntParam::Method => "Method",
            IntParam::Threads => "Threads",
            IntParam::UpdateMode => "UpdateMode",
        }
    }
}

impl DoubleParam {
    /// Parameter name as used in error messages
    pub fn name(self) -> &'static str {
        match self {
            DoubleParam::TimeLimit => "TimeLimit",
            DoubleParam::IntFeasTol => "IntFeasTol",
            DoubleParam::MipGap => "MIPGap",
        }
    }
}

impl Params {
    /// Current value of an integer parameter
    pub fn get_int(&self, param: IntParam) -> i32 {
        match param {
            IntParam::Method => self.method,
            IntParam::Threads => self.threads,
            IntParam::UpdateMode => self.update_mode,
        }
    }

    /// Set an integer parameter, rejecting values outside of its domain
    pub fn set_int(&mut self, param: IntParam, value: i32) -> Result<()> {
        let valid = match param {
            IntParam::Method => (Algorithm::AUTOMATIC..=Algorithm::BARRIER).contains(&value),
            IntParam::Threads => value >= 0,
            IntParam::UpdateMode => value == 0 || value == 1,
        };
        if !valid {
            return Err(ModelError::InvalidParam {
                name: param.name(),
                value: f64::from(value),
            });
        }
        match param {
            IntParam::Method => self.method = value,
            IntParam::Threads => self.threads = value,
            IntParam::UpdateMode => self.update_mode = value,
        }
        Ok(())
    }

    /// Current value of a real parameter
    pub fn get_double(&self, param: DoubleParam) -> f64 {
        match param {
            DoubleParam::TimeLimit => self.time_limit,
            DoubleParam::IntFeasTol => self.int_feas_tol,
            DoubleParam::MipGap => self.mip_gap,
        }
    }

    /// Set a real parameter, rejecting values outside of its domain
    pub fn set_double(&mut self, param: DoubleParam, value: f64) -> Result<()> {
        let valid = match param {
            DoubleParam::TimeLimit => value >= 0.0,
            DoubleParam::IntFeasTol => (1e-9..=1e-1).contains(&value),
            DoubleParam::MipGap => value >= 0.0 && value.is_finite(),
        };
        if !valid {
            return Err(ModelError::InvalidParam {
                name: param.name(),
                value,
            });
        }
        match param {
            DoubleParam::TimeLimit => self.time_limit = value,
            DoubleParam::IntFeasTol => self.int_feas_tol = value,
            DoubleParam::MipGap => self.mip_gap = value,
        }
        Ok(())
    }

    /// Time limit, if one is set
    pub fn time_limit(&self) -> Option<f64> {
        Some(self.time_limit).filter(|t| t.is_finite())
    }

    /// Thread count, if one is set
    pub fn threads(&self) -> Option<u32> {
        u32::try_from(self.threads).ok().filter(|&t| t > 0)
    }

    /// Requested algorithm, if not automatic
    pub fn method(&self) -> Option<i32> {
        Some(self.method).filter(|&m| m != Algorithm::AUTOMATIC)
    }

    /// Whether modifications are applied immediately
    pub fn immediate_updates(&self) -> bool {
        self.update_mode == 1
    }

    /// MIP gap, if it differs from the default
    pub fn mip_gap(&self) -> Option<f64> {
        Some(self.mip_gap).filter(|&g| g != Params::default().mip_gap)
    }

    /// Integrality tolerance, if it differs from the default
    pub fn int_feas_tol(&self) -> Option<f64> {
        Some(self.int_feas_tol).filter(|&t| t != Params::default().int_feas_tol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let params = Params::default();
        assert_eq!(params.get_int(IntParam::UpdateMode), 1);
        assert_eq!(params.get_double(DoubleParam::TimeLimit), f64::INFINITY);
        assert_eq!(params.time_limit(), None);
        assert_eq!(params.threads(), None);
        assert_eq!(params.method(), None);
    }

    #[test]
    fn typed_round_trip() {
        let mut params = Params::default();
        params.set_int(IntParam::Method, Algorithm::DUAL).unwrap();
        params.set_double(DoubleParam::TimeLimit, 30.0).unwrap();
        assert_eq!(params.method(), Some(Algorithm::DUAL));
        assert_eq!(params.time_limit(), Some(30.0));
    }

    #[test]
    fn out_of_domain_values_are_rejected() {
        let mut params = Params::default();
        assert!(matches!(
            params.set_int(IntParam::Method, 7),
            Err(ModelError::InvalidParam { name: "Method", .. })
        ));
        assert!(params.set_double(DoubleParam::TimeLimit, -1.0).is_err());
        assert!(params.set_double(DoubleParam::MipGap, f64::NAN).is_err());
        assert!(params.set_int(IntParam::UpdateMode, 2).is_err());
        assert_eq!(params, Params::default());
    }
}
