//! Variable handles.
use crate::ids::{ModelId, VarRef};

/// Domain of a variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VarType {
    /// any real value between the bounds
    #[default]
    Continuous,
    /// integral values between the bounds
    Integer,
    /// 0 or 1
    Binary,
}

impl VarType {
    /// Whether the solver must give this variable an integral value
    pub fn is_integral(self) -> bool {
        !matches!(self, VarType::Continuous)
    }

    /// Whether values in `[lb, ub]` can be represented by this type.
    /// Infinite bounds are always accepted.
    pub fn accepts_bounds(self, lb: f64, ub: f64) -> bool {
        let integral = |b: f64| b.is_infinite() || b.fract() == 0.0;
        match self {
            VarType::Continuous => true,
            VarType::Integer => integral(lb) && integral(ub),
            VarType::Binary => integral(lb) && integral(ub) && lb >= 0.0 && ub <= 1.0,
        }
    }
}

/// A variable of a [crate::Model].
///
/// The handle is a thin alias over a column of the native model: it caches
/// what the variable was created with, but the column itself belongs to the
/// model. Cloning a handle does not create a new variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Var {
    id: VarRef,
    lb: f64,
    ub: f64,
    var_type: VarType,
    name: Option<String>,
}

impl Var {
    pub(crate) fn new(
        model: ModelId,
        index: usize,
        lb: f64,
        ub: f64,
        var_type: VarType,
        name: Option<String>,
    ) -> Self {
        Var {
            id: VarRef::new(model, index),
            lb,
            ub,
            var_type,
            name,
        }
    }

    /// Reference to the native column
    pub fn id(&self) -> VarRef {
        self.id
    }

    /// Position of the column in the native model
    pub fn index(&self) -> usize {
        self.id.index()
    }

    /// Lower bound given at creation, -INFINITY if unbounded
    pub fn lb(&self) -> f64 {
        self.lb
    }

    /// Upper bound given at creation, INFINITY if unbounded
    pub fn ub(&self) -> f64 {
        self.ub
    }

    /// Current type of the variable
    pub fn var_type(&self) -> VarType {
        self.var_type
    }

    /// Display name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn set_var_type(&mut self, var_type: VarType) {
        self.var_type = var_type;
    }

    pub(crate) fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_rejects_fractional_bounds() {
        assert!(VarType::Integer.accepts_bounds(0.0, 3.0));
        assert!(VarType::Integer.accepts_bounds(f64::NEG_INFINITY, 3.0));
        assert!(!VarType::Integer.accepts_bounds(0.0, 2.5));
        assert!(VarType::Continuous.accepts_bounds(0.0, 2.5));
    }

    #[test]
    fn binary_must_fit_in_unit_interval() {
        assert!(VarType::Binary.accepts_bounds(0.0, 1.0));
        assert!(!VarType::Binary.accepts_bounds(0.0, 2.0));
        assert!(!VarType::Binary.accepts_bounds(0.0, f64::INFINITY));
    }
}
