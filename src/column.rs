//! Columns: what a variable contributes to the objective and to existing rows.
//!
//! A [Column] is built with [crate::Model::objective_column] and
//! [crate::Model::column], combined with [Column::and], then consumed by
//! [crate::Model::add_var_with_column].
use std::collections::BTreeMap;

use crate::ids::{ConstrRef, ModelId};

/// An objective coefficient plus coefficients in existing rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Column {
    objective: Option<(ModelId, u64, f64)>,
    terms: BTreeMap<ConstrRef, f64>,
}

impl Column {
    /// A column that contributes nothing
    pub fn new() -> Column {
        Column::default()
    }

    pub(crate) fn for_objective(model: ModelId, generation: u64, coeff: f64) -> Column {
        Column {
            objective: Some((model, generation, coeff)),
            terms: BTreeMap::new(),
        }
    }

    pub(crate) fn for_constraint(row: ConstrRef, coeff: f64) -> Column {
        Column {
            objective: None,
            terms: BTreeMap::from([(row, coeff)]),
        }
    }

    /// Merge two columns. The objective coefficient of `other` wins if it has
    /// one; row coefficients accumulate.
    pub fn and(mut self, other: Column) -> Column {
        if other.objective.is_some() {
            self.objective = other.objective;
        }
        for (row, coeff) in other.terms {
            *self.terms.entry(row).or_insert(0.0) += coeff;
        }
        self
    }

    /// Objective coefficient, if one was set
    pub fn objective_coefficient(&self) -> Option<f64> {
        self.objective.map(|(_, _, coeff)| coeff)
    }

    pub(crate) fn objective(&self) -> Option<(ModelId, u64, f64)> {
        self.objective
    }

    /// Row coefficients
    pub fn terms(&self) -> impl Iterator<Item = (ConstrRef, f64)> + '_ {
        self.terms.iter().map(|(&row, &coeff)| (row, coeff))
    }
}
