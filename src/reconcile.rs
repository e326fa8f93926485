//! Reconciliation of an installed row with a new set of coefficients.
//!
//! The installed row is read back from the native model, which may list a
//! column several times. [row_delta] zeroes every column of the installed row
//! and adds the desired coefficients on top, so the result covers the union
//! of both supports and can be applied with a single
//! [crate::native::NativeModel::change_coefficients] call.
use std::collections::BTreeMap;

/// Net coefficient of every column listed in a row
pub fn net_coefficients(entries: &[(usize, f64)]) -> BTreeMap<usize, f64> {
    let mut net = BTreeMap::new();
    for &(col, coeff) in entries {
        *net.entry(col).or_insert(0.0) += coeff;
    }
    net
}

/// Coefficients to set on one row, as parallel arrays
#[derive(Debug, Clone, PartialEq)]
pub struct RowDelta {
    /// columns to set
    pub columns: Vec<usize>,
    /// new net coefficient of each column
    pub values: Vec<f64>,
    noop: bool,
}

impl RowDelta {
    /// Whether applying the delta would leave every net coefficient unchanged
    pub fn is_noop(&self) -> bool {
        self.noop
    }

    /// Number of coefficients to set
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether there is nothing to set at all
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Delta taking `installed` to `desired`. Both may list a column more than once.
pub fn row_delta(installed: &[(usize, f64)], desired: &[(usize, f64)]) -> RowDelta {
    let old = net_coefficients(installed);
    let mut target: BTreeMap<usize, f64> = old.keys().map(|&col| (col, 0.0)).collect();
    for &(col, coeff) in desired {
        *target.entry(col).or_insert(0.0) += coeff;
    }
    let noop = target
        .iter()
        .all(|(col, value)| old.get(col) == Some(value));
    let (columns, values) = target.into_iter().unzip();
    RowDelta {
        columns,
        values,
        noop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_are_summed() {
        let net = net_coefficients(&[(2, 1.0), (0, 3.0), (2, -0.5)]);
        assert_eq!(net.into_iter().collect::<Vec<_>>(), vec![(0, 3.0), (2, 0.5)]);
    }

    #[test]
    fn old_only_columns_are_zeroed() {
        let delta = row_delta(&[(0, 1.0), (1, 2.0)], &[(1, 5.0), (3, 1.0)]);
        assert_eq!(delta.columns, vec![0, 1, 3]);
        assert_eq!(delta.values, vec![0.0, 5.0, 1.0]);
        assert!(!delta.is_noop());
    }

    #[test]
    fn same_coefficients_are_a_noop() {
        let delta = row_delta(&[(0, 1.0), (1, 2.0), (0, 1.0)], &[(0, 2.0), (1, 2.0)]);
        assert!(delta.is_noop());
        assert_eq!(delta.len(), 2);
    }

    #[test]
    fn new_zero_terms_are_not_a_noop() {
        let delta = row_delta(&[(0, 1.0)], &[(0, 1.0), (1, 0.0)]);
        assert!(!delta.is_noop());
        assert_eq!(delta.values, vec![1.0, 0.0]);
    }

    #[test]
    fn empty_rows() {
        let delta = row_delta(&[], &[]);
        assert!(delta.is_empty());
        assert!(delta.is_noop());
    }
}
