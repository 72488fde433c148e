//! Row cleaning for raw experiment arrays.

use tk_core::all_finite;
use tracing::debug;

use crate::error::{DataError, DataResult};

/// Minimum number of clean rows a dataset must keep.
pub const MIN_SAMPLES: usize = 3;

/// Cleaned, time-ordered columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Columns {
    pub t: Vec<f64>,
    pub u: Vec<f64>,
    pub y: Vec<f64>,
}

impl Columns {
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }
}

/// Truncate to the common length, drop rows with any non-finite value, sort by
/// time and keep the first row of every repeated timestamp.
///
/// # Errors
///
/// Returns [`DataError::InsufficientData`] if fewer than [`MIN_SAMPLES`] rows survive.
pub fn clean_columns(t: &[f64], u: &[f64], y: &[f64]) -> DataResult<Columns> {
    let n = t.len().min(u.len()).min(y.len());

    let mut rows: Vec<(f64, f64, f64)> = (0..n)
        .map(|i| (t[i], u[i], y[i]))
        .filter(|&(a, b, c)| all_finite(&[a, b, c]))
        .collect();

    // Stable sort keeps acquisition order among equal timestamps.
    rows.sort_by(|a, b| a.0.total_cmp(&b.0));
    rows.dedup_by(|next, kept| next.0 == kept.0);

    let dropped = n - rows.len();
    if dropped > 0 {
        debug!(dropped, kept = rows.len(), "cleaned dataset rows");
    }

    if rows.len() < MIN_SAMPLES {
        return Err(DataError::InsufficientData {
            count: rows.len(),
            required: MIN_SAMPLES,
        });
    }

    let mut cols = Columns {
        t: Vec::with_capacity(rows.len()),
        u: Vec::with_capacity(rows.len()),
        y: Vec::with_capacity(rows.len()),
    };
    for (a, b, c) in rows {
        cols.t.push(a);
        cols.u.push(b);
        cols.y.push(c);
    }
    Ok(cols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn truncates_to_common_length() {
        let c = clean_columns(&[0.0, 1.0, 2.0, 3.0], &[0.0; 3], &[1.0; 5]).unwrap();
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn drops_non_finite_rows() {
        let t = [0.0, 1.0, 2.0, 3.0, 4.0];
        let u = [0.0, f64::NAN, 1.0, 1.0, 1.0];
        let y = [0.0, 0.0, f64::INFINITY, 1.0, 1.0];
        let c = clean_columns(&t, &u, &y).unwrap();
        assert_eq!(c.t, vec![0.0, 3.0, 4.0]);
    }

    #[test]
    fn sorts_and_dedups_keeping_first() {
        let t = [2.0, 0.0, 1.0, 1.0];
        let u = [2.0, 0.0, 1.0, 9.0];
        let y = [20.0, 0.0, 10.0, 90.0];
        let c = clean_columns(&t, &u, &y).unwrap();
        assert_eq!(c.t, vec![0.0, 1.0, 2.0]);
        assert_eq!(c.u, vec![0.0, 1.0, 2.0]);
        assert_eq!(c.y, vec![0.0, 10.0, 20.0]);
    }

    #[test]
    fn too_few_rows() {
        let err = clean_columns(&[0.0, 0.0, 1.0], &[0.0; 3], &[0.0; 3]).unwrap_err();
        assert!(matches!(
            err,
            DataError::InsufficientData { count: 2, required: 3 }
        ));
    }

    proptest! {
        #[test]
        fn output_time_strictly_increasing(t in prop::collection::vec(-10.0_f64..10.0, 3..60)) {
            let u = vec![0.0; t.len()];
            let y = vec![0.0; t.len()];
            if let Ok(c) = clean_columns(&t, &u, &y) {
                prop_assert!(c.t.windows(2).all(|w| w[1] > w[0]));
            }
        }
    }
}
