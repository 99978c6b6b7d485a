//! Target assembly — label series to loss-ready tensors.
//!
//! Layouts:
//! - per-stream targets `(T, 1, 4)`: one stream as a single event type;
//! - stacked targets `(T, N, 4)`: all streams as concurrent event types of
//!   one sequence, so the loss sums over them;
//! - labelled matrix `(N, T, 4 + ncov)`: `(tse, tte, uncensored, eligible)`
//!   followed by covariates, the storage format consumed by
//!   [`split_matrix`].
//!
//! [`split_matrix`] drops `tte` and `uncensored` from the covariates (they
//! are future information) and keeps `tse`/`eligible` as inputs; targets
//! are the first four columns with negatives (padding) clamped to 0.
use ndarray::{s, Array3, Array4, ArrayView3, ArrayView4, Axis};

use crate::events::{
    core::transform::DerivedSeries,
    errors::{EventError, EventResult},
};

/// Number of target columns.
pub const TARGET_COLUMNS: usize = 4;

impl DerivedSeries {
    /// `(T, 1, 4)` targets for stream `stream`.
    ///
    /// # Errors
    /// [`EventError::StreamOutOfRange`].
    pub fn stream_targets(&self, stream: usize) -> EventResult<Array3<f64>> {
        if stream >= self.streams() {
            return Err(EventError::StreamOutOfRange { stream, streams: self.streams() });
        }
        let t = self.timesteps();
        let mut out = Array3::<f64>::zeros((t, 1, TARGET_COLUMNS));
        for (col, series) in self.series().into_iter().enumerate() {
            out.slice_mut(s![.., 0, col]).assign(&series.row(stream));
        }
        Ok(out)
    }

    /// `(T, N, 4)` targets with every stream as an event type.
    pub fn stacked_targets(&self) -> Array3<f64> {
        let mut out = Array3::<f64>::zeros((self.timesteps(), self.streams(), TARGET_COLUMNS));
        for (col, series) in self.series().into_iter().enumerate() {
            out.slice_mut(s![.., .., col]).assign(&series.t());
        }
        out
    }

    /// `(N, T, 4 + ncov)` labelled matrix: targets then covariates.
    ///
    /// # Errors
    /// [`EventError::ShapeMismatch`] when `covariates` is not
    /// `(N, T, ncov)`.
    pub fn labelled_matrix(&self, covariates: ArrayView3<'_, f64>) -> EventResult<Array3<f64>> {
        let (n, t, ncov) = covariates.dim();
        if n != self.streams() || t != self.timesteps() {
            return Err(EventError::ShapeMismatch {
                covariates: covariates.shape().to_vec(),
                targets: vec![self.streams(), self.timesteps()],
            });
        }
        let mut out = Array3::<f64>::zeros((n, t, TARGET_COLUMNS + ncov));
        for (col, series) in self.series().into_iter().enumerate() {
            out.slice_mut(s![.., .., col]).assign(series);
        }
        out.slice_mut(s![.., .., TARGET_COLUMNS..]).assign(&covariates);
        Ok(out)
    }

    fn series(&self) -> [&ndarray::Array2<f64>; TARGET_COLUMNS] {
        [self.tse(), self.tte(), self.uncensored(), self.eligible()]
    }
}

/// Split a labelled `(nobs, nseq, nvar)` matrix into model inputs and targets.
///
/// Returns
/// -------
/// - `x`: `(nobs, nseq, nvar - 2)`, every column except `tte` (1) and
///   `uncensored` (2).
/// - `y`: `(nobs, nseq, 1, 4)`, the first four columns with values below 0
///   set to 0.
///
/// # Errors
/// [`EventError::TooFewColumns`] when `nvar < 4`.
pub fn split_matrix(m: ArrayView3<'_, f64>) -> EventResult<(Array3<f64>, Array4<f64>)> {
    let (nobs, nseq, nvar) = m.dim();
    if nvar < TARGET_COLUMNS {
        return Err(EventError::TooFewColumns { found: nvar });
    }
    let keep: Vec<usize> = (0..nvar).filter(|&c| c != 1 && c != 2).collect();
    let x = m.select(Axis(2), &keep);

    let mut y = Array4::<f64>::zeros((nobs, nseq, 1, TARGET_COLUMNS));
    y.slice_mut(s![.., .., 0, ..]).assign(&m.slice(s![.., .., ..TARGET_COLUMNS]));
    y.mapv_inplace(|v| if v < 0.0 { 0.0 } else { v });
    Ok((x, y))
}

/// Scale seed: mean TSE at the final timestep, `mean(y[:, -1, 0, 0])`.
///
/// This is the maximum-likelihood scale of a shape-1 hazard when every
/// stream is censored at the end of observation.
///
/// # Errors
/// [`EventError::InvalidInitialScale`] when the mean is not positive and
/// finite (including an empty `y`).
pub fn initial_scale(y: ArrayView4<'_, f64>) -> EventResult<f64> {
    let nseq = y.len_of(Axis(1));
    if y.len_of(Axis(0)) == 0 || nseq == 0 {
        return Err(EventError::InvalidInitialScale { value: f64::NAN });
    }
    let value = y.slice(s![.., nseq - 1, 0, 0]).mean().unwrap_or(f64::NAN);
    if !(value.is_finite() && value > 0.0) {
        return Err(EventError::InvalidInitialScale { value });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::core::{indicator::EventIndicator, transform::transform};
    use approx::assert_relative_eq;
    use ndarray::{array, Array3};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Layout of the three target tensors, the column bookkeeping of
    // `split_matrix`, and the scale seed.
    // -------------------------------------------------------------------------

    fn derived() -> DerivedSeries {
        let raw = array![[1.0, 0.0, 0.0, 1.0, 0.0], [0.0, 1.0, 0.0, 0.0, 0.0]];
        transform(&EventIndicator::new(raw.view()).unwrap())
    }

    #[test]
    fn stream_targets_stack_the_four_series() {
        let d = derived();

        let y = d.stream_targets(1).unwrap();

        assert_eq!(y.shape(), &[5, 1, 4]);
        assert_eq!(y.slice(s![.., 0, 0]), d.tse().row(1));
        assert_eq!(y.slice(s![.., 0, 3]), d.eligible().row(1));
        assert!(matches!(d.stream_targets(2), Err(EventError::StreamOutOfRange { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Stacked targets put streams on the event-type axis.
    fn stacked_targets_transpose_streams_into_event_types() {
        let d = derived();

        let y = d.stacked_targets();

        assert_eq!(y.shape(), &[5, 2, 4]);
        assert_eq!(y[[3, 0, 0]], d.tse()[[0, 3]]);
        assert_eq!(y[[3, 1, 1]], d.tte()[[1, 3]]);
    }

    #[test]
    // Purpose
    // -------
    // A labelled matrix split back apart returns the covariates behind
    // (tse, eligible) and the targets in front.
    //
    // Given
    // -----
    // - Two streams, five timesteps, one covariate equal to 7.
    //
    // Expect
    // ------
    // - x columns = (tse, eligible, covariate), y = stream targets.
    fn labelled_matrix_round_trips_through_split() {
        // Arrange
        let d = derived();
        let cov = Array3::<f64>::from_elem((2, 5, 1), 7.0);

        // Act
        let m = d.labelled_matrix(cov.view()).unwrap();
        let (x, y) = split_matrix(m.view()).unwrap();

        // Assert
        assert_eq!(x.shape(), &[2, 5, 3]);
        assert_eq!(x.slice(s![0, .., 0]), d.tse().row(0));
        assert_eq!(x.slice(s![1, .., 1]), d.eligible().row(1));
        assert!(x.slice(s![.., .., 2]).iter().all(|&v| v == 7.0));
        assert_eq!(y.shape(), &[2, 5, 1, 4]);
        assert_eq!(y.slice(s![1, .., .., ..]), d.stream_targets(1).unwrap());
    }

    #[test]
    fn split_matrix_clamps_negative_targets_only() {
        let m = array![[[-1.0, -1.0, -1.0, -1.0, -1.0]]];

        let (x, y) = split_matrix(m.view()).unwrap();

        assert!(y.iter().all(|&v| v == 0.0));
        assert!(x.iter().all(|&v| v == -1.0));
    }

    #[test]
    fn split_matrix_requires_four_columns() {
        let m = Array3::<f64>::zeros((1, 2, 3));

        assert_eq!(split_matrix(m.view()).unwrap_err(), EventError::TooFewColumns { found: 3 });
    }

    #[test]
    // Purpose
    // -------
    // The seed is the mean final-step TSE and must be positive.
    fn initial_scale_is_mean_final_tse() {
        let mut y = Array4::<f64>::zeros((2, 3, 1, 4));
        y[[0, 2, 0, 0]] = 4.0;
        y[[1, 2, 0, 0]] = 2.0;

        assert_relative_eq!(initial_scale(y.view()).unwrap(), 3.0);
        assert!(matches!(
            initial_scale(Array4::<f64>::zeros((2, 3, 1, 4)).view()),
            Err(EventError::InvalidInitialScale { .. })
        ));
    }
}
