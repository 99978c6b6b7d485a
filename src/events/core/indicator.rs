//! Event indicator — validated binary (streams × time) occurrence matrix.
//!
//! Purpose
//! -------
//! Hold the raw input of the labelling pipeline: one row per event stream
//! (a customer, an engine, an event type), one column per discrete
//! timestep, `1` where an event occurred and `0` otherwise. Validation runs
//! once at construction so the transform can assume a clean boolean matrix.
//!
//! Invariants & assumptions
//! ------------------------
//! - Exactly two axes; anything else is [`EventError::InvalidRank`].
//! - Every entry is exactly `0.0` or `1.0`; NaN and any other value is
//!   [`EventError::NonBinaryValue`], reported at the first offending
//!   position in row-major order.
//! - At least one stream and one timestep.
//!
//! Conventions
//! -----------
//! - Stored as `Array2<bool>`; the float boundary exists only because the
//!   data usually arrives from NumPy or a CSV loader as `f64`.
use ndarray::{Array2, ArrayView2, ArrayViewD, Ix2};

use crate::events::errors::{EventError, EventResult};

/// `EventIndicator` — binary event occurrences per stream and timestep.
///
/// Fields
/// ------
/// - `occurred`: `Array2<bool>` with shape `(streams, timesteps)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventIndicator {
    occurred: Array2<bool>,
}

impl EventIndicator {
    /// Validate an arbitrary-rank float array as an event indicator.
    ///
    /// Parameters
    /// ----------
    /// - `raw`: `ArrayViewD<f64>`
    ///   Candidate indicator. Must be 2-D with entries in `{0, 1}`.
    ///
    /// Returns
    /// -------
    /// `EventResult<EventIndicator>`
    ///
    /// Errors
    /// ------
    /// - `EventError::InvalidRank { rank }` when `raw.ndim() != 2`.
    /// - `EventError::EmptyIndicator { .. }` when either axis is empty.
    /// - `EventError::NonBinaryValue { stream, time, value }` for the first
    ///   entry that is neither 0 nor 1.
    pub fn from_dyn(raw: ArrayViewD<'_, f64>) -> EventResult<Self> {
        let rank = raw.ndim();
        let matrix =
            raw.into_dimensionality::<Ix2>().map_err(|_| EventError::InvalidRank { rank })?;
        Self::new(matrix)
    }

    /// Validate a 2-D float matrix as an event indicator.
    ///
    /// # Errors
    /// [`EventError::EmptyIndicator`] or [`EventError::NonBinaryValue`].
    pub fn new(raw: ArrayView2<'_, f64>) -> EventResult<Self> {
        let (streams, timesteps) = raw.dim();
        if streams == 0 || timesteps == 0 {
            return Err(EventError::EmptyIndicator { streams, timesteps });
        }
        for ((stream, time), &value) in raw.indexed_iter() {
            if value != 0.0 && value != 1.0 {
                return Err(EventError::NonBinaryValue { stream, time, value });
            }
        }
        Ok(Self { occurred: raw.mapv(|v| v == 1.0) })
    }

    /// Wrap an already-boolean matrix.
    ///
    /// # Errors
    /// [`EventError::EmptyIndicator`] when either axis is empty.
    pub fn from_bools(occurred: Array2<bool>) -> EventResult<Self> {
        let (streams, timesteps) = occurred.dim();
        if streams == 0 || timesteps == 0 {
            return Err(EventError::EmptyIndicator { streams, timesteps });
        }
        Ok(Self { occurred })
    }

    pub fn streams(&self) -> usize {
        self.occurred.nrows()
    }

    pub fn timesteps(&self) -> usize {
        self.occurred.ncols()
    }

    pub fn view(&self) -> ArrayView2<'_, bool> {
        self.occurred.view()
    }

    /// Number of events in each stream.
    pub fn event_counts(&self) -> Vec<usize> {
        self.occurred.rows().into_iter().map(|row| row.iter().filter(|&&e| e).count()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, ArrayD, IxDyn};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Construction checks only: rank, emptiness, binary values. The derived
    // series are tested in `transform`.
    // -------------------------------------------------------------------------

    #[test]
    fn from_dyn_accepts_binary_matrix() {
        let raw = array![[1.0, 0.0, 0.0], [0.0, 0.0, 1.0]].into_dyn();

        let ind = EventIndicator::from_dyn(raw.view()).unwrap();

        assert_eq!(ind.streams(), 2);
        assert_eq!(ind.timesteps(), 3);
        assert_eq!(ind.event_counts(), vec![1, 1]);
    }

    #[test]
    // Purpose
    // -------
    // A 1-D or 3-D input is a shape error, not a value error.
    fn from_dyn_rejects_wrong_rank() {
        let flat = ArrayD::<f64>::zeros(IxDyn(&[5]));
        let cube = ArrayD::<f64>::zeros(IxDyn(&[2, 2, 2]));

        assert_eq!(
            EventIndicator::from_dyn(flat.view()).unwrap_err(),
            EventError::InvalidRank { rank: 1 }
        );
        assert_eq!(
            EventIndicator::from_dyn(cube.view()).unwrap_err(),
            EventError::InvalidRank { rank: 3 }
        );
    }

    #[test]
    // Purpose
    // -------
    // The first non-binary value is reported with its position.
    //
    // Given
    // -----
    // - [[0, 1], [0.5, NaN]].
    //
    // Expect
    // ------
    // - NonBinaryValue at stream 1, time 0, value 0.5.
    fn new_reports_first_non_binary_value() {
        let raw = array![[0.0, 1.0], [0.5, f64::NAN]];

        let err = EventIndicator::new(raw.view()).unwrap_err();

        assert_eq!(err, EventError::NonBinaryValue { stream: 1, time: 0, value: 0.5 });
    }

    #[test]
    fn new_rejects_nan_and_empty_input() {
        let nan = array![[f64::NAN]];
        let empty = Array2::<f64>::zeros((2, 0));

        assert!(matches!(
            EventIndicator::new(nan.view()),
            Err(EventError::NonBinaryValue { stream: 0, time: 0, .. })
        ));
        assert_eq!(
            EventIndicator::new(empty.view()).unwrap_err(),
            EventError::EmptyIndicator { streams: 2, timesteps: 0 }
        );
    }
}
