//! EventStreamTransform — derive TSE, TTE, censoring and eligibility labels.
//!
//! Purpose
//! -------
//! Turn an [`EventIndicator`] into the four aligned `(streams, timesteps)`
//! label series the censored loss consumes:
//!
//! - `tse[s, t]`: time since the last event. Forward scan; `+1` on a 0,
//!   reset to 0 on a 1.
//! - `tte[s, t]`: time to the next event. Backward scan over `t = T-1 … 1`;
//!   `+1` on a 0, reset on a 1, and the accumulator after visiting `t` is
//!   written to `t - 1`. The final slot is never written and stays 0.
//! - `uncensored[s, t]`: 0 from the stream's last event onward (the next
//!   event after that point is unobserved), 1 before it.
//! - `eligible[s, t]`: 0 before the stream's first event, 1 from it on.
//!
//! Key behaviors
//! -------------
//! - Deterministic, O(streams · timesteps), one pass per series.
//! - The first/last event indices are kept on the result for inspection.
//!
//! Invariants & assumptions
//! ------------------------
//! - A stream without events reports `first_event = 0` and
//!   `last_event = T - 1`, so it is eligible everywhere and censored only at
//!   its last timestep. [`DerivedSeries::has_event`] tells such streams
//!   apart from a stream whose first event is at `t = 0`.
//! - `DerivedSeries` is immutable once built.
//!
//! Conventions
//! -----------
//! - Labels are `f64` so they can be stacked directly into target tensors.
use ndarray::Array2;

use crate::events::core::indicator::EventIndicator;

/// `DerivedSeries` — the four label series of an event indicator.
///
/// Fields
/// ------
/// - `tse`, `tte`, `uncensored`, `eligible`: `Array2<f64>` shaped
///   `(streams, timesteps)`.
/// - `first_event`, `last_event`: per-stream indices as described in the
///   module docs.
/// - `has_event`: whether the stream contains any event.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedSeries {
    tse: Array2<f64>,
    tte: Array2<f64>,
    uncensored: Array2<f64>,
    eligible: Array2<f64>,
    first_event: Vec<usize>,
    last_event: Vec<usize>,
    has_event: Vec<bool>,
}

/// Derive all label series from `indicator`.
///
/// Parameters
/// ----------
/// - `indicator`: `&EventIndicator`
///   Validated binary occurrence matrix.
///
/// Returns
/// -------
/// `DerivedSeries`
///   Labels aligned with the indicator. The function cannot fail: every
///   input check happened when the indicator was built.
pub fn transform(indicator: &EventIndicator) -> DerivedSeries {
    let occurred = indicator.view();
    let (streams, timesteps) = occurred.dim();

    let mut tse = Array2::<f64>::zeros((streams, timesteps));
    let mut tte = Array2::<f64>::zeros((streams, timesteps));
    let mut uncensored = Array2::<f64>::ones((streams, timesteps));
    let mut eligible = Array2::<f64>::ones((streams, timesteps));
    let mut first_event = Vec::with_capacity(streams);
    let mut last_event = Vec::with_capacity(streams);
    let mut has_event = Vec::with_capacity(streams);

    for (s, row) in occurred.rows().into_iter().enumerate() {
        let mut since = 0.0;
        for t in 0..timesteps {
            since = if row[t] { 0.0 } else { since + 1.0 };
            tse[[s, t]] = since;
        }

        let mut until = 0.0;
        for t in (1..timesteps).rev() {
            until = if row[t] { 0.0 } else { until + 1.0 };
            tte[[s, t - 1]] = until;
        }

        let first = row.iter().position(|&e| e);
        let last = row.iter().rposition(|&e| e);
        let first_idx = first.unwrap_or(0);
        let last_idx = last.unwrap_or(timesteps - 1);

        for t in last_idx..timesteps {
            uncensored[[s, t]] = 0.0;
        }
        for t in 0..first_idx {
            eligible[[s, t]] = 0.0;
        }

        first_event.push(first_idx);
        last_event.push(last_idx);
        has_event.push(first.is_some());
    }

    DerivedSeries { tse, tte, uncensored, eligible, first_event, last_event, has_event }
}

impl DerivedSeries {
    /// Equivalent to [`transform`].
    pub fn from_indicator(indicator: &EventIndicator) -> Self {
        transform(indicator)
    }

    pub fn streams(&self) -> usize {
        self.tse.nrows()
    }

    pub fn timesteps(&self) -> usize {
        self.tse.ncols()
    }

    pub fn tse(&self) -> &Array2<f64> {
        &self.tse
    }

    pub fn tte(&self) -> &Array2<f64> {
        &self.tte
    }

    pub fn uncensored(&self) -> &Array2<f64> {
        &self.uncensored
    }

    pub fn eligible(&self) -> &Array2<f64> {
        &self.eligible
    }

    /// Index of the first event per stream (0 when there is none).
    pub fn first_event_index(&self) -> &[usize] {
        &self.first_event
    }

    /// Index of the last event per stream (`T - 1` when there is none).
    pub fn last_event_index(&self) -> &[usize] {
        &self.last_event
    }

    pub fn has_event(&self) -> &[bool] {
        &self.has_event
    }
}
