//! WindowSplitter — fixed-length overlapping windows over long sequences.
//!
//! Purpose
//! -------
//! Cut `(nobs, nseq, ·)` covariate/target tensors into every overlapping
//! window of length `winlen`, concatenated stream by stream into one
//! [`TrainingCorpus`].
//!
//! Key behaviors
//! -------------
//! - Window starts run over `0 .. nseq - winlen` (end exclusive). A window
//!   starting at `nseq - winlen`, which would end exactly on the last
//!   timestep, is never produced. Each stream therefore contributes
//!   `max(0, nseq - winlen)` candidates.
//! - A candidate whose first covariate at its first timestep equals the
//!   padding sentinel is discarded.
//! - Target values below 0 are clamped to 0 after windowing.
//! - Window order is stream-major, start-minor, and is preserved by
//!   [`TrainingCorpus::split_validation`], which holds out the trailing
//!   fraction of windows.
//!
//! Invariants & assumptions
//! ------------------------
//! - `x` and `y` agree on `(nobs, nseq)`; `y` has trailing shape `(1, 4)`.
//! - `winlen ≥ 1`. A corpus with zero windows is a valid result; callers
//!   that need data get [`EventError::EmptyCorpus`] from
//!   [`TrainingCorpus::split_validation`].
use std::ops::Range;

use ndarray::{s, Array3, Array4, ArrayView2, ArrayView3, ArrayView4, Axis};
use serde::Deserialize;

use crate::events::{
    core::targets::TARGET_COLUMNS,
    errors::{EventError, EventResult},
};

/// Default window length.
pub const DEFAULT_WINLEN: usize = 78;
/// Default covariate value marking padded timesteps.
pub const DEFAULT_PADDING_SENTINEL: f64 = -1.0;

/// Windowing options.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorpusConfig {
    pub winlen: usize,
    pub padding_sentinel: f64,
}

impl CorpusConfig {
    /// # Errors
    /// [`EventError::ZeroWindowLength`] when `winlen == 0`.
    pub fn new(winlen: usize, padding_sentinel: f64) -> EventResult<Self> {
        let config = Self { winlen, padding_sentinel };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EventResult<()> {
        if self.winlen == 0 {
            return Err(EventError::ZeroWindowLength);
        }
        Ok(())
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self { winlen: DEFAULT_WINLEN, padding_sentinel: DEFAULT_PADDING_SENTINEL }
    }
}

/// One window: covariates `(winlen, ncov)` and targets `(winlen, 1, 4)`.
#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    pub x: ArrayView2<'a, f64>,
    pub y: ArrayView3<'a, f64>,
}

/// Windows stacked along axis 0.
///
/// Fields
/// ------
/// - `x`: `(windows, winlen, ncov)`.
/// - `y`: `(windows, winlen, 1, 4)`, non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingCorpus {
    pub x: Array3<f64>,
    pub y: Array4<f64>,
}

impl TrainingCorpus {
    pub fn len(&self) -> usize {
        self.x.len_of(Axis(0))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn winlen(&self) -> usize {
        self.x.len_of(Axis(1))
    }

    pub fn covariates(&self) -> usize {
        self.x.len_of(Axis(2))
    }

    pub fn window(&self, i: usize) -> Option<Window<'_>> {
        if i >= self.len() {
            return None;
        }
        Some(Window { x: self.x.index_axis(Axis(0), i), y: self.y.index_axis(Axis(0), i) })
    }

    pub fn iter(&self) -> impl Iterator<Item = Window<'_>> + '_ {
        self.x
            .outer_iter()
            .zip(self.y.outer_iter())
            .map(|(x, y)| Window { x, y })
    }

    /// Hold out the trailing `fraction` of windows for validation.
    ///
    /// The training part keeps the first `⌊len · (1 − fraction)⌋` windows.
    ///
    /// # Errors
    /// - [`EventError::InvalidValidationFraction`] unless `0 ≤ fraction < 1`.
    /// - [`EventError::EmptyCorpus`] when the training part would be empty.
    pub fn split_validation(&self, fraction: f64) -> EventResult<(Self, Self)> {
        if !(0.0..1.0).contains(&fraction) {
            return Err(EventError::InvalidValidationFraction { value: fraction });
        }
        let cut = (self.len() as f64 * (1.0 - fraction)).floor() as usize;
        if cut == 0 {
            return Err(EventError::EmptyCorpus { winlen: self.winlen() });
        }
        Ok((self.subset(0..cut), self.subset(cut..self.len())))
    }

    /// Owned copy of the windows in `range` (clamped to the corpus).
    pub fn subset(&self, range: Range<usize>) -> Self {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        Self {
            x: self.x.slice(s![start..end, .., ..]).to_owned(),
            y: self.y.slice(s![start..end, .., .., ..]).to_owned(),
        }
    }

    /// Consecutive batches of at most `size` windows, in corpus order.
    /// `size == 0` is treated as one batch holding everything.
    pub fn batches(&self, size: usize) -> impl Iterator<Item = Self> + '_ {
        let size = if size == 0 { self.len().max(1) } else { size };
        (0..self.len()).step_by(size).map(move |start| self.subset(start..start + size))
    }
}

/// Cut `x`/`y` into overlapping windows of `config.winlen`.
///
/// Parameters
/// ----------
/// - `x`: `ArrayView3<f64>`, `(nobs, nseq, ncov)` covariates.
/// - `y`: `ArrayView4<f64>`, `(nobs, nseq, 1, 4)` targets.
/// - `config`: window length and padding sentinel.
///
/// Returns
/// -------
/// `EventResult<TrainingCorpus>`
///   `nobs · max(0, nseq − winlen)` windows minus those starting on padding.
///
/// Errors
/// ------
/// - `EventError::ZeroWindowLength`.
/// - `EventError::ShapeMismatch` when `x` and `y` disagree on the leading
///   axes or `y` is not `(…, 1, 4)`.
pub fn windows(
    x: ArrayView3<'_, f64>, y: ArrayView4<'_, f64>, config: &CorpusConfig,
) -> EventResult<TrainingCorpus> {
    config.validate()?;
    let (nobs, nseq, ncov) = x.dim();
    let (ynobs, ynseq, ytypes, ycols) = y.dim();
    if ynobs != nobs || ynseq != nseq || ytypes != 1 || ycols != TARGET_COLUMNS {
        return Err(EventError::ShapeMismatch {
            covariates: x.shape().to_vec(),
            targets: y.shape().to_vec(),
        });
    }

    let winlen = config.winlen;
    let per_stream = nseq.saturating_sub(winlen);
    let mut starts: Vec<(usize, usize)> = Vec::with_capacity(nobs * per_stream);
    let mut discarded = 0usize;
    for obs in 0..nobs {
        for start in 0..per_stream {
            if ncov > 0 && x[[obs, start, 0]] == config.padding_sentinel {
                discarded += 1;
                continue;
            }
            starts.push((obs, start));
        }
    }

    let mut cx = Array3::<f64>::zeros((starts.len(), winlen, ncov));
    let mut cy = Array4::<f64>::zeros((starts.len(), winlen, 1, TARGET_COLUMNS));
    for (i, &(obs, start)) in starts.iter().enumerate() {
        cx.index_axis_mut(Axis(0), i).assign(&x.slice(s![obs, start..start + winlen, ..]));
        cy.index_axis_mut(Axis(0), i).assign(&y.slice(s![obs, start..start + winlen, .., ..]));
    }
    cy.mapv_inplace(|v| if v < 0.0 { 0.0 } else { v });

    log::debug!(
        "windowed {nobs} sequences of length {nseq} into {} windows of length {winlen} ({discarded} discarded as padding)",
        starts.len()
    );
    Ok(TrainingCorpus { x: cx, y: cy })
}
