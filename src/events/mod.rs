//! events — from raw event occurrences to a windowed training corpus.
//!
//! Purpose
//! -------
//! Label binary event streams with the quantities a censored time-to-event
//! objective needs, and lay them out as model inputs and targets.
//!
//! Key behaviors
//! -------------
//! - [`EventIndicator`]: validated `(streams, timesteps)` 0/1 matrix.
//! - [`transform`]: time since event, time to event, censoring and
//!   eligibility masks as a [`DerivedSeries`].
//! - [`split_matrix`] / [`initial_scale`]: labelled matrix to `(x, y)` and
//!   the activation's scale seed.
//! - [`windows`]: overlapping fixed-length windows as a
//!   [`TrainingCorpus`].
//!
//! Invariants & assumptions
//! ------------------------
//! - All validation happens at the boundary ([`EventIndicator`]
//!   construction, shape checks in [`split_matrix`] and [`windows`]).
//!   Downstream functions are total.
//! - Target layout is `(tse, tte, uncensored, eligible)` on the last axis,
//!   matching the column constants in [`crate::hazard::loss`].

pub mod core;
pub mod errors;

pub use self::core::indicator::EventIndicator;
pub use self::core::targets::{initial_scale, split_matrix, TARGET_COLUMNS};
pub use self::core::transform::{transform, DerivedSeries};
pub use self::core::window::{
    windows, CorpusConfig, TrainingCorpus, Window, DEFAULT_PADDING_SENTINEL, DEFAULT_WINLEN,
};
pub use self::errors::{EventError, EventResult};

pub mod prelude {
    pub use super::{
        initial_scale, split_matrix, transform, windows, CorpusConfig, DerivedSeries, EventError,
        EventIndicator, EventResult, TrainingCorpus,
    };
}
