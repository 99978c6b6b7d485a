//! models — sequence heads that produce raw hazard outputs.
//!
//! - [`SequenceModel`]: covariate windows → raw `(a, b)`; the collaborator
//!   interface a recurrent network would implement.
//! - [`TrainableHead`]: parameters plus mean-loss gradient, consumed by
//!   [`crate::training`].
//! - [`LinearHazardHead`]: affine or intercept-only reference head, fittable
//!   with L-BFGS through [`crate::optimization`] or with the epoch loop.

pub mod errors;
pub mod linear;
pub mod traits;

pub use self::errors::{ModelError, ModelResult};
pub use self::linear::{HeadDesign, LinearHazardHead};
pub use self::traits::{SequenceModel, TrainableHead};

pub mod prelude {
    pub use super::{HeadDesign, LinearHazardHead, ModelError, ModelResult, SequenceModel, TrainableHead};
}
