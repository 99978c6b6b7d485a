//! Core labelling pipeline: indicator → derived series → targets → windows.
pub mod indicator;
pub mod targets;
pub mod transform;
pub mod window;
