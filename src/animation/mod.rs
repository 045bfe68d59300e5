//! Animation module for the intro assembly
//!
//! Drives the dispersed-to-assembled convergence of the tree from a single
//! shared progress value.

mod assembly;
mod easing;

pub use assembly::{
    ApexMarker, AssemblyAnimator, AssemblyPhase, AssemblyState, AssemblyStep, explode_factor,
};
pub use easing::{Easing, ease};
