//! Random placement of instances and particles
//!
//! Every sampler takes the random source explicitly so scenes are
//! reproducible from a seed.

pub mod shapes;
pub mod palette;

pub use shapes::{
    ConeShape, Distribution, Placement, ScaleRange, cone_spiral, ring_point, sphere_uniform,
    surface_scatter,
};
pub use palette::Palette;
