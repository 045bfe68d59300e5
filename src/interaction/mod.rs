//! Pointer interaction: hit-testing ornaments and highlighting the one hovered

pub mod picking;
pub mod highlight;

pub use picking::{HitInfo, Ray, RayPicker};
pub use highlight::HighlightController;
