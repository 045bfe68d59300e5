//! Transient particle effects: firework shells and falling snow

pub mod fireworks;
pub mod snow;

pub use fireworks::{Burst, Firework, FireworkParams, FireworkSystem, Rocket, Spark};
pub use snow::{SnowBounds, SnowField};
