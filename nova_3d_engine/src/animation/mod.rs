//! Animation module
//!
//! Keyframed scalar curves sampled with clamped cubic Hermite interpolation.

mod curve;

pub use curve::{Curve, Keyframe};
