//! Camera module - projection of camera nodes.
//!
//! A camera is placed by its scene node's transform; this module only
//! provides the projection side (perspective / orthographic).

mod camera;

pub use camera::{Camera, Projection};
