//! Resource module
//!
//! Collaborator data fed to the renderer: geometry buffers and materials.

mod geometry;
mod material;

pub use geometry::Geometry;
pub use material::{Material, MaterialDesc, Side};
