//! Uniform module
//!
//! Named, typed shader parameters and the registry that stores them.
//! Struct and struct-array uniforms support partial, field-level updates.

mod uniform;
mod uniforms;

pub use uniform::{Uniform, UniformType, UniformValue};
pub use uniforms::Uniforms;
