//! GPU dispatch module
//!
//! Owns the transient "currently bound" state for one draw call and turns
//! it into device commands with a fixed culling/depth/blend policy.

mod draw_mode;
mod gpu_dispatch;

pub use draw_mode::{PrimitiveKind, BlendKind};
pub use gpu_dispatch::GpuDispatch;
