//! Postprocess module
//!
//! Ordered chain of full-screen passes, each with its own material and
//! output, handing its result to the next pass.

mod pass;
mod pipeline;

pub use pass::{
    PassOutput, PostProcessPass,
    SOURCE_UNIFORM, HISTORY_UNIFORM, PROJECTION_UNIFORM, MODEL_VIEW_UNIFORM,
};
pub use pipeline::PostProcessPipeline;
