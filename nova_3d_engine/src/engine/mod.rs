/// Engine module - frame scheduling and the loop that drives every subsystem

mod engine;
mod frame_timer;

pub use engine::{Application, Engine, FrameReport, FrameStats, NoopApplication};
pub use frame_timer::{FrameTimer, Tick};
