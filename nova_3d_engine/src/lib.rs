/*!
# Nova 3D Engine

Runtime core of a real-time 3D renderer: a scene graph of transforms, a
typed uniform registry with partial-merge updates, offscreen render targets
and double buffers, a multi-pass postprocess pipeline and the GPU dispatch
layer that binds everything before each draw.

The engine never talks to a concrete graphics API. Every GPU object and
command goes through the `GraphicsDevice` trait; `RecordingDevice` is a
headless implementation that records commands for inspection.

## Architecture

- **Engine**: fixed-step + variable-step loop driven by `run(timestamp_ms)`
- **SceneGraph**: arena of nodes (groups, meshes, cameras, lights)
- **Uniforms**: named shader parameters, nested structs and struct arrays
- **RenderTarget / DoubleBuffer**: offscreen color + depth attachments
- **PostProcessPipeline**: ordered fullscreen passes with target hand-off
- **GpuDispatch**: program, geometry, uniform and state binding per draw
*/

// Internal modules
mod error;
mod config;
mod engine;
pub mod log;
pub mod graphics_device;
pub mod uniform;
pub mod dispatch;
pub mod resource;
pub mod camera;
pub mod scene;
pub mod target;
pub mod animation;
pub mod postprocess;
pub mod render;

// Main nova3d namespace module
pub mod nova3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine loop and configuration
    pub use crate::engine::{
        Application, Engine, FrameReport, FrameStats, FrameTimer, NoopApplication, Tick,
    };
    pub use crate::config::{EngineConfig, device_pixels};

    // Logging sub-module (types and functions, NOT macros)
    pub mod log {
        pub use crate::log::{
            Logger, LogEntry, LogSeverity, DefaultLogger,
            set_logger, reset_logger, set_min_severity, min_severity,
        };
    }

    pub mod graphics_device {
        pub use crate::graphics_device::*;
    }

    pub mod uniform {
        pub use crate::uniform::*;
    }

    pub mod dispatch {
        pub use crate::dispatch::*;
    }

    pub mod resource {
        pub use crate::resource::*;
    }

    pub mod camera {
        pub use crate::camera::*;
    }

    pub mod scene {
        pub use crate::scene::*;
    }

    pub mod target {
        pub use crate::target::*;
    }

    pub mod animation {
        pub use crate::animation::*;
    }

    pub mod postprocess {
        pub use crate::postprocess::*;
    }

    pub mod render {
        pub use crate::render::*;
    }
}

// Re-export math library at crate root
pub use glam;
