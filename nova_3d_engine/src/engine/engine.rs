/// Nova3D Engine - frame loop owning every subsystem
///
/// The engine is an explicit value, not a singleton: it owns the graphics
/// device, the scene graph, the renderer and the application callbacks, and
/// the host drives it by calling `run(timestamp_ms)` once per display tick.
///
/// One `run` executes, in order:
/// 1. every due fixed step (`Application::fixed_update`), oldest first
/// 2. at most one variable step, when the frame cap allows it:
///    `Application::update`, the scene logic traversal, the transform
///    traversal, then the render
///
/// An error during the render aborts the frame and is handed back to the
/// host; the engine stays usable for the next tick.

use crate::error::Result;
use crate::{engine_debug, engine_error, engine_info};
use crate::config::EngineConfig;
use crate::graphics_device::GraphicsDevice;
use crate::render::Renderer;
use crate::scene::SceneGraph;
use super::frame_timer::FrameTimer;

// ===== APPLICATION HOOKS =====

/// Per-application callbacks driven by the engine loop
///
/// Both hooks default to no-ops.
pub trait Application {
    /// Deterministic simulation step, `step_seconds` is always the fixed step
    fn fixed_update(&mut self, _scene: &mut SceneGraph, _step_seconds: f32) {}

    /// Once per rendered frame, before the scene traversals
    fn update(&mut self, _scene: &mut SceneGraph, _dt_seconds: f32) {}
}

/// Application with no behavior
#[derive(Debug, Default)]
pub struct NoopApplication;

impl Application for NoopApplication {}

// ===== REPORTING =====

/// What one `run` call did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub fixed_steps: u32,
    pub variable_step_ran: bool,
    pub draw_calls: u64,
}

/// Counters accumulated over the engine's lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frames rendered successfully
    pub frames: u64,
    pub fixed_steps: u64,
    pub draw_calls: u64,
    /// Frames whose render returned an error
    pub aborted_frames: u64,
}

// ===== ENGINE =====

pub struct Engine<D: GraphicsDevice> {
    device: D,
    scene: SceneGraph,
    renderer: Renderer,
    config: EngineConfig,
    app: Box<dyn Application>,
    timer: FrameTimer,
    stats: FrameStats,
}

impl<D: GraphicsDevice> Engine<D> {
    /// Create an engine with a validated configuration
    ///
    /// Allocates the scene target and the postprocess pipeline on `device`.
    pub fn new(config: EngineConfig, mut device: D, app: Box<dyn Application>) -> Result<Self> {
        config.validate()?;
        let renderer = Renderer::new(&mut device, &config)?;
        let timer = FrameTimer::from_config(&config);
        engine_info!("nova3d::Engine", "'{}' initialized ({}x{} x{}, fixed {} Hz, cap {} fps)",
            config.app_name, config.width, config.height, config.pixel_ratio,
            config.fixed_rate_hz, config.target_fps);
        Ok(Self {
            device,
            scene: SceneGraph::new(),
            renderer,
            config,
            app,
            timer,
            stats: FrameStats::default(),
        })
    }

    /// Advance the loop to `timestamp_ms` (host clock, milliseconds)
    pub fn run(&mut self, timestamp_ms: f64) -> Result<FrameReport> {
        let tick = self.timer.advance(timestamp_ms);
        let step_seconds = (self.timer.fixed_step_ms() / 1000.0) as f32;

        for _ in 0..tick.fixed_steps {
            self.app.fixed_update(&mut self.scene, step_seconds);
        }
        self.stats.fixed_steps += u64::from(tick.fixed_steps);

        let mut report = FrameReport {
            fixed_steps: tick.fixed_steps,
            variable_step_ran: tick.run_variable,
            draw_calls: 0,
        };
        if !tick.run_variable {
            return Ok(report);
        }

        let dt_seconds = (tick.variable_dt_ms / 1000.0) as f32;
        self.app.update(&mut self.scene, dt_seconds);
        self.scene.update_logic(dt_seconds);
        self.scene.update_transforms();

        match self.renderer.render(&mut self.device, &mut self.scene) {
            Ok(draw_calls) => {
                report.draw_calls = draw_calls;
                self.stats.frames += 1;
                self.stats.draw_calls += draw_calls;
                Ok(report)
            }
            Err(error) => {
                self.stats.aborted_frames += 1;
                engine_error!("nova3d::Engine", "Frame aborted at {:.3} ms: {}", timestamp_ms, error);
                Err(error)
            }
        }
    }

    /// Propagate a surface size change before the next frame
    ///
    /// `width`/`height` are logical pixels.
    pub fn set_size(&mut self, width: u32, height: u32, pixel_ratio: f32) -> Result<()> {
        let resized = self.config.clone()
            .with_size(width, height)
            .with_pixel_ratio(pixel_ratio);
        resized.validate()?;
        self.renderer.set_size(&mut self.device, &mut self.scene, width, height, pixel_ratio)?;
        self.config = resized;
        Ok(())
    }

    /// Swap the application callbacks
    pub fn set_application(&mut self, app: Box<dyn Application>) {
        self.app = app;
        engine_debug!("nova3d::Engine", "Application replaced");
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }

    /// Device and renderer together, for building passes and targets
    pub fn renderer_and_device(&mut self) -> (&mut Renderer, &mut D) {
        (&mut self.renderer, &mut self.device)
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn timer(&self) -> &FrameTimer {
        &self.timer
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
