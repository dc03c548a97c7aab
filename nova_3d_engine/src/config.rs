/// Engine configuration
///
/// Plain data with sensible defaults. Validated once when the Engine is
/// created; invalid values are configuration errors.

use crate::error::Result;
use crate::engine_bail;

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Application name (used in log messages)
    pub app_name: String,
    /// Initial surface width in CSS/logical pixels
    pub width: u32,
    /// Initial surface height in CSS/logical pixels
    pub height: u32,
    /// Device pixels per logical pixel
    pub pixel_ratio: f32,
    /// Fixed-step simulation rate (Hz)
    pub fixed_rate_hz: f64,
    /// Variable-step cap (Hz): update+render never runs more often than this
    pub target_fps: f64,
    /// Upper bound on wall time fed into the fixed accumulator per tick (ms)
    pub max_frame_delta_ms: f64,
    /// Clear color of the scene target (RGBA)
    pub clear_color: [f32; 4],
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            app_name: "Nova3D Application".to_string(),
            width: 1280,
            height: 720,
            pixel_ratio: 1.0,
            fixed_rate_hz: 60.0,
            target_fps: 60.0,
            max_frame_delta_ms: 250.0,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl EngineConfig {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_pixel_ratio(mut self, pixel_ratio: f32) -> Self {
        self.pixel_ratio = pixel_ratio;
        self
    }

    pub fn with_fixed_rate(mut self, hz: f64) -> Self {
        self.fixed_rate_hz = hz;
        self
    }

    pub fn with_target_fps(mut self, fps: f64) -> Self {
        self.target_fps = fps;
        self
    }

    pub fn with_max_frame_delta(mut self, ms: f64) -> Self {
        self.max_frame_delta_ms = ms;
        self
    }

    pub fn with_clear_color(mut self, color: [f32; 4]) -> Self {
        self.clear_color = color;
        self
    }

    /// Fixed step duration in milliseconds
    pub fn fixed_step_ms(&self) -> f64 {
        1000.0 / self.fixed_rate_hz
    }

    /// Minimum interval between two variable steps in milliseconds
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.target_fps
    }

    /// Surface size in device pixels
    pub fn device_size(&self) -> (u32, u32) {
        device_pixels(self.width, self.height, self.pixel_ratio)
    }

    /// Check that every rate and size is usable
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            engine_bail!("nova3d::EngineConfig", InvalidConfiguration =>
                "Surface size must be non-zero (got {}x{})", self.width, self.height);
        }
        if !(self.pixel_ratio > 0.0) {
            engine_bail!("nova3d::EngineConfig", InvalidConfiguration =>
                "Pixel ratio must be > 0 (got {})", self.pixel_ratio);
        }
        if !(self.fixed_rate_hz > 0.0) {
            engine_bail!("nova3d::EngineConfig", InvalidConfiguration =>
                "Fixed rate must be > 0 Hz (got {})", self.fixed_rate_hz);
        }
        if !(self.target_fps > 0.0) {
            engine_bail!("nova3d::EngineConfig", InvalidConfiguration =>
                "Target FPS must be > 0 (got {})", self.target_fps);
        }
        if !(self.max_frame_delta_ms > 0.0) {
            engine_bail!("nova3d::EngineConfig", InvalidConfiguration =>
                "Max frame delta must be > 0 ms (got {})", self.max_frame_delta_ms);
        }
        Ok(())
    }
}

/// Convert a logical size to device pixels (never below 1x1)
pub fn device_pixels(width: u32, height: u32, pixel_ratio: f32) -> (u32, u32) {
    let w = ((width as f32) * pixel_ratio).round().max(1.0) as u32;
    let h = ((height as f32) * pixel_ratio).round().max(1.0) as u32;
    (w, h)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
