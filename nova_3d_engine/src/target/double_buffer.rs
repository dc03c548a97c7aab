/// DoubleBuffer - two identical render targets with alternating roles.
///
/// `read` and `write` are derived from a single index, so they can never
/// denote the same target. `swap()` flips the roles.

use crate::error::Result;
use crate::graphics_device;
use super::render_target::{PendingResize, RenderTarget, RenderTargetDesc};

pub struct DoubleBuffer {
    targets: [RenderTarget; 2],
    read_index: usize,
}

impl DoubleBuffer {
    /// Allocate both targets from one descriptor (named `<name>.0` / `<name>.1`)
    pub fn new(device: &mut dyn graphics_device::GraphicsDevice, desc: RenderTargetDesc) -> Result<Self> {
        let mut first = desc.clone();
        first.name = format!("{}.0", desc.name);
        let mut second = desc;
        second.name = format!("{}.1", second.name);
        Ok(Self {
            targets: [RenderTarget::new(device, first)?, RenderTarget::new(device, second)?],
            read_index: 0,
        })
    }

    /// Target holding the last completed result
    pub fn read(&self) -> &RenderTarget {
        &self.targets[self.read_index]
    }

    /// Target to render into next
    pub fn write(&self) -> &RenderTarget {
        &self.targets[1 - self.read_index]
    }

    pub fn read_index(&self) -> usize {
        self.read_index
    }

    pub fn swap(&mut self) {
        self.read_index = 1 - self.read_index;
    }

    /// Resize both targets
    ///
    /// Both are allocated before either is replaced; on failure neither changes.
    pub fn set_size(&mut self, device: &mut dyn graphics_device::GraphicsDevice, width: u32, height: u32) -> Result<()> {
        let pending = self.prepare_resize(device, width, height)?;
        self.commit_resize(pending);
        Ok(())
    }

    pub(crate) fn prepare_resize(
        &self,
        device: &mut dyn graphics_device::GraphicsDevice,
        width: u32,
        height: u32,
    ) -> Result<[PendingResize; 2]> {
        Ok([
            self.targets[0].prepare_resize(device, width, height)?,
            self.targets[1].prepare_resize(device, width, height)?,
        ])
    }

    pub(crate) fn commit_resize(&mut self, pending: [PendingResize; 2]) {
        for (target, pending) in self.targets.iter_mut().zip(pending) {
            target.commit_resize(pending);
        }
    }

    pub fn width(&self) -> u32 {
        self.targets[0].width()
    }

    pub fn height(&self) -> u32 {
        self.targets[0].height()
    }
}

#[cfg(test)]
#[path = "double_buffer_tests.rs"]
mod tests;
