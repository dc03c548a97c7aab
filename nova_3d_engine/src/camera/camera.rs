/// Camera - projection parameters of a camera node.
///
/// The camera's position and orientation live in its scene node's
/// transform; the Camera itself only knows how to project. The view matrix
/// is derived from the node's world matrix on demand.

use glam::{Mat4, Vec3};

/// Projection model
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Perspective projection (`fov_y` in radians)
    Perspective { fov_y: f32, aspect: f32, near: f32, far: f32 },
    /// Orthographic projection
    Orthographic { left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32 },
}

/// Projection of a camera node
#[derive(Debug, Clone)]
pub struct Camera {
    projection: Projection,
}

impl Camera {
    /// Create a perspective camera.
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self { projection: Projection::Perspective { fov_y, aspect, near, far } }
    }

    /// Create an orthographic camera.
    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        Self { projection: Projection::Orthographic { left, right, bottom, top, near, far } }
    }

    /// Orthographic camera framing a `width` x `height` pixel screen centered on the origin.
    pub fn screen(width: u32, height: u32) -> Self {
        let mut camera = Self::orthographic(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0);
        camera.fit_screen(width, height);
        camera
    }

    // ===== GETTERS =====

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Projection matrix (OpenGL clip-space convention, right-handed).
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            Projection::Perspective { fov_y, aspect, near, far } => {
                Mat4::perspective_rh_gl(fov_y, aspect, near, far)
            }
            Projection::Orthographic { left, right, bottom, top, near, far } => {
                Mat4::orthographic_rh_gl(left, right, bottom, top, near, far)
            }
        }
    }

    /// View matrix for a camera whose node has world matrix `world`.
    pub fn view_matrix(&self, world: &Mat4) -> Mat4 {
        world.inverse()
    }

    /// Combined view-projection matrix (projection * view).
    pub fn view_projection_matrix(&self, world: &Mat4) -> Mat4 {
        self.projection_matrix() * self.view_matrix(world)
    }

    /// Camera-space depth of a world point (positive in front of the camera).
    pub fn view_depth(&self, world: &Mat4, point: Vec3) -> f32 {
        -self.view_matrix(world).transform_point3(point).z
    }

    // ===== SETTERS =====

    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
    }

    /// Adapt the projection to a new viewport size.
    ///
    /// Perspective cameras take the new aspect ratio. Orthographic cameras
    /// keep their vertical extent and center and widen or narrow
    /// horizontally to the new aspect ratio.
    pub fn set_size(&mut self, width: u32, height: u32) {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        match &mut self.projection {
            Projection::Perspective { aspect: a, .. } => *a = aspect,
            Projection::Orthographic { left, right, bottom, top, .. } => {
                let center = (*left + *right) * 0.5;
                let half_width = (*top - *bottom) * 0.5 * aspect;
                *left = center - half_width;
                *right = center + half_width;
            }
        }
    }

    /// Frame a `width` x `height` pixel screen centered on the origin.
    ///
    /// Switches the projection to orthographic if needed; near/far are kept
    /// for an orthographic camera.
    pub fn fit_screen(&mut self, width: u32, height: u32) {
        let (near, far) = match self.projection {
            Projection::Orthographic { near, far, .. } => (near, far),
            Projection::Perspective { .. } => (-1.0, 1.0),
        };
        let half_w = width.max(1) as f32 * 0.5;
        let half_h = height.max(1) as f32 * 0.5;
        self.projection = Projection::Orthographic {
            left: -half_w,
            right: half_w,
            bottom: -half_h,
            top: half_h,
            near,
            far,
        };
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
