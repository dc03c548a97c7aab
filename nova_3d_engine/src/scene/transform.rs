/// Transform - local TRS state and cached matrices of a scene node.
///
/// Rotation is stored as Euler angles in radians (x = pitch, y = yaw,
/// z = roll) and always composed as `R = Ry * Rx * Rz`. The local matrix is
/// `T * R * S`, or `T * LookAt * S` while a look-at target is set.
///
/// `local` and `world` are caches: they are only refreshed by the scene
/// graph's transform pass, never as a side effect of editing a field.

use glam::{Mat3, Mat4, Vec3};

/// How a look-at orientation is built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookAtMode {
    /// +Z points at the target (objects, lights)
    Direct,
    /// -Z points at the target (cameras)
    Inverted,
}

/// Local transform and cached matrices
#[derive(Debug, Clone)]
pub struct Transform {
    /// Position in the parent's space
    pub position: Vec3,
    /// Euler angles in radians
    pub rotation: Vec3,
    pub scale: Vec3,
    /// World-space point to face; overrides `rotation` while set
    pub look_at: Option<Vec3>,
    look_at_mode: LookAtMode,
    local: Mat4,
    world: Mat4,
}

impl Transform {
    pub fn new(look_at_mode: LookAtMode) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            look_at: None,
            look_at_mode,
            local: Mat4::IDENTITY,
            world: Mat4::IDENTITY,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn look_at_mode(&self) -> LookAtMode {
        self.look_at_mode
    }

    // ===== MATRICES =====

    /// Rotation matrix from the Euler angles (`Ry * Rx * Rz`)
    pub fn rotation_matrix(&self) -> Mat3 {
        Mat3::from_rotation_y(self.rotation.y)
            * Mat3::from_rotation_x(self.rotation.x)
            * Mat3::from_rotation_z(self.rotation.z)
    }

    /// Recompute the local matrix, then the world matrix
    ///
    /// `parent_world` is `None` for roots, whose world matrix equals their
    /// local matrix.
    pub fn update(&mut self, parent_world: Option<&Mat4>) {
        let rotation = match self.look_at {
            Some(target) => {
                // target is world-space; bring it into the parent's space
                let target = match parent_world {
                    Some(parent) => parent.inverse().transform_point3(target),
                    None => target,
                };
                look_at_rotation(self.position, target, self.look_at_mode)
                    .unwrap_or_else(|| self.rotation_matrix())
            }
            None => self.rotation_matrix(),
        };
        self.local = Mat4::from_translation(self.position)
            * Mat4::from_mat3(rotation)
            * Mat4::from_scale(self.scale);
        self.world = match parent_world {
            Some(parent) => *parent * self.local,
            None => self.local,
        };
    }

    pub fn local_matrix(&self) -> &Mat4 {
        &self.local
    }

    pub fn world_matrix(&self) -> &Mat4 {
        &self.world
    }

    // ===== DERIVED ACCESSORS (read off the world matrix) =====

    pub fn right(&self) -> Vec3 {
        self.world.x_axis.truncate().normalize_or_zero()
    }

    pub fn up(&self) -> Vec3 {
        self.world.y_axis.truncate().normalize_or_zero()
    }

    /// Facing direction: +Z for direct look-at nodes, -Z for cameras
    pub fn forward(&self) -> Vec3 {
        let z = self.world.z_axis.truncate().normalize_or_zero();
        match self.look_at_mode {
            LookAtMode::Direct => z,
            LookAtMode::Inverted => -z,
        }
    }

    pub fn world_position(&self) -> Vec3 {
        self.world.w_axis.truncate()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(LookAtMode::Direct)
    }
}

/// Orientation facing `target` from `eye`, or `None` if they coincide
fn look_at_rotation(eye: Vec3, target: Vec3, mode: LookAtMode) -> Option<Mat3> {
    let z = match mode {
        LookAtMode::Direct => target - eye,
        LookAtMode::Inverted => eye - target,
    }
    .try_normalize()?;
    let x = Vec3::Y
        .cross(z)
        .try_normalize()
        // looking straight up or down
        .or_else(|| Vec3::Z.cross(z).try_normalize())?;
    let y = z.cross(x);
    Some(Mat3::from_cols(x, y, z))
}

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;
