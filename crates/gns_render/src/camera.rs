use glam::{Mat4, Vec3};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
}

/// Projection selector for the board view. Switching it is a presentation
/// choice only and never changes simulation state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Projection {
    #[default]
    Perspective,
    Orthographic,
}

impl Projection {
    /// All projections in display order.
    pub const ALL: &'static [Projection] = &[Projection::Perspective, Projection::Orthographic];

    /// Short human-readable label for overlay display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Perspective => "Perspective",
            Self::Orthographic => "Orthographic",
        }
    }

    /// Cycle to the next projection (wraps around).
    pub fn next(self) -> Self {
        match self {
            Self::Perspective => Self::Orthographic,
            Self::Orthographic => Self::Perspective,
        }
    }
}

impl std::fmt::Display for Projection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Look-at camera over the board. The projection volume is fixed to the
/// 4:3 board framing regardless of window size.
pub struct Camera3D {
    pub position: Vec3,
    pub look_target: Vec3,
    pub up: Vec3,
    pub projection: Projection,
}

impl Camera3D {
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.0, 5.0, 15.0),
            look_target: Vec3::new(0.0, 1.0, 0.0),
            up: Vec3::Y,
            projection: Projection::Perspective,
        }
    }

    pub fn build_uniform(&self) -> CameraUniform {
        let view = Mat4::look_at_rh(self.position, self.look_target, self.up);
        let proj = match self.projection {
            Projection::Perspective => {
                Mat4::perspective_rh(45.0_f32.to_radians(), 4.0 / 3.0, 0.1, 100.0)
            }
            Projection::Orthographic => {
                Mat4::orthographic_rh(-10.0, 10.0, -10.0, 10.0, 0.0, 100.0)
            }
        };

        CameraUniform {
            view_proj: (proj * view).to_cols_array_2d(),
            camera_pos: [self.position.x, self.position.y, self.position.z, 1.0],
        }
    }
}

impl Default for Camera3D {
    fn default() -> Self {
        Self::new()
    }
}
