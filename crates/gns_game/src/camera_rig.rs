//! Camera poses and the scripted intro flight.
//!
//! The flight is integrated over fixed-step time at a constant speed: the
//! camera rises from the front pose, flies in over the board, bounces at the
//! board center (position mirrored across z = 0), flies back out past the
//! start distance, then descends and lands exactly on the front pose.

use glam::Vec3;

pub const SWEEP_SPEED: f32 = 5.0;
const APEX_Y: f32 = 10.0;
const EXIT_Z: f32 = 15.0;

/// Named viewpoints over the board. Each pose also carries the board z
/// offset that frames it best.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraPose {
    Front,
    Top,
    Back,
}

impl CameraPose {
    pub fn position(self) -> Vec3 {
        match self {
            Self::Front => Vec3::new(0.0, 5.0, 15.0),
            Self::Top => Vec3::new(0.0, 10.0, 0.0),
            Self::Back => Vec3::new(0.0, 5.0, -15.0),
        }
    }

    pub fn look_target(self) -> Vec3 {
        match self {
            // The top pose looks slightly past the board center so the view
            // direction never becomes parallel to the up vector.
            Self::Top => Vec3::new(0.0, 1.0, -1.0),
            _ => Vec3::new(0.0, 1.0, 0.0),
        }
    }

    pub fn board_z(self) -> f32 {
        match self {
            Self::Top => 0.0,
            _ => 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SweepLeg {
    Rise,
    FlyIn,
    FlyOut,
    Descend,
}

pub struct CameraRig {
    pub position: Vec3,
    pub look_target: Vec3,
    sweep: Option<SweepLeg>,
}

impl CameraRig {
    pub fn new() -> Self {
        Self {
            position: CameraPose::Front.position(),
            look_target: CameraPose::Front.look_target(),
            sweep: None,
        }
    }

    /// Cancel any flight in progress and jump to the pose.
    pub fn snap_to(&mut self, pose: CameraPose) {
        self.sweep = None;
        self.position = pose.position();
        self.look_target = pose.look_target();
    }

    /// Begin the intro flight from the front pose.
    pub fn start_sweep(&mut self) {
        self.position = CameraPose::Front.position();
        self.look_target = CameraPose::Front.look_target();
        self.sweep = Some(SweepLeg::Rise);
    }

    pub fn sweep_active(&self) -> bool {
        self.sweep.is_some()
    }

    /// True once the flight has cleared the exit distance and is on its way
    /// back down to the front pose.
    pub fn descending(&self) -> bool {
        self.sweep == Some(SweepLeg::Descend)
    }

    /// Advance the flight by one fixed step. Does nothing when no sweep is
    /// active.
    pub fn tick(&mut self, dt: f32) {
        let Some(leg) = self.sweep else {
            return;
        };

        match leg {
            SweepLeg::Rise => {
                self.position.y += SWEEP_SPEED * dt;
                if self.position.y > APEX_Y {
                    self.sweep = Some(SweepLeg::FlyIn);
                }
            }
            SweepLeg::FlyIn => {
                self.position.z -= SWEEP_SPEED * dt;
                if self.position.z < 0.0 {
                    // Bounce at the board center: mirror the overshoot back
                    // to the positive side and reverse direction.
                    self.position.z = -self.position.z;
                    self.sweep = Some(SweepLeg::FlyOut);
                }
            }
            SweepLeg::FlyOut => {
                self.position.z += SWEEP_SPEED * dt;
                if self.position.z > EXIT_Z {
                    self.sweep = Some(SweepLeg::Descend);
                }
            }
            SweepLeg::Descend => {
                let floor_y = CameraPose::Front.position().y;
                if self.position.y > floor_y {
                    self.position.y -= SWEEP_SPEED * dt;
                } else {
                    self.snap_to(CameraPose::Front);
                }
            }
        }
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new()
    }
}
