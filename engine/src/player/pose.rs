//! Character Pose
//!
//! Visual-only state that follows the controller: which way the model faces
//! and how far it leans into its run. Never feeds back into physics.

/// Facing and lean of the character model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterPose {
    /// +1 facing right, -1 facing left
    pub facing: f32,
    /// Lean around the view axis in radians; negative leans forward when running right
    pub tilt: f32,
}

impl Default for CharacterPose {
    fn default() -> Self {
        Self {
            facing: 1.0,
            tilt: 0.0,
        }
    }
}

impl CharacterPose {
    /// Face along `direction` (-1, 0 or 1). Zero keeps the current facing.
    pub fn face(&mut self, direction: i32) {
        if direction != 0 {
            self.facing = direction.signum() as f32;
        }
    }

    /// Ease the lean toward the target for horizontal speed `vx`.
    pub fn update_tilt(&mut self, vx: f32, max_speed: f32, tilt_amount: f32, smoothing: f32) {
        let target = target_tilt(vx, max_speed, tilt_amount);
        self.tilt += (target - self.tilt) * smoothing;
    }
}

/// Lean the pose approaches at speed `vx`.
pub fn target_tilt(vx: f32, max_speed: f32, tilt_amount: f32) -> f32 {
    if max_speed <= 0.0 || vx == 0.0 {
        return 0.0;
    }
    let speed_ratio = vx.abs() / max_speed;
    vx.signum() * speed_ratio * -tilt_amount
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_keeps_last_direction() {
        let mut pose = CharacterPose::default();
        pose.face(-1);
        assert_eq!(pose.facing, -1.0);
        pose.face(0);
        assert_eq!(pose.facing, -1.0);
        pose.face(1);
        assert_eq!(pose.facing, 1.0);
    }

    #[test]
    fn test_tilt_leans_against_motion() {
        assert!((target_tilt(18.0, 18.0, 0.3) + 0.3).abs() < 1e-6);
        assert!((target_tilt(-9.0, 18.0, 0.3) - 0.15).abs() < 1e-6);
        assert_eq!(target_tilt(0.0, 18.0, 0.3), 0.0);
    }

    #[test]
    fn test_tilt_eases_toward_target() {
        let mut pose = CharacterPose::default();
        pose.update_tilt(18.0, 18.0, 0.3, 0.1);
        assert!((pose.tilt + 0.03).abs() < 1e-6);
        for _ in 0..200 {
            pose.update_tilt(18.0, 18.0, 0.3, 0.1);
        }
        assert!((pose.tilt + 0.3).abs() < 1e-4);
    }
}
