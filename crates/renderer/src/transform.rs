//! Z-axis rotation math and the uniform payload that carries it to the
//! shader. Angles derive from total elapsed time rather than per-frame
//! deltas, so stalls and dropped frames never shift where the mesh
//! ends up.

use std::f64::consts::PI;

/// Converts elapsed milliseconds and angular velocity in degrees per
/// second into radians.
pub fn rotation_angle(elapsed_ms: f64, velocity_deg_per_sec: f64) -> f64 {
    velocity_deg_per_sec * (elapsed_ms / 1000.0) * (PI / 180.0)
}

/// std140 payload for the transform uniform block. Column-major to
/// match GLSL's `mat4`.
#[repr(C, align(16))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformUniforms {
    pub matrix: [[f32; 4]; 4],
}

unsafe impl bytemuck::Zeroable for TransformUniforms {}
unsafe impl bytemuck::Pod for TransformUniforms {}

impl TransformUniforms {
    pub fn identity() -> Self {
        Self {
            matrix: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Rotation about +Z by `angle` radians. The sine and cosine are
    /// taken in f64 and narrowed once, keeping long-running animations
    /// smooth.
    pub fn z_rotation(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let (s, c) = (s as f32, c as f32);
        Self {
            matrix: [
                [c, s, 0.0, 0.0],
                [-s, c, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn quarter_turn_after_one_second() {
        let angle = rotation_angle(1000.0, 90.0);
        assert!((angle - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn angle_scales_linearly_with_time() {
        let half = rotation_angle(500.0, 90.0);
        let full = rotation_angle(1000.0, 90.0);
        assert!((full - 2.0 * half).abs() < 1e-12);

        let mut previous = rotation_angle(0.0, 45.0);
        for step in 1..10 {
            let next = rotation_angle(f64::from(step) * 100.0, 45.0);
            assert!(next > previous);
            previous = next;
        }
    }

    #[test]
    fn zero_elapsed_is_identity() {
        let at_zero = TransformUniforms::z_rotation(rotation_angle(0.0, 90.0));
        assert_eq!(at_zero, TransformUniforms::identity());
    }

    #[test]
    fn quarter_turn_matrix_layout() {
        let m = TransformUniforms::z_rotation(FRAC_PI_2).matrix;
        assert!(m[0][0].abs() < 1e-6);
        assert_eq!(m[0][1], 1.0);
        assert_eq!(m[1][0], -1.0);
        assert!(m[1][1].abs() < 1e-6);
        assert_eq!(m[2][2], 1.0);
        assert_eq!(m[3][3], 1.0);
    }

    #[test]
    fn equal_timestamps_produce_identical_bytes() {
        let a = TransformUniforms::z_rotation(rotation_angle(1234.5, 90.0));
        let b = TransformUniforms::z_rotation(rotation_angle(1234.5, 90.0));
        assert_eq!(bytemuck::bytes_of(&a), bytemuck::bytes_of(&b));
    }
}
