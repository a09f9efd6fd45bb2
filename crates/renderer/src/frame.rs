//! Pure per-frame planning: given a scene and a timestamp, decide the
//! clear color, whether anything is drawn, and the transform payload.
//! No GPU types appear here, so the frame contract is testable on any
//! machine.

use scene::Scene;

use crate::runtime::TimeSample;
use crate::transform::{rotation_angle, TransformUniforms};

/// Clear color applied at the start of every frame, opaque black.
pub const CLEAR_COLOR: [f64; 4] = [0.0, 0.0, 0.0, 1.0];

/// Everything the GPU needs to execute one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramePlan {
    pub clear_color: [f64; 4],
    pub draw: Option<DrawCall>,
}

/// A single draw of the scene's vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub vertex_count: u32,
    pub transform: Option<TransformUniforms>,
}

/// Plans one frame. A scene without a model clears and stops, a static
/// model draws as-is, and an animated model rotates by its velocity
/// times the elapsed time.
pub fn plan_frame(scene: &Scene, sample: TimeSample) -> FramePlan {
    let draw = scene.model.as_ref().map(|model| DrawCall {
        vertex_count: model.geometry.vertex_count(),
        transform: model.velocity.map(|velocity| {
            TransformUniforms::z_rotation(rotation_angle(sample.elapsed_ms, velocity))
        }),
    });
    FramePlan {
        clear_color: CLEAR_COLOR,
        draw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene::ScenePreset;

    #[test]
    fn clear_only_scene_draws_nothing() {
        let scene = ScenePreset::ClearOnly.build();
        let plan = plan_frame(&scene, TimeSample::new(0.0, 0));
        assert_eq!(plan.clear_color, CLEAR_COLOR);
        assert!(plan.draw.is_none());
    }

    #[test]
    fn static_triangle_draws_three_vertices_untransformed() {
        let scene = ScenePreset::StaticTriangle.build();
        let plan = plan_frame(&scene, TimeSample::new(5000.0, 42));
        let draw = plan.draw.expect("triangle draws");
        assert_eq!(draw.vertex_count, 3);
        assert!(draw.transform.is_none());
    }

    #[test]
    fn logo_at_time_zero_is_identity() {
        let scene = ScenePreset::RotatingLogo.build();
        let plan = plan_frame(&scene, TimeSample::new(0.0, 0));
        let draw = plan.draw.expect("logo draws");
        assert_eq!(draw.vertex_count, 12);
        assert_eq!(draw.transform, Some(TransformUniforms::identity()));
    }

    #[test]
    fn logo_quarter_turn_after_one_second() {
        let scene = ScenePreset::RotatingLogo.build();
        let plan = plan_frame(&scene, TimeSample::new(1000.0, 0));
        let m = plan.draw.and_then(|draw| draw.transform).expect("rotated").matrix;
        assert!(m[0][0].abs() < 1e-6);
        assert_eq!(m[0][1], 1.0);
        assert_eq!(m[1][0], -1.0);
    }

    #[test]
    fn rotation_advances_between_frames() {
        let scene = ScenePreset::RotatingLogo.build();
        let early = plan_frame(&scene, TimeSample::new(500.0, 1));
        let late = plan_frame(&scene, TimeSample::new(1000.0, 2));
        assert_ne!(early.draw, late.draw);
    }
}
