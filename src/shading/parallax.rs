use glam::{Vec2, Vec3};

/// Shifts `uv` along the view direction in proportion to the sampled height.
///
/// `view_dir` points from the fragment towards the eye in tangent space.
/// A zero height leaves the coordinate untouched.
pub fn parallax_offset(uv: Vec2, view_dir: Vec3, height: f32, height_scale: f32) -> Vec2 {
    uv - view_dir.truncate() * (height * height_scale)
}

/// True when both components lie in `[0, 1]`. Parallax fragments outside the
/// unit square are discarded.
pub fn in_unit_square(uv: Vec2) -> bool {
    (0.0..=1.0).contains(&uv.x) && (0.0..=1.0).contains(&uv.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_height_is_identity() {
        let uv = Vec2::new(0.37, 0.91);
        let view = Vec3::new(0.6, -0.3, 0.74).normalize();
        assert_eq!(parallax_offset(uv, view, 0.0, 0.1), uv);
    }

    #[test]
    fn test_head_on_view_has_no_offset() {
        let uv = Vec2::new(0.5, 0.5);
        assert_eq!(parallax_offset(uv, Vec3::Z, 1.0, 0.1), uv);
    }

    #[test]
    fn test_offset_moves_against_view() {
        let uv = Vec2::new(0.5, 0.5);
        let view = Vec3::new(1.0, 0.0, 1.0).normalize();
        let shifted = parallax_offset(uv, view, 1.0, 0.1);

        assert_relative_eq!(shifted.x, 0.5 - 0.1 * view.x, epsilon = 1e-6);
        assert_eq!(shifted.y, 0.5);
    }

    #[test]
    fn test_unit_square_bounds() {
        assert!(in_unit_square(Vec2::ZERO));
        assert!(in_unit_square(Vec2::ONE));
        assert!(in_unit_square(Vec2::new(0.2, 0.999)));
        assert!(!in_unit_square(Vec2::new(-0.001, 0.5)));
        assert!(!in_unit_square(Vec2::new(0.5, 1.001)));
        assert!(!in_unit_square(Vec2::new(1.2, -0.2)));
    }
}
