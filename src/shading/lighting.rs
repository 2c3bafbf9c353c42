use glam::{Vec3, Vec4};

use super::ShadingConfig;

/// Recovers a tangent-space normal from a normal-map texel stored as `(n + 1) / 2`.
pub fn decode_normal(color: Vec3) -> Vec3 {
    (color * 2.0 - Vec3::ONE).normalize()
}

/// Inverse of [`decode_normal`], used when baking normal maps.
pub fn encode_normal(normal: Vec3) -> Vec3 {
    (normal.normalize() + Vec3::ONE) * 0.5
}

/// Unscaled diffuse and specular factors of the Blinn-Phong model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightTerms {
    pub diffuse: f32,
    pub specular: f32,
}

/// Both terms are clamped at zero, so back-facing light or a halfway
/// vector at or past 90 degrees from the normal contributes nothing.
pub fn blinn_phong(normal: Vec3, light_dir: Vec3, view_dir: Vec3, shininess: f32) -> LightTerms {
    let diffuse = light_dir.dot(normal).max(0.0);
    let halfway = (light_dir + view_dir).normalize_or_zero();
    let specular = normal.dot(halfway).max(0.0).powf(shininess);

    LightTerms { diffuse, specular }
}

/// Combines ambient, diffuse and specular contributions into an opaque color.
pub fn shade(base_color: Vec3, normal: Vec3, light_dir: Vec3, view_dir: Vec3, config: &ShadingConfig) -> Vec4 {
    let terms = blinn_phong(normal, light_dir, view_dir, config.shininess);

    let ambient = base_color * config.ambient;
    let diffuse = base_color * terms.diffuse;
    let specular = Vec3::splat(config.specular * terms.specular);

    (ambient + diffuse + specular).extend(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normal_encoding_round_trip() {
        let normal = Vec3::new(0.3, -0.5, 0.8).normalize();
        let decoded = decode_normal(encode_normal(normal));
        assert_relative_eq!(decoded.x, normal.x, epsilon = 1e-5);
        assert_relative_eq!(decoded.y, normal.y, epsilon = 1e-5);
        assert_relative_eq!(decoded.z, normal.z, epsilon = 1e-5);
    }

    #[test]
    fn test_flat_normal_color() {
        // The usual "flat" normal-map color decodes to +Z.
        let decoded = decode_normal(Vec3::new(0.5, 0.5, 1.0));
        assert_eq!(decoded, Vec3::Z);
    }

    #[test]
    fn test_terms_never_negative() {
        let directions = [
            Vec3::X,
            -Vec3::X,
            Vec3::Z,
            -Vec3::Z,
            Vec3::new(0.4, -0.9, -0.2).normalize(),
            Vec3::new(-0.1, 0.2, 0.97).normalize(),
        ];

        for light in directions {
            for view in directions {
                let terms = blinn_phong(Vec3::Z, light, view, 32.0);
                assert!(terms.diffuse >= 0.0, "diffuse {} for {:?}", terms.diffuse, light);
                assert!(terms.specular >= 0.0, "specular {} for {:?}/{:?}", terms.specular, light, view);
            }
        }
    }

    #[test]
    fn test_specular_zero_past_ninety_degrees() {
        // Halfway vector exactly perpendicular to the normal.
        let terms = blinn_phong(Vec3::Z, Vec3::X, Vec3::X, 32.0);
        assert_eq!(terms.specular, 0.0);

        // Halfway vector below the surface.
        let below = Vec3::new(0.3, 0.0, -1.0).normalize();
        let terms = blinn_phong(Vec3::Z, below, below, 32.0);
        assert_eq!(terms.specular, 0.0);
        assert_eq!(terms.diffuse, 0.0);
    }

    #[test]
    fn test_shade_head_on_light() {
        let config = ShadingConfig::default();
        let base = Vec3::new(0.6, 0.4, 0.2);
        let color = shade(base, Vec3::Z, Vec3::Z, Vec3::Z, &config);

        // ambient + full diffuse + full specular highlight
        let expected = base * (1.0 + config.ambient) + Vec3::splat(config.specular);
        assert_relative_eq!(color.x, expected.x, epsilon = 1e-5);
        assert_relative_eq!(color.y, expected.y, epsilon = 1e-5);
        assert_relative_eq!(color.z, expected.z, epsilon = 1e-5);
        assert_eq!(color.w, 1.0);
    }

    #[test]
    fn test_shade_unlit_is_ambient_only() {
        let config = ShadingConfig::default();
        let base = Vec3::ONE;
        let color = shade(base, Vec3::Z, -Vec3::Z, -Vec3::Z, &config);
        assert_relative_eq!(color.x, config.ambient, epsilon = 1e-6);
    }
}
