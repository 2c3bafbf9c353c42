//! CPU rendition of one frame, used for the headless `--snapshot` mode.
//!
//! The plane is ray-cast instead of rasterized. Every varying is affine over
//! the plane, so evaluating the vertex stage at the hit point gives the same
//! values the rasterizer interpolates.

use glam::{Mat4, Vec2, Vec3, Vec3Swizzles, Vec4};
use image::{Rgba, RgbaImage};
use log::debug;

use crate::model::{MaterialImages, Vertex};
use crate::scene::Scene;
use crate::shading::{linear_to_srgb, vertex_stage};

/// Linear clear color, matching the GPU render pass.
pub const CLEAR_COLOR: Vec3 = Vec3::splat(0.8);

pub fn render_snapshot(scene: &Scene, images: &MaterialImages, width: u32, height: u32) -> RgbaImage {
    let frame = scene.frame_uniforms();
    let inverse_view_proj = (frame.projection * frame.view).inverse();
    let inverse_model = frame.model.inverse();
    let samplers = images.samplers();
    let maps = samplers.maps();
    let clear = to_rgba(CLEAR_COLOR.extend(1.0));

    let mut discarded = 0usize;
    let image = RgbaImage::from_fn(width, height, |x, y| {
        // Pixel centre in NDC, y up
        let ndc = Vec2::new(
            (x as f32 + 0.5) / width as f32 * 2.0 - 1.0,
            1.0 - (y as f32 + 0.5) / height as f32 * 2.0,
        );
        let near = inverse_view_proj.project_point3(ndc.extend(0.0));
        let far = inverse_view_proj.project_point3(ndc.extend(1.0));

        let Some(local) = intersect_plane(inverse_model, near, far) else {
            return clear;
        };

        let vertex = Vertex {
            position: local.to_array(),
            normal: [0.0, 0.0, 1.0],
            height: 0.0,
            tex_coords: ((local.xy() + Vec2::ONE) * 0.5).to_array(),
            tangent: [1.0, 0.0, 0.0],
            bitangent: [0.0, 1.0, 0.0],
        };

        let (_, varyings) = vertex_stage(&frame, &vertex);
        match scene.technique.shade(&varyings, &maps, &scene.shading) {
            Some(color) => to_rgba(color),
            None => {
                discarded += 1;
                clear
            }
        }
    });

    debug!(
        "Rendered {}x{} snapshot with {} ({} fragments discarded)",
        width, height, scene.technique, discarded
    );
    image
}

/// Hit point of the segment `near..far` with the model-space square
/// `[-1, 1]^2` at z = 0, in model space.
fn intersect_plane(inverse_model: Mat4, near: Vec3, far: Vec3) -> Option<Vec3> {
    let origin = inverse_model.transform_point3(near);
    let end = inverse_model.transform_point3(far);
    let dir = end - origin;
    if dir.z.abs() < f32::EPSILON {
        return None;
    }

    let t = -origin.z / dir.z;
    if !(0.0..=1.0).contains(&t) {
        return None;
    }

    let hit = origin + dir * t;
    if hit.x.abs() <= 1.0 && hit.y.abs() <= 1.0 {
        Some(Vec3::new(hit.x, hit.y, 0.0))
    } else {
        None
    }
}

fn to_rgba(color: Vec4) -> Rgba<u8> {
    let encode = |c: f32| (linear_to_srgb(c.clamp(0.0, 1.0)) * 255.0).round() as u8;
    Rgba([encode(color.x), encode(color.y), encode(color.z), 255])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shading::Technique;
    use image::RgbaImage;

    fn flat_material() -> MaterialImages {
        let base = RgbaImage::from_pixel(8, 8, Rgba([200, 120, 80, 255]));
        let normal = RgbaImage::from_pixel(8, 8, Rgba([128, 128, 255, 255]));
        let height = RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 255]));
        MaterialImages { base, normal, height }
    }

    #[test]
    fn test_plane_centre_and_background() {
        let mut scene = Scene::new(64, 64).with_technique(Technique::Normal);
        scene.camera.position = Vec3::new(0.0, 0.0, 4.0);
        let image = render_snapshot(&scene, &flat_material(), 64, 64);

        let background = to_rgba(CLEAR_COLOR.extend(1.0));
        assert_eq!(image.get_pixel(0, 0), &background);
        assert_eq!(image.get_pixel(63, 63), &background);
        assert_ne!(image.get_pixel(32, 32), &background);
    }

    #[test]
    fn test_intersect_plane() {
        let hit = intersect_plane(Mat4::IDENTITY, Vec3::new(0.5, -0.25, 2.0), Vec3::new(0.5, -0.25, -2.0));
        assert_eq!(hit, Some(Vec3::new(0.5, -0.25, 0.0)));

        // Outside the square
        assert!(intersect_plane(Mat4::IDENTITY, Vec3::new(1.5, 0.0, 2.0), Vec3::new(1.5, 0.0, -2.0)).is_none());

        // Parallel to the plane
        assert!(intersect_plane(Mat4::IDENTITY, Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 1.0)).is_none());

        // Segment ends before the plane
        assert!(intersect_plane(Mat4::IDENTITY, Vec3::new(0.0, 0.0, 2.0), Vec3::new(0.0, 0.0, 1.0)).is_none());
    }

    #[test]
    fn test_parallax_discards_near_edges() {
        // Full-height map: fragments near the border sample outside [0, 1].
        let mut scene = Scene::new(64, 64).with_technique(Technique::Parallax);
        scene.shading.height_scale = 0.5;
        scene.camera.position = Vec3::new(0.0, 0.0, 4.0);

        let parallax = render_snapshot(&scene, &flat_material(), 64, 64);
        scene.technique = Technique::Normal;
        let normal = render_snapshot(&scene, &flat_material(), 64, 64);

        let background = to_rgba(CLEAR_COLOR.extend(1.0));
        let count = |image: &RgbaImage| image.pixels().filter(|p| **p == background).count();
        assert!(
            count(&parallax) > count(&normal),
            "parallax mapping should discard fragments near the border"
        );
    }

    #[test]
    fn test_zero_height_scale_matches_normal_mapping() {
        let mut scene = Scene::new(32, 32).with_technique(Technique::Parallax);
        scene.shading.height_scale = 0.0;
        let parallax = render_snapshot(&scene, &flat_material(), 32, 32);
        scene.technique = Technique::Normal;
        let normal = render_snapshot(&scene, &flat_material(), 32, 32);
        assert_eq!(parallax, normal);
    }
}
