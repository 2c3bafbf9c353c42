use super::*;
use assert_fs::prelude::*;
use image::{Rgba, RgbaImage};
use std::path::Path;

fn write_png(path: &Path, width: u32, height: u32, color: [u8; 4]) {
    RgbaImage::from_pixel(width, height, Rgba(color))
        .save(path)
        .expect("Failed to write test image");
}

#[test]
fn test_vertex_size() {
    assert_eq!(
        std::mem::size_of::<Vertex>(),
        60,  // 15 tightly packed f32 values
        "Vertex size should be 60 bytes"
    );
}

#[test]
fn test_vertex_buffer_layout() {
    let layout = Vertex::desc();
    assert_eq!(layout.array_stride, 60);
    assert_eq!(layout.step_mode, wgpu::VertexStepMode::Vertex);
    assert_eq!(layout.attributes.len(), 6);

    let locations: Vec<u32> = layout.attributes.iter().map(|a| a.shader_location).collect();
    assert_eq!(locations, vec![0, 1, 2, 3, 4, 5]);

    // height sits between normal and tex_coords
    assert_eq!(layout.attributes[2].offset, 24);
    assert_eq!(layout.attributes[2].format, wgpu::VertexFormat::Float32);
    assert_eq!(layout.attributes[3].offset, 28);
    assert_eq!(layout.attributes[5].offset, 48);
}

#[test]
fn test_texture_path_naming() {
    let path = texture_path(Path::new("resources/textures/wall"), "normal", "jpg");
    assert_eq!(path, Path::new("resources/textures/wall_normal.jpg"));
}

#[test]
fn test_load_texture_set() {
    let temp = assert_fs::TempDir::new().unwrap();
    write_png(temp.child("wall_base.png").path(), 4, 2, [200, 100, 50, 255]);
    write_png(temp.child("wall_normal.png").path(), 4, 2, [128, 128, 255, 255]);
    write_png(temp.child("wall_height.png").path(), 4, 2, [0, 0, 0, 255]);

    let images = MaterialImages::from_files(&temp.path().join("wall"), "png").unwrap();
    assert_eq!(images.base.dimensions(), (4, 2));
    assert_eq!(images.normal.get_pixel(1, 1), &Rgba([128, 128, 255, 255]));
    assert_eq!(images.height.get_pixel(3, 0)[0], 0);
}

#[test]
fn test_missing_map_names_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    write_png(temp.child("wall_base.png").path(), 4, 4, [200, 100, 50, 255]);
    write_png(temp.child("wall_height.png").path(), 4, 4, [0, 0, 0, 255]);

    let result = MaterialImages::from_files(&temp.path().join("wall"), "png");
    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("wall_normal.png"), "unexpected error: {}", e);
    }
}

#[test]
fn test_mismatched_dimensions_rejected() {
    let temp = assert_fs::TempDir::new().unwrap();
    write_png(temp.child("wall_base.png").path(), 4, 4, [200, 100, 50, 255]);
    write_png(temp.child("wall_normal.png").path(), 4, 4, [128, 128, 255, 255]);
    write_png(temp.child("wall_height.png").path(), 8, 8, [0, 0, 0, 255]);

    let result = MaterialImages::from_files(&temp.path().join("wall"), "png");
    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("height map"), "unexpected error: {}", e);
    }
}

#[test]
fn test_procedural_material() {
    let images = MaterialImages::procedural(256);
    assert_eq!(images.base.dimensions(), (256, 256));
    assert_eq!(images.normal.dimensions(), (256, 256));
    assert_eq!(images.height.dimensions(), (256, 256));

    // Inside a brick: raised, facing straight out.
    assert_eq!(images.height.get_pixel(32, 16)[0], 255);
    assert_eq!(images.normal.get_pixel(32, 16), &Rgba([128, 128, 255, 255]));

    // On a mortar line: recessed, also flat.
    assert_eq!(images.height.get_pixel(32, 0)[0], 0);
    assert_eq!(images.normal.get_pixel(32, 0), &Rgba([128, 128, 255, 255]));

    // Bevel at a brick's left edge leans towards -u.
    let bevel = images.normal.get_pixel(4, 16);
    assert!(bevel[0] < 128, "expected normal leaning towards -u, got {:?}", bevel);
}

#[test]
fn test_procedural_normals_are_unit_length() {
    let images = MaterialImages::procedural(64);
    for px in images.normal.pixels() {
        let n = crate::shading::decode_normal(glam::Vec3::new(
            px[0] as f32 / 255.0,
            px[1] as f32 / 255.0,
            px[2] as f32 / 255.0,
        ));
        assert!((n.length() - 1.0).abs() < 1e-4);
        assert!(n.z > 0.0);
    }
}
