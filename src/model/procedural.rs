use glam::Vec3;
use image::{Rgba, RgbaImage};

use crate::shading::encode_normal;

const BRICKS_PER_ROW: u32 = 4;
const BRICK_ROWS: u32 = 8;
/// Slope applied when baking the normal map from the height map.
const NORMAL_STRENGTH: f32 = 4.0;

/// Brick wall base color, height and normal maps of `size` x `size` texels.
pub fn brick_wall(size: u32) -> (RgbaImage, RgbaImage, RgbaImage) {
    let size = size.max(BRICKS_PER_ROW * 8);
    let brick_w = size / BRICKS_PER_ROW;
    let brick_h = size / BRICK_ROWS;
    let mortar = (size / 64).max(1);
    let bevel = (size / 64).max(1);

    let heights: Vec<f32> = (0..size * size)
        .map(|i| {
            let (x, y) = (i % size, i / size);
            let (bx, by, _) = brick_coords(x, y, brick_w, brick_h);
            let edge = bx.min(brick_w - 1 - bx).min(by).min(brick_h - 1 - by);
            if edge < mortar {
                0.0
            } else {
                ((edge - mortar + 1) as f32 / bevel as f32).min(1.0)
            }
        })
        .collect();

    let base = RgbaImage::from_fn(size, size, |x, y| {
        let (_, _, brick_id) = brick_coords(x, y, brick_w, brick_h);
        let grain = (hash(x, y) % 24) as f32 / 255.0;
        let color = if heights[(y * size + x) as usize] == 0.0 {
            Vec3::new(0.66, 0.64, 0.60) + Vec3::splat(grain)
        } else {
            let tint = (hash(brick_id, 0x9e37) % 40) as f32 / 255.0;
            Vec3::new(0.55 + tint, 0.24 + tint * 0.5, 0.16) + Vec3::splat(grain * 0.5)
        };
        to_rgba(color)
    });

    let height = RgbaImage::from_fn(size, size, |x, y| {
        let h = (heights[(y * size + x) as usize] * 255.0).round() as u8;
        Rgba([h, h, h, 255])
    });

    let normal = RgbaImage::from_fn(size, size, |x, y| {
        let sample = |dx: i64, dy: i64| {
            let sx = (x as i64 + dx).rem_euclid(size as i64) as u32;
            let sy = (y as i64 + dy).rem_euclid(size as i64) as u32;
            heights[(sy * size + sx) as usize]
        };
        let du = (sample(1, 0) - sample(-1, 0)) * 0.5;
        let dv = (sample(0, 1) - sample(0, -1)) * 0.5;
        let n = Vec3::new(-du * NORMAL_STRENGTH, -dv * NORMAL_STRENGTH, 1.0);
        to_rgba(encode_normal(n))
    });

    (base, height, normal)
}

/// Position inside the brick and an identifier of the brick itself.
/// Odd rows are shifted by half a brick.
fn brick_coords(x: u32, y: u32, brick_w: u32, brick_h: u32) -> (u32, u32, u32) {
    let row = y / brick_h;
    let shift = if row % 2 == 1 { brick_w / 2 } else { 0 };
    let shifted = x + shift;
    let column = shifted / brick_w;
    (shifted % brick_w, y % brick_h, row * 64 + column)
}

fn to_rgba(color: Vec3) -> Rgba<u8> {
    let c = (color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
    Rgba([c.x as u8, c.y as u8, c.z as u8, 255])
}

fn hash(x: u32, y: u32) -> u32 {
    let mut h = x.wrapping_mul(0x85eb_ca6b) ^ y.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h = h.wrapping_mul(0x7feb_352d);
    h ^= h >> 15;
    h
}
