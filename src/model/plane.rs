use glam::{Vec2, Vec3};

use super::Vertex;

/// Quads per side for each detail level, coarse to fine.
pub const SUBDIVISION_LEVELS: [u32; 6] = [2, 4, 16, 64, 256, 1024];

const MIN: f32 = -1.0;
const EXTENT: f32 = 2.0;

/// Vertex and index data ready for upload.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

/// Square spanning [-1, 1] in x and y at z = 0, facing +Z, with
/// `subdivisions` quads per side. UVs run from (0, 0) at the lower left to
/// (1, 1) at the upper right; triangles wind counter-clockwise seen from +Z.
pub fn generate_plane(subdivisions: u32) -> MeshData {
    let n = subdivisions.max(1);
    let row = n + 1;

    let mut vertices = Vec::with_capacity((row * row) as usize);
    for j in 0..row {
        for i in 0..row {
            let uv = Vec2::new(i as f32 / n as f32, j as f32 / n as f32);
            let position = Vec2::splat(MIN) + uv * EXTENT;
            vertices.push(Vertex {
                position: [position.x, position.y, 0.0],
                normal: [0.0, 0.0, 1.0],
                height: 0.0,
                tex_coords: uv.to_array(),
                tangent: [0.0; 3],
                bitangent: [0.0; 3],
            });
        }
    }

    let mut indices = Vec::with_capacity((n * n * 6) as usize);
    for j in 0..n {
        for i in 0..n {
            let p00 = j * row + i;
            let p10 = p00 + 1;
            let p01 = p00 + row;
            let p11 = p01 + 1;
            indices.extend_from_slice(&[p00, p10, p11, p00, p11, p01]);
        }
    }

    compute_tangents(&mut vertices, &indices);

    MeshData { vertices, indices }
}

/// Fills in per-vertex tangents and bitangents from triangle edges and UV
/// deltas, area-weighted across the triangles sharing a vertex.
///
/// Tangents are Gram-Schmidt orthogonalized against the vertex normal.
/// Triangles with degenerate UVs contribute nothing; vertices left without a
/// usable tangent get an arbitrary one perpendicular to the normal.
pub fn compute_tangents(vertices: &mut [Vertex], indices: &[u32]) {
    let mut tangents = vec![Vec3::ZERO; vertices.len()];
    let mut bitangents = vec![Vec3::ZERO; vertices.len()];

    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let p0 = Vec3::from(vertices[a].position);
        let edge1 = Vec3::from(vertices[b].position) - p0;
        let edge2 = Vec3::from(vertices[c].position) - p0;

        let uv0 = Vec2::from(vertices[a].tex_coords);
        let delta_uv1 = Vec2::from(vertices[b].tex_coords) - uv0;
        let delta_uv2 = Vec2::from(vertices[c].tex_coords) - uv0;

        let det = delta_uv1.x * delta_uv2.y - delta_uv2.x * delta_uv1.y;
        if det.abs() < 1e-6 {
            continue;
        }
        let f = 1.0 / det;
        let tangent = (edge1 * delta_uv2.y - edge2 * delta_uv1.y) * f;
        let bitangent = (edge2 * delta_uv1.x - edge1 * delta_uv2.x) * f;

        let area = edge1.cross(edge2).length() * 0.5;
        for idx in [a, b, c] {
            tangents[idx] += tangent * area;
            bitangents[idx] += bitangent * area;
        }
    }

    for (i, vertex) in vertices.iter_mut().enumerate() {
        let normal = Vec3::from(vertex.normal).normalize();

        let mut tangent = tangents[i] - normal * tangents[i].dot(normal);
        if tangent.length_squared() < 1e-12 {
            tangent = any_perpendicular(normal);
        }
        let tangent = tangent.normalize();

        let bitangent = if bitangents[i].length_squared() < 1e-12 {
            normal.cross(tangent)
        } else {
            bitangents[i].normalize()
        };

        vertex.tangent = tangent.to_array();
        vertex.bitangent = bitangent.to_array();
    }
}

fn any_perpendicular(normal: Vec3) -> Vec3 {
    let axis = if normal.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
    axis - normal * axis.dot(normal)
}
