mod texture;
mod material;
mod mesh;
mod plane;
mod procedural;
mod vertex;

pub use texture::Texture;
pub use material::{texture_path, ImageSamplers, Material, MaterialImages};
pub use mesh::Mesh;
pub use plane::{compute_tangents, generate_plane, MeshData, SUBDIVISION_LEVELS};
pub use vertex::Vertex;

#[cfg(test)]
mod tests;
