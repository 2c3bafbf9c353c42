use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::model::Vertex;

/// Per-draw values shared by every vertex and fragment invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    pub projection: Mat4,
    pub view: Mat4,
    pub model: Mat4,
    pub light_pos: Vec3,
    pub view_pos: Vec3,
}

impl FrameUniforms {
    pub fn normal_matrix(&self) -> Mat3 {
        normal_matrix(self.model)
    }
}

/// Outputs of the vertex stage, consumed by the fragment stage after interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Varyings {
    pub frag_pos: Vec3,
    pub tex_coords: Vec2,
    pub tangent_light_pos: Vec3,
    pub tangent_view_pos: Vec3,
    pub tangent_frag_pos: Vec3,
}

impl Varyings {
    /// Unit vector from the fragment towards the light, in tangent space.
    pub fn light_dir(&self) -> Vec3 {
        (self.tangent_light_pos - self.tangent_frag_pos).normalize()
    }

    /// Unit vector from the fragment towards the eye, in tangent space.
    pub fn view_dir(&self) -> Vec3 {
        (self.tangent_view_pos - self.tangent_frag_pos).normalize()
    }
}

/// Inverse-transpose of the model matrix's upper 3x3. Keeps normals
/// perpendicular to the surface under non-uniform scale.
pub fn normal_matrix(model: Mat4) -> Mat3 {
    Mat3::from_mat4(model).inverse().transpose()
}

/// World-space tangent/bitangent/normal basis of a single vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TangentFrame {
    pub tangent: Vec3,
    pub bitangent: Vec3,
    pub normal: Vec3,
}

impl TangentFrame {
    /// Builds the basis from object-space normal and tangent.
    ///
    /// The tangent is re-orthogonalized against the normal (Gram-Schmidt) and
    /// the bitangent is `normal x tangent`. A tangent parallel to the normal
    /// yields NaNs; callers are expected to supply a usable tangent.
    pub fn new(model: Mat4, normal: Vec3, tangent: Vec3) -> Self {
        let normal_matrix = normal_matrix(model);
        let n = (normal_matrix * normal).normalize();
        let t = (normal_matrix * tangent).normalize();
        let t = (t - n * t.dot(n)).normalize();
        let b = n.cross(t);

        Self {
            tangent: t,
            bitangent: b,
            normal: n,
        }
    }

    /// Transpose of `[T B N]`; maps world-space vectors into tangent space.
    pub fn world_to_tangent(&self) -> Mat3 {
        Mat3::from_cols(self.tangent, self.bitangent, self.normal).transpose()
    }

    pub fn is_orthonormal(&self, epsilon: f32) -> bool {
        let unit = |v: Vec3| approx::relative_eq!(v.length(), 1.0, epsilon = epsilon);
        let orthogonal = |a: Vec3, b: Vec3| approx::abs_diff_eq!(a.dot(b), 0.0, epsilon = epsilon);

        unit(self.tangent)
            && unit(self.bitangent)
            && unit(self.normal)
            && orthogonal(self.tangent, self.bitangent)
            && orthogonal(self.tangent, self.normal)
            && orthogonal(self.bitangent, self.normal)
    }
}

/// Runs the vertex stage for one vertex, returning the clip-space position
/// and the tangent-space varyings.
pub fn vertex_stage(uniforms: &FrameUniforms, vertex: &Vertex) -> (Vec4, Varyings) {
    let world_pos = uniforms.model * Vec3::from(vertex.position).extend(1.0);
    let frame = TangentFrame::new(
        uniforms.model,
        Vec3::from(vertex.normal),
        Vec3::from(vertex.tangent),
    );
    let tbn = frame.world_to_tangent();
    let frag_pos = world_pos.truncate();

    let varyings = Varyings {
        frag_pos,
        tex_coords: Vec2::from(vertex.tex_coords),
        tangent_light_pos: tbn * uniforms.light_pos,
        tangent_view_pos: tbn * uniforms.view_pos,
        tangent_frag_pos: tbn * frag_pos,
    };

    (uniforms.projection * uniforms.view * world_pos, varyings)
}
