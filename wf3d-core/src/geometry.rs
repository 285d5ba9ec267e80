/// Mesh data consumed by the rasterizer
use crate::vector::{Vec2, Vec3};

/// A vertex with position, normal, and texture coordinate
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub texcoord: Vec2,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, texcoord: Vec2) -> Self {
        Self {
            position,
            normal,
            texcoord,
        }
    }
}

/// Surface properties for a mesh; the wireframe pass uses the diffuse color
#[derive(Debug, Clone)]
pub struct Material {
    pub name: String,
    pub diffuse: Vec3,
}

impl Material {
    pub fn new(name: impl Into<String>, diffuse: Vec3) -> Self {
        Self {
            name: name.into(),
            diffuse,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new("default", Vec3::new(1.0, 1.0, 1.0))
    }
}

/// A flat vertex sequence interpreted in consecutive triples as triangles,
/// with one material for the whole mesh. Loaders keep the vertex count a
/// multiple of 3.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub material: Material,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, material: Material) -> Self {
        Self { vertices, material }
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Creates an axis-aligned cube with per-face normals, for demos and
    /// tests
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;

        // Each face: outward normal plus its corners in counter-clockwise
        // order as seen from outside.
        let faces = [
            (
                Vec3::new(0.0, 0.0, 1.0),
                [
                    Vec3::new(-1.0, -1.0, 1.0),
                    Vec3::new(1.0, -1.0, 1.0),
                    Vec3::new(1.0, 1.0, 1.0),
                    Vec3::new(-1.0, 1.0, 1.0),
                ],
            ),
            (
                Vec3::new(0.0, 0.0, -1.0),
                [
                    Vec3::new(1.0, -1.0, -1.0),
                    Vec3::new(-1.0, -1.0, -1.0),
                    Vec3::new(-1.0, 1.0, -1.0),
                    Vec3::new(1.0, 1.0, -1.0),
                ],
            ),
            (
                Vec3::new(0.0, 1.0, 0.0),
                [
                    Vec3::new(-1.0, 1.0, 1.0),
                    Vec3::new(1.0, 1.0, 1.0),
                    Vec3::new(1.0, 1.0, -1.0),
                    Vec3::new(-1.0, 1.0, -1.0),
                ],
            ),
            (
                Vec3::new(0.0, -1.0, 0.0),
                [
                    Vec3::new(-1.0, -1.0, -1.0),
                    Vec3::new(1.0, -1.0, -1.0),
                    Vec3::new(1.0, -1.0, 1.0),
                    Vec3::new(-1.0, -1.0, 1.0),
                ],
            ),
            (
                Vec3::new(1.0, 0.0, 0.0),
                [
                    Vec3::new(1.0, -1.0, 1.0),
                    Vec3::new(1.0, -1.0, -1.0),
                    Vec3::new(1.0, 1.0, -1.0),
                    Vec3::new(1.0, 1.0, 1.0),
                ],
            ),
            (
                Vec3::new(-1.0, 0.0, 0.0),
                [
                    Vec3::new(-1.0, -1.0, -1.0),
                    Vec3::new(-1.0, -1.0, 1.0),
                    Vec3::new(-1.0, 1.0, 1.0),
                    Vec3::new(-1.0, 1.0, -1.0),
                ],
            ),
        ];

        let texcoords = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];

        let mut vertices = Vec::with_capacity(faces.len() * 6);
        for (normal, corners) in faces {
            for corner in [0usize, 1, 2, 0, 2, 3] {
                vertices.push(Vertex::new(corners[corner] * half, normal, texcoords[corner]));
            }
        }

        Self::new(vertices, Material::default())
    }
}

/// An ordered collection of meshes, as produced by the model loader
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub meshes: Vec<Mesh>,
}

impl Model {
    pub fn new(meshes: Vec<Mesh>) -> Self {
        Self { meshes }
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(Mesh::triangle_count).sum()
    }
}

impl From<Mesh> for Model {
    fn from(mesh: Mesh) -> Self {
        Self::new(vec![mesh])
    }
}
