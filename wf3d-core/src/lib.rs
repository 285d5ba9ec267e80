/// WF3D Core Library - geometry pipeline for software wireframe rendering
///
/// This library provides the frontend-independent pieces of the viewer:
/// vector and matrix math, a first-person camera, OBJ/MTL parsing, and the
/// rasterizer that draws triangle edges into a packed RGBA color buffer.

pub mod camera;
pub mod geometry;
pub mod matrix;
pub mod obj;
pub mod rasterizer;
pub mod vector;

// Re-export commonly used types
pub use camera::{Camera, Movement};
pub use geometry::{Material, Mesh, Model, Vertex};
pub use matrix::{Mat3, Mat4, Matrix};
pub use rasterizer::Rasterizer;
pub use vector::{Vec2, Vec3, Vec4, Vector};
