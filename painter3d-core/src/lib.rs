/// Painter3D Core Library - software geometry pipeline
///
/// Turns triangle meshes and a moving camera into depth-ordered, shaded,
/// clipped screen-space triangles for an external flat-fill rasterizer.
pub mod clip;
pub mod config;
pub mod error;
pub mod geometry;
pub mod matrix;
pub mod obj;
pub mod pipeline;
pub mod projection;
pub mod vector;

// Re-export commonly used types
pub use clip::{Clipped, Plane};
pub use config::PipelineConfig;
pub use error::{ConfigError, MathError, MeshError};
pub use geometry::{Mesh, Triangle};
pub use matrix::{Mat4, RigidTransform};
pub use pipeline::{Frame, FrameStats, Pipeline, Rasterizer};
pub use projection::{Camera, Viewport};
pub use vector::Vec3;
