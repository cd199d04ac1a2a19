pub mod camera;
pub mod gpu_context;
pub mod mesh;
pub mod mesh_pipeline;
pub mod texture;
pub mod vertex;

pub use camera::{Camera3D, CameraUniform, Projection};
pub use gpu_context::{GpuContext, DEPTH_FORMAT};
pub use mesh::{Mesh, MeshData};
pub use mesh_pipeline::{MeshPipeline, ObjectUniform};
pub use texture::Texture;
pub use vertex::MeshVertex;
