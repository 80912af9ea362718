//! WebGPU rendering module
//!
//! Scene geometry is built on the CPU (`shapes`) and drawn in a single pass.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use shapes::scene_vertices;
pub use vertex::Vertex;
