//! GPU render pipelines.

pub mod mesh;
pub mod traits;

pub use mesh::{Mesh, MeshPipeline};
pub use traits::Pipeline;
