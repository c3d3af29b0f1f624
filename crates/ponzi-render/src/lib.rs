//! Chart geometry and GPU rendering for ponzi2.
//!
//! The CPU half (geometry, meshes, draw lists, text metrics, PLY icons) has
//! no GPU dependency at runtime and is fully testable headless. The GPU half
//! (`GpuContext`, `MeshPipeline`, `Renderer`) replays draw lists with wgpu.

pub mod camera;
pub mod color;
pub mod draw_list;
pub mod geometry;
pub mod gpu_context;
pub mod gpu_types;
pub mod icons;
pub mod mesh;
pub mod pipeline;
pub mod ply;
pub mod renderer;
pub mod text;

pub use camera::{Camera, Matrix4};
pub use color::Color;
pub use draw_list::{DrawBatch, DrawList, DrawMesh, DrawText};
pub use geometry::{
    build_average_line, build_level_lines, build_polyline, build_price_mesh, build_stochastic_lines,
    build_volume_mesh, session_color, session_index_at, session_mid_x, stick_half_width, GeometryError,
    ValueRange,
};
pub use gpu_context::{GpuContext, GpuInitError};
pub use gpu_types::{DrawUniform, Vertex};
pub use icons::Icons;
pub use mesh::{MeshBuilder, MeshData, MeshId};
pub use pipeline::{Mesh, MeshPipeline, Pipeline};
pub use ply::PlyError;
pub use renderer::Renderer;
pub use text::{TextAlign, TextMetrics};
