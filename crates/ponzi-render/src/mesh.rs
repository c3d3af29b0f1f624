//! CPU-side indexed meshes and shared unit shapes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use crate::color::Color;
use crate::gpu_types::Vertex;

/// Unique id assigned to every `MeshData`; the renderer keys GPU buffers by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(u64);

static NEXT_MESH_ID: AtomicU64 = AtomicU64::new(1);

impl MeshId {
    fn next() -> Self {
        MeshId(NEXT_MESH_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Vertices with separate index lists for line and triangle primitives.
///
/// Immutable once built. A replacement always gets a fresh id, so the
/// renderer never reuses stale buffers.
#[derive(Debug, PartialEq)]
pub struct MeshData {
    id: MeshId,
    pub vertices: Vec<Vertex>,
    /// Pairs of vertex indices, one pair per line segment.
    pub line_indices: Vec<u32>,
    /// Triples of vertex indices, one triple per triangle.
    pub triangle_indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<Vertex>, line_indices: Vec<u32>, triangle_indices: Vec<u32>) -> Self {
        debug_assert!(line_indices.len() % 2 == 0);
        debug_assert!(triangle_indices.len() % 3 == 0);
        Self {
            id: MeshId::next(),
            vertices,
            line_indices,
            triangle_indices,
        }
    }

    pub fn lines(vertices: Vec<Vertex>, line_indices: Vec<u32>) -> Self {
        Self::new(vertices, line_indices, Vec::new())
    }

    pub fn id(&self) -> MeshId {
        self.id
    }

    pub fn line_count(&self) -> usize {
        self.line_indices.len() / 2
    }

    pub fn triangle_count(&self) -> usize {
        self.triangle_indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || (self.line_indices.is_empty() && self.triangle_indices.is_empty())
    }
}

/// Incremental mesh construction.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    vertices: Vec<Vertex>,
    line_indices: Vec<u32>,
    triangle_indices: Vec<u32>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            line_indices: Vec::new(),
            triangle_indices: Vec::new(),
        }
    }

    /// Push a vertex and return its index.
    pub fn vertex(&mut self, x: f32, y: f32, color: Color) -> u32 {
        self.vertices.push(Vertex::new(x, y, color));
        (self.vertices.len() - 1) as u32
    }

    pub fn line(&mut self, a: u32, b: u32) {
        self.line_indices.extend_from_slice(&[a, b]);
    }

    pub fn triangle(&mut self, a: u32, b: u32, c: u32) {
        self.triangle_indices.extend_from_slice(&[a, b, c]);
    }

    /// Two new vertices joined by a segment.
    pub fn segment(&mut self, from: [f32; 2], to: [f32; 2], color: Color) {
        let a = self.vertex(from[0], from[1], color);
        let b = self.vertex(to[0], to[1], color);
        self.line(a, b);
    }

    pub fn build(self) -> MeshData {
        MeshData::new(self.vertices, self.line_indices, self.triangle_indices)
    }
}

/// Filled `[-1, 1]^2` square in white; tint to colour.
pub fn unit_rect_fill() -> Arc<MeshData> {
    static MESH: OnceLock<Arc<MeshData>> = OnceLock::new();
    MESH.get_or_init(|| {
        let mut b = MeshBuilder::new();
        let bl = b.vertex(-1.0, -1.0, Color::WHITE);
        let br = b.vertex(1.0, -1.0, Color::WHITE);
        let tr = b.vertex(1.0, 1.0, Color::WHITE);
        let tl = b.vertex(-1.0, 1.0, Color::WHITE);
        b.triangle(bl, br, tr);
        b.triangle(bl, tr, tl);
        Arc::new(b.build())
    })
    .clone()
}

/// Outline of the `[-1, 1]^2` square.
pub fn unit_rect_stroke() -> Arc<MeshData> {
    static MESH: OnceLock<Arc<MeshData>> = OnceLock::new();
    MESH.get_or_init(|| {
        let mut b = MeshBuilder::new();
        let bl = b.vertex(-1.0, -1.0, Color::WHITE);
        let br = b.vertex(1.0, -1.0, Color::WHITE);
        let tr = b.vertex(1.0, 1.0, Color::WHITE);
        let tl = b.vertex(-1.0, 1.0, Color::WHITE);
        b.line(bl, br);
        b.line(br, tr);
        b.line(tr, tl);
        b.line(tl, bl);
        Arc::new(b.build())
    })
    .clone()
}

/// Horizontal segment from `(-1, 0)` to `(1, 0)`.
pub fn unit_hline() -> Arc<MeshData> {
    static MESH: OnceLock<Arc<MeshData>> = OnceLock::new();
    MESH.get_or_init(|| {
        let mut b = MeshBuilder::new();
        b.segment([-1.0, 0.0], [1.0, 0.0], Color::WHITE);
        Arc::new(b.build())
    })
    .clone()
}

/// Vertical segment from `(0, -1)` to `(0, 1)`.
pub fn unit_vline() -> Arc<MeshData> {
    static MESH: OnceLock<Arc<MeshData>> = OnceLock::new();
    MESH.get_or_init(|| {
        let mut b = MeshBuilder::new();
        b.segment([0.0, -1.0], [0.0, 1.0], Color::WHITE);
        Arc::new(b.build())
    })
    .clone()
}
