//! Per-frame draw list produced by the view and consumed by the renderer.
//!
//! Views never touch the GPU. They record mesh and text draws here, with
//! the current alpha and clip applied, and the renderer replays them.
//!
//! Meshes and text go through different painters, so the list is cut into
//! [`DrawBatch`]es: a batch's meshes are painted, then its text, then the
//! next batch. A mesh recorded after some text always lands in a later batch.

use std::ops::Range;
use std::sync::Arc;

use ponzi_core::{Point, Rect};

use crate::camera::Matrix4;
use crate::color::Color;
use crate::mesh::{self, MeshData};
use crate::text::TextAlign;

#[derive(Debug, Clone)]
pub struct DrawMesh {
    pub mesh: Arc<MeshData>,
    pub model: Matrix4,
    pub tint: Color,
    pub alpha: f32,
    pub clip: Option<Rect>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawText {
    pub text: String,
    pub anchor: Point,
    pub size: f32,
    pub color: Color,
    pub align: TextAlign,
    pub clip: Option<Rect>,
}

/// Index ranges into [`DrawList::meshes`] and [`DrawList::texts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawBatch {
    pub meshes: Range<usize>,
    pub texts: Range<usize>,
}

#[derive(Debug, Default)]
pub struct DrawList {
    meshes: Vec<DrawMesh>,
    texts: Vec<DrawText>,
    /// `(mesh, text)` start indices of every batch after the first.
    batch_starts: Vec<(usize, usize)>,
    alpha_stack: Vec<f32>,
    clip_stack: Vec<Rect>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current global alpha: product of every active `with_alpha` scope.
    pub fn alpha(&self) -> f32 {
        self.alpha_stack.iter().product()
    }

    fn clip(&self) -> Option<Rect> {
        self.clip_stack.last().copied()
    }

    /// Run `f` with alpha multiplied by `alpha`.
    pub fn with_alpha<R>(&mut self, alpha: f32, f: impl FnOnce(&mut DrawList) -> R) -> R {
        self.alpha_stack.push(alpha.clamp(0.0, 1.0));
        let out = f(self);
        self.alpha_stack.pop();
        out
    }

    /// Run `f` with drawing clipped to `rect` (intersected with any outer clip).
    pub fn with_clip<R>(&mut self, rect: Rect, f: impl FnOnce(&mut DrawList) -> R) -> R {
        let rect = match self.clip() {
            Some(outer) => outer.intersect(&rect),
            None => rect,
        };
        self.clip_stack.push(rect);
        let out = f(self);
        self.clip_stack.pop();
        out
    }

    pub fn mesh(&mut self, mesh: &Arc<MeshData>, model: Matrix4) {
        self.mesh_tinted(mesh, model, Color::WHITE);
    }

    pub fn mesh_tinted(&mut self, mesh: &Arc<MeshData>, model: Matrix4, tint: Color) {
        let alpha = self.alpha();
        if alpha <= 0.0 || mesh.is_empty() {
            return;
        }
        let text_start = self.batch_starts.last().map_or(0, |&(_, t)| t);
        if self.texts.len() > text_start {
            self.batch_starts.push((self.meshes.len(), self.texts.len()));
        }
        self.meshes.push(DrawMesh {
            mesh: Arc::clone(mesh),
            model,
            tint,
            alpha,
            clip: self.clip(),
        });
    }

    /// Normalised mesh stretched over `rect`.
    pub fn mesh_in(&mut self, mesh: &Arc<MeshData>, rect: &Rect) {
        self.mesh(mesh, Matrix4::for_rect(rect));
    }

    pub fn fill_rect(&mut self, rect: &Rect, color: Color) {
        self.mesh_tinted(&mesh::unit_rect_fill(), Matrix4::for_rect(rect), color);
    }

    pub fn stroke_rect(&mut self, rect: &Rect, color: Color) {
        // Lines rasterize on pixel centers; shrink so the right and top edges stay inside.
        let r = Rect::new(rect.min.x, rect.min.y, rect.max.x - 1, rect.max.y - 1);
        self.mesh_tinted(&mesh::unit_rect_stroke(), Matrix4::for_rect(&r), color);
    }

    /// Horizontal line at `y` from `x0` to `x1`.
    pub fn hline(&mut self, x0: i32, x1: i32, y: i32, color: Color) {
        let r = Rect::new(x0, y, x1, y);
        self.mesh_tinted(&mesh::unit_hline(), Matrix4::for_rect(&r), color);
    }

    /// Vertical line at `x` from `y0` to `y1`.
    pub fn vline(&mut self, x: i32, y0: i32, y1: i32, color: Color) {
        let r = Rect::new(x, y0, x, y1);
        self.mesh_tinted(&mesh::unit_vline(), Matrix4::for_rect(&r), color);
    }

    pub fn text(&mut self, text: impl Into<String>, anchor: Point, size: f32, color: Color, align: TextAlign) {
        let alpha = self.alpha();
        let text = text.into();
        if alpha <= 0.0 || text.is_empty() {
            return;
        }
        self.texts.push(DrawText {
            text,
            anchor,
            size,
            color: color.with_alpha(alpha),
            align,
            clip: self.clip(),
        });
    }

    pub fn meshes(&self) -> &[DrawMesh] {
        &self.meshes
    }

    pub fn texts(&self) -> &[DrawText] {
        &self.texts
    }

    /// Paint order of the recorded draws. Never empty.
    pub fn batches(&self) -> Vec<DrawBatch> {
        let mut starts = vec![(0, 0)];
        starts.extend_from_slice(&self.batch_starts);
        let ends = starts.iter().skip(1).copied().chain([(self.meshes.len(), self.texts.len())]);
        starts
            .iter()
            .zip(ends)
            .map(|(&(m0, t0), (m1, t1))| DrawBatch {
                meshes: m0..m1,
                texts: t0..t1,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty() && self.texts.is_empty()
    }

    pub fn clear(&mut self) {
        self.meshes.clear();
        self.texts.clear();
        self.batch_starts.clear();
        self.alpha_stack.clear();
        self.clip_stack.clear();
    }
}
