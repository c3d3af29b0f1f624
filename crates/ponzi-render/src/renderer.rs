//! Frame renderer: replays a [`DrawList`] with the mesh pipeline.

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use ponzi_core::Rect;

use crate::camera::Camera;
use crate::color::Color;
use crate::draw_list::DrawList;
use crate::gpu_context::GpuContext;
use crate::gpu_types::{DrawUniform, UNIFORM_STRIDE};
use crate::mesh::MeshId;
use crate::pipeline::{Mesh, MeshPipeline, Pipeline};

const INITIAL_UNIFORM_SLOTS: u64 = 256;

/// Owns the mesh pipeline, the per-draw uniform buffer and the GPU copies
/// of every mesh referenced by recent frames.
pub struct Renderer {
    pipeline: MeshPipeline,
    camera: Camera,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    uniform_slots: u64,
    meshes: HashMap<MeshId, Mesh>,
    staging: Vec<u8>,
}

impl Renderer {
    pub fn new(ctx: &GpuContext) -> Self {
        let pipeline = MeshPipeline::new(&ctx.device, ctx.surface_format());
        let (width, height) = ctx.dimensions();
        let (uniform_buffer, uniform_bind_group) =
            Self::create_uniforms(&ctx.device, &pipeline, INITIAL_UNIFORM_SLOTS);

        Self {
            pipeline,
            camera: Camera::new(width, height),
            uniform_buffer,
            uniform_bind_group,
            uniform_slots: INITIAL_UNIFORM_SLOTS,
            meshes: HashMap::new(),
            staging: Vec::new(),
        }
    }

    fn create_uniforms(
        device: &wgpu::Device,
        pipeline: &MeshPipeline,
        slots: u64,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Draw Uniform Buffer"),
            size: slots * UNIFORM_STRIDE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = pipeline.create_uniform_bind_group(device, &buffer);
        (buffer, bind_group)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
    }

    /// Upload the meshes and per-draw uniforms of `list`. Call once per
    /// frame before any [`Renderer::draw`].
    pub fn prepare(&mut self, ctx: &GpuContext, list: &DrawList) {
        let draws = list.meshes();

        for draw in draws {
            self.meshes
                .entry(draw.mesh.id())
                .or_insert_with(|| Mesh::upload(&ctx.device, &draw.mesh));
        }

        let needed = draws.len() as u64;
        if needed > self.uniform_slots {
            let slots = needed.next_power_of_two();
            log::debug!("growing uniform buffer to {slots} draws");
            let (buffer, bind_group) = Self::create_uniforms(&ctx.device, &self.pipeline, slots);
            self.uniform_buffer = buffer;
            self.uniform_bind_group = bind_group;
            self.uniform_slots = slots;
        }

        let proj_view = self.camera.build_view_projection_matrix();
        self.staging.clear();
        self.staging.resize((needed * UNIFORM_STRIDE) as usize, 0);
        for (i, draw) in draws.iter().enumerate() {
            let uniform = DrawUniform::new(proj_view, draw.model, draw.tint, draw.alpha);
            let start = i * UNIFORM_STRIDE as usize;
            let bytes = bytemuck::bytes_of(&uniform);
            self.staging[start..start + bytes.len()].copy_from_slice(bytes);
        }
        if !self.staging.is_empty() {
            ctx.queue.write_buffer(&self.uniform_buffer, 0, &self.staging);
        }
    }

    /// Record the prepared mesh draws in `range` into one pass over `view`.
    /// The pass clears to `clear` when given and loads otherwise.
    pub fn draw(
        &self,
        ctx: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        list: &DrawList,
        range: Range<usize>,
        clear: Option<Color>,
    ) {
        let load = match clear {
            Some(Color([r, g, b, a])) => wgpu::LoadOp::Clear(wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: a as f64,
            }),
            None => wgpu::LoadOp::Load,
        };
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Chart Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        let (width, height) = ctx.dimensions();
        let draws = &list.meshes()[range.clone()];
        for (i, draw) in range.zip(draws) {
            let Some(mesh) = self.meshes.get(&draw.mesh.id()) else {
                continue;
            };
            let clip = draw.clip.unwrap_or_else(|| Rect::from_size(width as i32, height as i32));
            let Some((x, y, w, h)) = scissor_rect(&clip, width, height) else {
                continue;
            };
            render_pass.set_scissor_rect(x, y, w, h);
            let offset = (i as u64 * UNIFORM_STRIDE) as u32;
            self.pipeline.render(&mut render_pass, &self.uniform_bind_group, offset, mesh);
        }
    }

    /// Drop GPU meshes the frame in `list` did not reference. Call after the
    /// frame has been submitted so in-flight draws keep their buffers.
    pub fn release_unused(&mut self, list: &DrawList) {
        let live: HashSet<MeshId> = list.meshes().iter().map(|d| d.mesh.id()).collect();
        let before = self.meshes.len();
        self.meshes.retain(|id, _| live.contains(id));
        let released = before - self.meshes.len();
        if released > 0 {
            log::trace!("released {released} meshes");
        }
    }
}

/// Convert a bottom-left-origin clip rect into a top-left-origin scissor
/// `(x, y, width, height)` clamped to the surface. `None` when empty.
pub fn scissor_rect(clip: &Rect, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let surface = Rect::from_size(width as i32, height as i32);
    let r = clip.intersect(&surface);
    if r.is_empty() {
        return None;
    }
    let top = height as i32 - r.max.y;
    Some((r.min.x as u32, top as u32, r.width() as u32, r.height() as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scissor_flips_y() {
        assert_eq!(scissor_rect(&Rect::new(10, 0, 110, 50), 200, 100), Some((10, 50, 100, 50)));
        assert_eq!(scissor_rect(&Rect::new(0, 0, 200, 100), 200, 100), Some((0, 0, 200, 100)));
    }

    #[test]
    fn test_scissor_clamps_and_rejects_empty() {
        assert_eq!(scissor_rect(&Rect::new(-10, 90, 20, 150), 200, 100), Some((0, 0, 20, 10)));
        assert_eq!(scissor_rect(&Rect::new(300, 0, 400, 10), 200, 100), None);
    }
}
