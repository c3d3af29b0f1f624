//! GPU and rendering resources.
//!
//! Meshes from the frame's draw list go through the wgpu mesh renderer and
//! text is painted by egui, batch by batch, keeping the list's draw order.

use std::sync::Arc;

use egui::epaint::ClippedShape;
use ponzi_core::Rect;
use ponzi_render::{DrawList, DrawText, GpuContext, GpuInitError, Renderer, TextAlign};
use winit::event::WindowEvent;
use winit::window::Window;

use crate::view::theme;

pub struct GraphicsState {
    pub gpu: GpuContext,
    renderer: Renderer,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl GraphicsState {
    pub async fn new(window: Arc<Window>) -> Result<Self, GpuInitError> {
        let size = window.inner_size();
        let gpu = GpuContext::new(window.clone(), size.width, size.height).await?;
        let renderer = Renderer::new(&gpu);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&gpu.device, gpu.surface_format(), None, 1, false);

        Ok(Self {
            gpu,
            renderer,
            egui_ctx,
            egui_state,
            egui_renderer,
        })
    }

    /// Keep egui's view of the window (size, scale factor) current.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) {
        let _ = self.egui_state.on_window_event(window, event);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
        self.renderer.resize(width, height);
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.gpu.dimensions()
    }

    /// Draw one frame and present it.
    ///
    /// Each draw batch gets a mesh pass followed by an egui pass for its
    /// text, submitted in order, so later meshes cover earlier text.
    pub fn render(&mut self, window: &Window, list: &DrawList) -> Result<(), wgpu::SurfaceError> {
        if !self.gpu.is_surface_configured {
            return Ok(());
        }

        let output = self.gpu.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let batches = list.batches();
        self.renderer.prepare(&self.gpu, list);

        let height = self.gpu.config.height as f32;
        let raw_input = self.egui_state.take_egui_input(window);
        let mut batch_shapes = Vec::new();
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            batch_shapes = batches
                .iter()
                .map(|batch| text_shapes(ctx, &list.texts()[batch.texts.clone()], height))
                .collect();
        });
        self.egui_state.handle_platform_output(window, full_output.platform_output);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.config.width, self.gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer.update_texture(&self.gpu.device, &self.gpu.queue, *id, image_delta);
        }

        for (i, (batch, shapes)) in batches.iter().zip(batch_shapes).enumerate() {
            let mut encoder = self.gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
            let clear = (i == 0).then_some(theme::BACKGROUND);
            self.renderer
                .draw(&self.gpu, &mut encoder, &view, list, batch.meshes.clone(), clear);

            if !shapes.is_empty() {
                let paint_jobs = self.egui_ctx.tessellate(shapes, full_output.pixels_per_point);
                // Buffer writes land at submit, so every batch is submitted on its own.
                self.egui_renderer.update_buffers(
                    &self.gpu.device,
                    &self.gpu.queue,
                    &mut encoder,
                    &paint_jobs,
                    &screen_descriptor,
                );
                let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Egui Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                });
                let mut render_pass = render_pass.forget_lifetime();
                self.egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
            }
            self.gpu.queue.submit(std::iter::once(encoder.finish()));
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
        output.present();
        self.renderer.release_unused(list);
        Ok(())
    }

    /// Render, reconfiguring the surface once if it was lost or outdated.
    pub fn render_or_recover(&mut self, window: &Window, list: &DrawList) {
        match self.render(window, list) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => self.gpu.reconfigure(),
            Err(wgpu::SurfaceError::Timeout) => log::debug!("surface timeout, skipping frame"),
            Err(e) => log::error!("unable to render: {e}"),
        }
    }
}

/// Lay out text draws as egui shapes. Draw coordinates are physical pixels
/// with a bottom-left origin; egui wants points from the top-left.
fn text_shapes(ctx: &egui::Context, texts: &[DrawText], height: f32) -> Vec<ClippedShape> {
    let ppp = ctx.pixels_per_point();
    texts
        .iter()
        .map(|text| {
            let [r, g, b, a] = text.color.to_rgba8();
            let color = egui::Color32::from_rgba_unmultiplied(r, g, b, a);
            let font = egui::FontId::monospace(text.size / ppp);
            let galley = ctx.fonts(|fonts| fonts.layout_no_wrap(text.text.clone(), font, color));
            let pos = egui::pos2(text.anchor.x as f32 / ppp, (height - text.anchor.y as f32) / ppp);
            let rect = anchor(text.align).anchor_size(pos, galley.size());
            ClippedShape {
                clip_rect: text
                    .clip
                    .map_or(egui::Rect::EVERYTHING, |clip| to_egui_rect(&clip, height, ppp)),
                shape: egui::Shape::galley(rect.min, galley, color),
            }
        })
        .collect()
}

fn anchor(align: TextAlign) -> egui::Align2 {
    match align {
        TextAlign::Left => egui::Align2::LEFT_BOTTOM,
        TextAlign::Center => egui::Align2::CENTER_BOTTOM,
        TextAlign::Right => egui::Align2::RIGHT_BOTTOM,
    }
}

fn to_egui_rect(rect: &Rect, height: f32, ppp: f32) -> egui::Rect {
    egui::Rect::from_min_max(
        egui::pos2(rect.min.x as f32 / ppp, (height - rect.max.y as f32) / ppp),
        egui::pos2(rect.max.x as f32 / ppp, (height - rect.min.y as f32) / ppp),
    )
}
