//! Indexed line and triangle mesh pipeline.

use wgpu::util::DeviceExt;

use crate::gpu_types::{DrawUniform, Vertex};
use crate::mesh::MeshData;

use super::traits::Pipeline;

/// GPU buffers for one [`MeshData`].
///
/// Owns its buffers exclusively and is deliberately not `Clone`. After
/// [`close`](Mesh::close) the buffers are destroyed and the mesh draws nothing.
pub struct Mesh {
    vertex_buffer: wgpu::Buffer,
    line_index_buffer: Option<wgpu::Buffer>,
    line_index_count: u32,
    triangle_index_buffer: Option<wgpu::Buffer>,
    triangle_index_count: u32,
    closed: bool,
}

impl Mesh {
    pub fn upload(device: &wgpu::Device, data: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = |indices: &[u32], label: &str| {
            (!indices.is_empty()).then(|| {
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(label),
                    contents: bytemuck::cast_slice(indices),
                    usage: wgpu::BufferUsages::INDEX,
                })
            })
        };

        Self {
            line_index_buffer: index_buffer(&data.line_indices, "Mesh Line Index Buffer"),
            line_index_count: data.line_indices.len() as u32,
            triangle_index_buffer: index_buffer(&data.triangle_indices, "Mesh Triangle Index Buffer"),
            triangle_index_count: data.triangle_indices.len() as u32,
            vertex_buffer,
            closed: false,
        }
    }

    /// Release the GPU buffers now rather than on drop.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.vertex_buffer.destroy();
        if let Some(b) = &self.line_index_buffer {
            b.destroy();
        }
        if let Some(b) = &self.triangle_index_buffer {
            b.destroy();
        }
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        self.close();
    }
}

/// Pipelines for drawing [`Mesh`]es as filled triangles and 1px lines.
pub struct MeshPipeline {
    pub triangle_pipeline: wgpu::RenderPipeline,
    pub line_pipeline: wgpu::RenderPipeline,
    pub uniform_bind_group_layout: wgpu::BindGroupLayout,
}

impl MeshPipeline {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/mesh.wgsl").into()),
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<DrawUniform>() as u64),
                    },
                    count: None,
                }],
                label: Some("draw_uniform_bind_group_layout"),
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let make = |topology: wgpu::PrimitiveTopology, label: &str| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[Vertex::layout()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState {
                    count: 1,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
                cache: None,
            })
        };

        let triangle_pipeline = make(wgpu::PrimitiveTopology::TriangleList, "Mesh Triangle Pipeline");
        let line_pipeline = make(wgpu::PrimitiveTopology::LineList, "Mesh Line Pipeline");

        Self {
            triangle_pipeline,
            line_pipeline,
            uniform_bind_group_layout,
        }
    }

    pub fn create_uniform_bind_group(&self, device: &wgpu::Device, buffer: &wgpu::Buffer) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<DrawUniform>() as u64),
                }),
            }],
            label: Some("Draw Uniform Bind Group"),
        })
    }
}

impl Pipeline for MeshPipeline {
    type DrawData = Mesh;

    fn render<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        uniform_bind_group: &'a wgpu::BindGroup,
        uniform_offset: u32,
        mesh: &'a Mesh,
    ) {
        if mesh.closed {
            return;
        }
        render_pass.set_bind_group(0, uniform_bind_group, &[uniform_offset]);
        render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));

        if let Some(indices) = &mesh.triangle_index_buffer {
            render_pass.set_pipeline(&self.triangle_pipeline);
            render_pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..mesh.triangle_index_count, 0, 0..1);
        }
        if let Some(indices) = &mesh.line_index_buffer {
            render_pass.set_pipeline(&self.line_pipeline);
            render_pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..mesh.line_index_count, 0, 0..1);
        }
    }

    fn uniform_bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.uniform_bind_group_layout
    }
}
