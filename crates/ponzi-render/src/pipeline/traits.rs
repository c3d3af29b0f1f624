//! Traits for GPU rendering pipelines.
//!
//! This module defines the [`Pipeline`] trait which provides a common interface
//! for the rendering pipelines in the ponzi-render crate.

/// A trait for GPU rendering pipelines.
///
/// Every draw binds a slice of the shared uniform buffer at slot 0 (selected
/// by a dynamic offset) and then issues draws for pipeline-specific data.
///
/// # Example
///
/// ```ignore
/// impl Pipeline for MeshPipeline {
///     type DrawData = Mesh;
///
///     fn render<'a>(
///         &'a self,
///         render_pass: &mut wgpu::RenderPass<'a>,
///         uniform_bind_group: &'a wgpu::BindGroup,
///         uniform_offset: u32,
///         data: &'a Mesh,
///     ) {
///         render_pass.set_bind_group(0, uniform_bind_group, &[uniform_offset]);
///         // set pipeline, buffers, draw...
///     }
/// }
/// ```
pub trait Pipeline {
    /// GPU-resident data drawn by this pipeline.
    type DrawData;

    /// Records the draw commands for `data` into `render_pass`.
    ///
    /// # Arguments
    ///
    /// * `render_pass` - The render pass to record commands into
    /// * `uniform_bind_group` - The per-draw uniform bind group (slot 0)
    /// * `uniform_offset` - Dynamic offset of this draw's uniform block
    /// * `data` - The data to draw
    fn render<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        uniform_bind_group: &'a wgpu::BindGroup,
        uniform_offset: u32,
        data: &'a Self::DrawData,
    );

    /// Layout of the slot 0 uniform bind group.
    fn uniform_bind_group_layout(&self) -> &wgpu::BindGroupLayout;
}
