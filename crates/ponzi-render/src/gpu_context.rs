//! GPU context management for wgpu-based rendering.
//!
//! This module provides the [`GpuContext`] struct which encapsulates the core wgpu
//! resources needed for GPU rendering: device, queue, surface, and configuration.
//! It is the only owner of GPU state and is passed explicitly to every draw.

use thiserror::Error;

/// Errors raised while bringing up the GPU.
#[derive(Error, Debug)]
pub enum GpuInitError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter found")]
    NoAdapter,
    #[error("failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}

/// Encapsulates the core wgpu resources needed for GPU rendering.
///
/// `GpuContext` owns the GPU device, command queue, render surface, and surface
/// configuration. Dropping it releases every GPU resource created from it.
pub struct GpuContext {
    /// The wgpu device for creating GPU resources.
    pub device: wgpu::Device,
    /// The command queue for submitting GPU commands.
    pub queue: wgpu::Queue,
    /// The render surface (typically backed by a window).
    pub surface: wgpu::Surface<'static>,
    /// Configuration for the surface (format, size, present mode, etc.).
    pub config: wgpu::SurfaceConfiguration,
    /// Whether the surface has been configured with a non-zero size.
    pub is_surface_configured: bool,
}

impl GpuContext {
    /// Create a surface for `window` and pick an adapter and device for it.
    ///
    /// # Errors
    ///
    /// Fails when no adapter can present to the window or the device request
    /// is rejected. Callers treat this as fatal at startup.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<Self, GpuInitError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuInitError::NoAdapter)?;

        log::info!("using GPU adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("ponzi2 device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or(GpuInitError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let mut ctx = Self {
            device,
            queue,
            surface,
            config,
            is_surface_configured: false,
        };
        ctx.resize(width, height);
        Ok(ctx)
    }

    /// Resizes the surface to the given dimensions.
    ///
    /// Zero-sized requests (minimised windows) leave the surface unconfigured
    /// so no frame is rendered until a real size arrives.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            self.is_surface_configured = false;
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.is_surface_configured = true;
    }

    /// Reconfigure with the current size, after the surface was lost.
    pub fn reconfigure(&mut self) {
        let (w, h) = self.dimensions();
        log::warn!("surface lost, reconfiguring at {w}x{h}");
        self.resize(w, h);
    }

    /// Gets the current texture from the surface for rendering.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface texture cannot be acquired (e.g., if
    /// the surface is lost or outdated).
    pub fn get_current_texture(&self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }

    /// Returns the surface texture format.
    #[must_use]
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Returns the current surface dimensions as (width, height).
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }
}
