//! wgpu presentation of a [`Canvas`]
//!
//! The canvas is uploaded straight into the swapchain texture with
//! `Queue::write_texture`, so no pipeline or shader is involved.

use std::sync::Arc;

use winit::window::Window;

use super::BackendError;
use crate::renderer::{Canvas, ChannelOrder};

/// Surface formats a canvas can be copied into byte for byte
const COPYABLE_FORMATS: [(wgpu::TextureFormat, ChannelOrder); 4] = [
    (wgpu::TextureFormat::Bgra8UnormSrgb, ChannelOrder::Bgra),
    (wgpu::TextureFormat::Bgra8Unorm, ChannelOrder::Bgra),
    (wgpu::TextureFormat::Rgba8UnormSrgb, ChannelOrder::Rgba),
    (wgpu::TextureFormat::Rgba8Unorm, ChannelOrder::Rgba),
];

/// Window surface plus the device that writes to it
pub(super) struct Presenter {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    order: ChannelOrder,
}

impl Presenter {
    pub(super) async fn new(window: Arc<Window>) -> Result<Self, BackendError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| BackendError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| BackendError::Graphics("no compatible GPU adapter".to_string()))?;

        log::info!("Using GPU: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Frameloop Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .map_err(|e| BackendError::Graphics(e.to_string()))?;

        let caps = surface.get_capabilities(&adapter);
        if !caps.usages.contains(wgpu::TextureUsages::COPY_DST) {
            return Err(BackendError::Unsupported(
                "surface textures cannot be written to".to_string(),
            ));
        }

        let (format, order) = COPYABLE_FORMATS
            .iter()
            .copied()
            .find(|(format, _)| caps.formats.contains(format))
            .ok_or_else(|| {
                BackendError::Unsupported(format!(
                    "no 8-bit RGBA/BGRA surface format among {:?}",
                    caps.formats
                ))
            })?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::COPY_DST,
            format,
            width: size.width,
            height: size.height,
            // Pacing is left to the frame limiter
            present_mode: wgpu::PresentMode::AutoNoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        if size.width > 0 && size.height > 0 {
            surface.configure(&device, &config);
        }
        log::debug!("Surface configured: {:?} {}x{}", format, size.width, size.height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            order,
        })
    }

    /// Reconfigure the surface. Zero sizes (minimized windows) are remembered
    /// but not applied.
    pub(super) fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width;
        self.config.height = height;
        if width > 0 && height > 0 {
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Copy the canvas into the next swapchain image and show it.
    pub(super) fn present(&mut self, canvas: &Canvas) -> Result<(), BackendError> {
        if self.config.width == 0 || self.config.height == 0 {
            return Ok(());
        }

        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface timed out, dropping frame");
                return Ok(());
            }
            Err(e) => return Err(BackendError::Surface(e.to_string())),
        };

        let width = self.config.width.min(canvas.width());
        let height = self.config.height.min(canvas.height());
        if width > 0 && height > 0 {
            let bytes = canvas.region_bytes(width, height, self.order);
            self.queue.write_texture(
                wgpu::ImageCopyTexture {
                    texture: &frame.texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &bytes,
                wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * width),
                    rows_per_image: Some(height),
                },
                wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
            );
        }

        self.queue.submit(std::iter::empty());
        frame.present();
        Ok(())
    }
}
