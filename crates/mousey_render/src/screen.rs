use mousey_core::ScreenProjection;

use crate::gpu_context::GpuContext;
use crate::projection::ProjectionBuffer;

/// Per-frame surface handling: resize to the window, clear, upload the screen
/// projection, and hold the acquired texture until `present`.
pub struct ScreenRenderer {
    gpu: GpuContext,
    projection: ProjectionBuffer,
    clear_color: wgpu::Color,
    pending: Option<wgpu::SurfaceTexture>,
}

impl ScreenRenderer {
    pub fn new(gpu: GpuContext) -> Self {
        let projection = ProjectionBuffer::new(&gpu.device);
        Self {
            gpu,
            projection,
            clear_color: wgpu::Color::TRANSPARENT,
            pending: None,
        }
    }

    /// Returns `false` when nothing can be drawn this frame.
    pub fn prepare(&mut self, projection: &ScreenProjection) -> bool {
        if projection.is_empty() {
            return false;
        }
        // A texture left over from a frame that never presented is dropped.
        self.pending = None;
        self.gpu.resize(projection.width, projection.height);
        self.projection.write(&self.gpu.queue, projection);

        let Some((output, view)) = self.gpu.begin_frame() else {
            return false;
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Clear Encoder"),
            });
        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }
        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        self.pending = Some(output);
        true
    }

    pub fn present(&mut self) {
        if let Some(output) = self.pending.take() {
            output.present();
        }
    }
}
