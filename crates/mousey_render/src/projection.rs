use mousey_core::ScreenProjection;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ProjectionUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl ProjectionUniform {
    pub fn from_screen(projection: &ScreenProjection) -> Self {
        Self {
            view_proj: projection.matrix().to_cols_array_2d(),
        }
    }
}

/// GPU copy of the screen projection, rewritten every frame from the current
/// window size. Draw pipelines bind it at group 0, binding 0.
pub struct ProjectionBuffer {
    pub buffer: wgpu::Buffer,
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub bind_group: wgpu::BindGroup,
    current: Option<ProjectionUniform>,
}

impl ProjectionBuffer {
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Screen Projection"),
            size: std::mem::size_of::<ProjectionUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Screen Projection Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Screen Projection Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self {
            buffer,
            bind_group_layout,
            bind_group,
            current: None,
        }
    }

    /// Upload `projection` if it differs from what the buffer already holds.
    pub fn write(&mut self, queue: &wgpu::Queue, projection: &ScreenProjection) {
        let uniform = ProjectionUniform::from_screen(projection);
        if self.current == Some(uniform) {
            return;
        }
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&uniform));
        self.current = Some(uniform);
    }
}
