use std::sync::Arc;

use eframe::egui;
use eframe::egui_wgpu;
use eframe::wgpu;
use eframe::wgpu::util::DeviceExt;

use super::vertex::StripVertex;
use super::view::ViewUniform;

/// GPU resources for drawing trace strips, stored in the egui_wgpu
/// callback resources for the lifetime of the renderer.
pub struct LineStripRenderer {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    vertex_buffer: Option<wgpu::Buffer>,
    vertex_count: u32,
    /// Geometry generation currently held by `vertex_buffer`.
    generation: Option<u64>,
}

impl LineStripRenderer {
    pub fn new(device: &wgpu::Device, target_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("seed-view line strip shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/line_strip.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("seed-view line strip bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<ViewUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("seed-view line strip pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("seed-view line strip pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[StripVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineStrip,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("seed-view view ubo"),
            contents: bytemuck::bytes_of(&ViewUniform {
                pan: [0.0, 0.0],
                scale: [1.0, 1.0],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("seed-view line strip bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Self {
            pipeline,
            bind_group,
            uniform_buffer,
            vertex_buffer: None,
            vertex_count: 0,
            generation: None,
        }
    }

    /// Register the renderer with eframe's wgpu render state.
    pub fn install(render_state: &egui_wgpu::RenderState) {
        let renderer = Self::new(&render_state.device, render_state.target_format);
        render_state
            .renderer
            .write()
            .callback_resources
            .insert(renderer);
        log::debug!("Line strip renderer installed ({:?})", render_state.target_format);
    }

    fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, cb: &LineStripCallback) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&cb.view));

        if self.generation == Some(cb.generation) {
            return;
        }
        self.generation = Some(cb.generation);

        if cb.vertices.is_empty() {
            self.vertex_buffer = None;
            self.vertex_count = 0;
            return;
        }

        self.vertex_buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("seed-view strip vbo"),
            contents: bytemuck::cast_slice(cb.vertices.as_slice()),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.vertex_count = cb.vertices.len() as u32;
        log::debug!(
            "Uploaded {} strip vertices (generation {})",
            self.vertex_count,
            cb.generation
        );
    }

    fn paint(&self, render_pass: &mut wgpu::RenderPass<'static>) {
        let Some(vertex_buffer) = self.vertex_buffer.as_ref() else { return };
        if self.vertex_count < 2 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
        render_pass.draw(0..self.vertex_count, 0..1);
    }
}

/// Per-frame draw request: current transform plus the strip geometry.
///
/// The vertex data is only uploaded when `generation` differs from what
/// the renderer already holds.
pub struct LineStripCallback {
    pub view: ViewUniform,
    pub vertices: Arc<Vec<StripVertex>>,
    pub generation: u64,
}

impl egui_wgpu::CallbackTrait for LineStripCallback {
    fn prepare(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        _screen_descriptor: &egui_wgpu::ScreenDescriptor,
        _egui_encoder: &mut wgpu::CommandEncoder,
        callback_resources: &mut egui_wgpu::CallbackResources,
    ) -> Vec<wgpu::CommandBuffer> {
        if let Some(renderer) = callback_resources.get_mut::<LineStripRenderer>() {
            renderer.prepare(device, queue, self);
        }
        Vec::new()
    }

    fn paint(
        &self,
        _info: egui::PaintCallbackInfo,
        render_pass: &mut wgpu::RenderPass<'static>,
        callback_resources: &egui_wgpu::CallbackResources,
    ) {
        if let Some(renderer) = callback_resources.get::<LineStripRenderer>() {
            renderer.paint(render_pass);
        }
    }
}
