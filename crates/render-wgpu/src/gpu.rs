use crate::shaders;
use crate::uniforms::{self, Globals, ObjectUniforms, Vertex};
use camscene_capture::VideoTexture;
use camscene_common::ObjectId;
use camscene_render::{RenderFrame, Renderer};
use camscene_scene::Geometry;
use std::collections::BTreeMap;
use wgpu::util::DeviceExt;

/// GPU buffers of one scene mesh.
struct GpuMesh {
    geometry: Geometry,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// A 2D texture plus the bind group sampling it.
struct GpuTexture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    size: (u32, u32),
}

/// Offscreen colour target the scene is drawn into before it is stretched
/// over the surface.
struct SceneTarget {
    view: wgpu::TextureView,
    bind_group: wgpu::BindGroup,
}

/// What one GPU frame did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub meshes: usize,
    pub lights: usize,
    pub video_uploaded: bool,
}

/// Forward renderer for the scene graph.
///
/// Mesh buffers are built on first sight of an object and dropped when the
/// object leaves the scene. The video image is re-uploaded only when its
/// version moved past the last uploaded one.
///
/// The scene is drawn at the drawing-buffer size, which may be smaller than
/// the surface, and then stretched over the whole surface.
pub struct WgpuRenderer {
    pipeline: wgpu::RenderPipeline,
    blit_pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    white: GpuTexture,
    video: Option<GpuTexture>,
    uploaded_version: Option<u64>,
    meshes: BTreeMap<ObjectId, GpuMesh>,
    scene_target: SceneTarget,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
    warned_lights: bool,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals_buffer"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let globals_layout = uniform_layout(device, "globals_bind_group_layout");
        let object_layout = uniform_layout(device, "object_bind_group_layout");
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bind_group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("map_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh_pipeline_layout"),
            bind_group_layouts: &[&globals_layout, &object_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mesh_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::MESH_SHADER.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mesh_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x3,
                        2 => Float32x2,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                // Planes are seen from both sides and the mirrored screen
                // flips winding.
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let blit_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("blit_pipeline_layout"),
            bind_group_layouts: &[&texture_layout],
            push_constant_ranges: &[],
        });
        let blit_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("blit_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::BLIT_SHADER.into()),
        });
        let blit_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("blit_pipeline"),
            layout: Some(&blit_layout),
            vertex: wgpu::VertexState {
                module: &blit_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &blit_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: Default::default(),
            depth_stencil: None,
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let white = create_texture(device, &texture_layout, &sampler, "white_texture", (1, 1));
        write_texture(queue, &white, &[255, 255, 255, 255]);

        let depth_texture = Self::create_depth_texture(device, width, height);
        let scene_target = create_scene_target(
            device,
            &texture_layout,
            &sampler,
            surface_format,
            width,
            height,
        );

        Self {
            pipeline,
            blit_pipeline,
            globals_buffer,
            globals_bind_group,
            object_layout,
            texture_layout,
            sampler,
            white,
            video: None,
            uploaded_version: None,
            meshes: BTreeMap::new(),
            scene_target,
            depth_texture,
            surface_format,
            warned_lights: false,
        }
    }

    /// Resize the scene target. `width` and `height` are the drawing-buffer
    /// size, not the surface size.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
        self.scene_target = create_scene_target(
            device,
            &self.texture_layout,
            &self.sampler,
            self.surface_format,
            width,
            height,
        );
    }

    /// Borrow a frame target implementing [`Renderer`].
    pub fn target<'a>(
        &'a mut self,
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        view: &'a wgpu::TextureView,
    ) -> WgpuTarget<'a> {
        WgpuTarget {
            renderer: self,
            device,
            queue,
            view,
        }
    }

    fn sync_video(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, video: &VideoTexture) -> bool {
        if !video.needs_upload(self.uploaded_version) {
            return false;
        }
        let size = video.size();
        let limit = device.limits().max_texture_dimension_2d;
        if !fits_texture_limit(size, limit) {
            tracing::warn!(
                width = size.0,
                height = size.1,
                limit,
                "video image exceeds the texture limit, not uploaded"
            );
            self.video = None;
            self.uploaded_version = Some(video.version());
            return false;
        }
        if self.video.as_ref().is_none_or(|t| t.size != size) {
            tracing::debug!(width = size.0, height = size.1, "allocating video texture");
            self.video = Some(create_texture(
                device,
                &self.texture_layout,
                &self.sampler,
                "video_texture",
                size,
            ));
        }
        if let Some(texture) = &self.video {
            write_texture(queue, texture, &video.frame().pixels);
        }
        self.uploaded_version = Some(video.version());
        true
    }

    fn sync_meshes(&mut self, device: &wgpu::Device, frame: &RenderFrame<'_>) {
        self.meshes.retain(|id, _| frame.scene.mesh(*id).is_some());
        for (id, _, mesh) in frame.scene.meshes() {
            if self.meshes.get(&id).is_some_and(|m| m.geometry == mesh.geometry) {
                continue;
            }
            let data = mesh.geometry.tessellate();
            let vertices: Vec<Vertex> = data.vertices.iter().map(Vertex::from).collect();
            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_vertex_buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_index_buffer"),
                contents: bytemuck::cast_slice(&data.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("object_uniform_buffer"),
                size: std::mem::size_of::<ObjectUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("object_bind_group"),
                layout: &self.object_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });
            tracing::debug!(
                object = %id.short(),
                geometry = mesh.geometry.name(),
                triangles = data.triangle_count(),
                "uploaded mesh"
            );
            self.meshes.insert(
                id,
                GpuMesh {
                    geometry: mesh.geometry,
                    vertex_buffer,
                    index_buffer,
                    index_count: data.indices.len() as u32,
                    uniform_buffer,
                    bind_group,
                },
            );
        }
    }

    fn draw(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        frame: &RenderFrame<'_>,
    ) -> FrameStats {
        let video_uploaded = match frame.video {
            Some(video) => self.sync_video(device, queue, video),
            None => false,
        };
        self.sync_meshes(device, frame);

        let (lights, dropped) = uniforms::pack_lights(frame.scene);
        if dropped > 0 && !self.warned_lights {
            tracing::warn!(dropped, max = uniforms::MAX_LIGHTS, "too many lights, extras ignored");
            self.warned_lights = true;
        }
        let globals = uniforms::globals(frame.camera, &lights);
        queue.write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let video_ready = frame.video.is_some() && self.video.is_some();
        let mut draws = Vec::new();
        for (id, node, mesh) in frame.scene.meshes() {
            let Some(gpu) = self.meshes.get(&id) else {
                continue;
            };
            let material = frame.scene.material(mesh.material).copied().unwrap_or_default();
            let textured = material.map().is_some() && video_ready;
            let block = uniforms::object_uniforms(&node.transform, &material, textured);
            queue.write_buffer(&gpu.uniform_buffer, 0, bytemuck::bytes_of(&block));
            draws.push((id, textured));
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("scene_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.scene_target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.globals_bind_group, &[]);
            for (id, textured) in &draws {
                let Some(gpu) = self.meshes.get(id) else {
                    continue;
                };
                let texture = match (&self.video, textured) {
                    (Some(video), true) => video,
                    _ => &self.white,
                };
                pass.set_bind_group(1, &gpu.bind_group, &[]);
                pass.set_bind_group(2, &texture.bind_group, &[]);
                pass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
                pass.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..gpu.index_count, 0, 0..1);
            }
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("blit_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });
            pass.set_pipeline(&self.blit_pipeline);
            pass.set_bind_group(0, &self.scene_target.bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        queue.submit(std::iter::once(encoder.finish()));

        FrameStats {
            meshes: draws.len(),
            lights: lights.len(),
            video_uploaded,
        }
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

/// A renderer bound to one surface texture for one frame. The surface may be
/// larger than the scene target.
pub struct WgpuTarget<'a> {
    renderer: &'a mut WgpuRenderer,
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    view: &'a wgpu::TextureView,
}

impl Renderer for WgpuTarget<'_> {
    type Output = FrameStats;

    fn render(&mut self, frame: &RenderFrame<'_>) -> FrameStats {
        self.renderer.draw(self.device, self.queue, self.view, frame)
    }
}

fn uniform_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

fn create_texture(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    label: &str,
    size: (u32, u32),
) -> GpuTexture {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: size.0.max(1),
            height: size.1.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    let view = texture.create_view(&Default::default());
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });
    GpuTexture {
        texture,
        bind_group,
        size,
    }
}

fn create_scene_target(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
) -> SceneTarget {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("scene_target"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let view = texture.create_view(&Default::default());
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("scene_target_bind_group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });
    SceneTarget { view, bind_group }
}

fn fits_texture_limit(size: (u32, u32), limit: u32) -> bool {
    size.0 <= limit && size.1 <= limit
}

fn write_texture(queue: &wgpu::Queue, target: &GpuTexture, pixels: &[u8]) {
    let (width, height) = (target.size.0.max(1), target.size.1.max(1));
    let expected = camscene_capture::rgba_len(width, height);
    if pixels.len() < expected {
        tracing::warn!(got = pixels.len(), expected, "short texture upload skipped");
        return;
    }
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &target.texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &pixels[..expected],
        wgpu::TexelCopyBufferLayout {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_limit_checks_both_sides() {
        assert!(fits_texture_limit((8192, 8192), 8192));
        assert!(fits_texture_limit((640, 480), 8192));
        assert!(!fits_texture_limit((8193, 10), 8192));
        assert!(!fits_texture_limit((10, 70_000), 8192));
    }
}
