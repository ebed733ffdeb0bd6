use std::num::NonZeroU64;

use anyhow::{Context, Result};
use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use super::buffer::BufferKind;

/// Source of the flat-color program.
///
/// Interface: attributes `coordinates` (location 0) and `color` (location 1),
/// uniforms `uPMatrix` and `uMVMatrix` in group 0 binding 0.
pub const FLAT_SHADER_WGSL: &str = include_str!("shaders/flat.wgsl");

const VERTEX_ENTRY: &str = "vs_main";
const FRAGMENT_ENTRY: &str = "fs_main";

/// Uniform slots allocated up front; grown on demand.
const INITIAL_SLOTS: u32 = 4;

/// Matrices uploaded for one draw (128 bytes, column-major).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TransformUniforms {
    /// `uPMatrix`
    pub projection: [[f32; 4]; 4],
    /// `uMVMatrix`
    pub model_view: [[f32; 4]; 4],
}

impl TransformUniforms {
    pub fn new(projection: Mat4, model_view: Mat4) -> Self {
        Self {
            projection: projection.to_cols_array_2d(),
            model_view: model_view.to_cols_array_2d(),
        }
    }
}

/// Parses and validates WGSL on the CPU.
///
/// wgpu reports shader errors asynchronously through the device error handler;
/// validating with naga first turns a broken shader into an ordinary startup
/// error carrying the full diagnostic.
pub fn validate_wgsl(label: &str, source: &str) -> Result<()> {
    use wgpu::naga::valid::{Capabilities, ValidationFlags, Validator};

    let module = wgpu::naga::front::wgsl::parse_str(source).map_err(|e| {
        anyhow::anyhow!("{label}: WGSL parse error\n{}", e.emit_to_string(source))
    })?;

    Validator::new(ValidationFlags::all(), Capabilities::empty())
        .validate(&module)
        .map_err(|e| {
            anyhow::anyhow!("{label}: WGSL validation error\n{}", e.emit_to_string(source))
        })?;

    for entry in [VERTEX_ENTRY, FRAGMENT_ENTRY] {
        anyhow::ensure!(
            module.entry_points.iter().any(|ep| ep.name == entry),
            "{label}: missing entry point `{entry}`"
        );
    }

    Ok(())
}

/// Compiled and linked flat-color program plus its per-draw uniform storage.
///
/// Each draw in a frame gets its own uniform slot so that matrices written for
/// one draw are not overwritten by the next before the queue is submitted.
pub struct ShaderProgram {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,

    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    slot_stride: u64,
    slot_capacity: u32,
}

impl ShaderProgram {
    /// Validates the shader, then creates the module, layouts, pipeline and
    /// uniform storage.
    pub fn build(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
    ) -> Result<Self> {
        validate_wgsl("flat shader", FLAT_SHADER_WGSL)
            .context("flat-color shader failed to compile")?;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("carview flat shader"),
            source: wgpu::ShaderSource::Wgsl(FLAT_SHADER_WGSL.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("carview flat bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: Some(uniforms_binding_size()),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("carview flat pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("carview flat pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some(VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &[
                    vertex_layout(BufferKind::Positions),
                    vertex_layout(BufferKind::Colors),
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(FRAGMENT_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let slot_stride = slot_stride(device.limits().min_uniform_buffer_offset_alignment);
        let (uniform_buffer, bind_group) =
            create_uniform_storage(device, &bind_group_layout, slot_stride, INITIAL_SLOTS);

        log::debug!(
            "flat program ready (surface {surface_format:?}, depth {depth_format:?}, slot stride {slot_stride})"
        );

        Ok(Self {
            pipeline,
            bind_group_layout,
            uniform_buffer,
            bind_group,
            slot_stride,
            slot_capacity: INITIAL_SLOTS,
        })
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    pub(crate) fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    /// Makes room for `slots` draws in one frame.
    pub(crate) fn ensure_slots(&mut self, device: &wgpu::Device, slots: u32) {
        if slots <= self.slot_capacity {
            return;
        }
        let capacity = slots.next_power_of_two();
        let (buffer, bind_group) =
            create_uniform_storage(device, &self.bind_group_layout, self.slot_stride, capacity);
        self.uniform_buffer = buffer;
        self.bind_group = bind_group;
        self.slot_capacity = capacity;
        log::debug!("flat program uniform slots grown to {capacity}");
    }

    /// Writes the matrices for draw `slot`; returns the dynamic offset to bind with.
    ///
    /// `None` when the offset does not fit a dynamic offset.
    pub(crate) fn write_slot(
        &self,
        queue: &wgpu::Queue,
        slot: u32,
        uniforms: &TransformUniforms,
    ) -> Option<u32> {
        debug_assert!(slot < self.slot_capacity);
        let offset = slot_offset(slot, self.slot_stride)?;
        queue.write_buffer(&self.uniform_buffer, u64::from(offset), bytemuck::bytes_of(uniforms));
        Some(offset)
    }
}

/// One tightly packed `Float32x3` attribute per buffer.
fn vertex_layout(kind: BufferKind) -> wgpu::VertexBufferLayout<'static> {
    const COORDINATES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
    const COLOR: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];

    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 3]>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: match kind {
            BufferKind::Positions => &COORDINATES,
            BufferKind::Colors => &COLOR,
        },
    }
}

fn uniforms_binding_size() -> NonZeroU64 {
    NonZeroU64::new(std::mem::size_of::<TransformUniforms>() as u64)
        .unwrap_or(NonZeroU64::MIN)
}

fn slot_stride(min_alignment: u32) -> u64 {
    wgpu::util::align_to(
        std::mem::size_of::<TransformUniforms>() as u64,
        u64::from(min_alignment.max(1)),
    )
}

fn slot_offset(slot: u32, stride: u64) -> Option<u32> {
    u64::from(slot)
        .checked_mul(stride)
        .and_then(|offset| u32::try_from(offset).ok())
}

fn create_uniform_storage(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    stride: u64,
    slots: u32,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("carview flat uniforms"),
        size: stride * u64::from(slots),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("carview flat bind group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: Some(uniforms_binding_size()),
            }),
        }],
    });

    (buffer, bind_group)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── shader validation ─────────────────────────────────────────────────

    #[test]
    fn shipped_shader_validates() {
        validate_wgsl("flat shader", FLAT_SHADER_WGSL).unwrap();
    }

    #[test]
    fn syntax_error_is_reported_with_label() {
        let err = validate_wgsl("broken", "fn vs_main( -> {").unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("broken: WGSL parse error"), "{msg}");
    }

    #[test]
    fn type_error_is_reported() {
        let src = FLAT_SHADER_WGSL.replace("vec4<f32>(input.v_color, 1.0)", "input.v_color");
        let err = validate_wgsl("mistyped", &src).unwrap_err();
        assert!(err.to_string().starts_with("mistyped: WGSL"), "{err}");
    }

    #[test]
    fn missing_entry_point_is_reported() {
        let src = FLAT_SHADER_WGSL.replace("fn fs_main", "fn fs_other");
        let err = validate_wgsl("renamed", &src).unwrap_err();
        assert!(err.to_string().contains("missing entry point `fs_main`"));
    }

    // ── layouts ───────────────────────────────────────────────────────────

    #[test]
    fn attributes_are_tightly_packed_float3() {
        for (kind, location) in [(BufferKind::Positions, 0), (BufferKind::Colors, 1)] {
            let layout = vertex_layout(kind);
            assert_eq!(layout.array_stride, 12);
            assert_eq!(layout.attributes.len(), 1);
            assert_eq!(layout.attributes[0].shader_location, location);
            assert_eq!(layout.attributes[0].offset, 0);
            assert_eq!(layout.attributes[0].format, wgpu::VertexFormat::Float32x3);
        }
    }

    #[test]
    fn uniform_slots_respect_offset_alignment() {
        assert_eq!(std::mem::size_of::<TransformUniforms>(), 128);
        assert_eq!(slot_stride(256), 256);
        assert_eq!(slot_stride(64), 128);
        assert_eq!(slot_stride(0), 128);
    }

    #[test]
    fn slot_offsets_step_by_stride_and_reject_overflow() {
        assert_eq!(slot_offset(0, 256), Some(0));
        assert_eq!(slot_offset(2, 256), Some(512));
        assert_eq!(slot_offset(u32::MAX, 256), None);
    }

    #[test]
    fn uniforms_are_column_major() {
        let t = Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0));
        let u = TransformUniforms::new(Mat4::IDENTITY, t);
        assert_eq!(u.projection, Mat4::IDENTITY.to_cols_array_2d());
        assert_eq!(u.model_view[3], [1.0, 2.0, 3.0, 1.0]);
    }
}
