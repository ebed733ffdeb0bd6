use anyhow::{Context, Result};
use wgpu::util::DeviceExt;

/// What a vertex buffer feeds in the flat-color program.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferKind {
    /// `coordinates` attribute: `(x, y, z)` per vertex.
    Positions,
    /// `color` attribute: `(r, g, b)` per vertex.
    Colors,
}

/// Immutable GPU vertex buffer holding tightly packed `[f32; 3]` triples.
///
/// Created once at startup; never written again.
pub struct GpuBuffer {
    buffer: wgpu::Buffer,
    len: u32,
}

impl GpuBuffer {
    /// Number of `[f32; 3]` elements.
    pub(crate) fn len(&self) -> u32 {
        self.len
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}

/// Uploads vertex positions into a new GPU buffer.
pub fn upload_vertices(device: &wgpu::Device, label: &str, data: &[[f32; 3]]) -> Result<GpuBuffer> {
    upload(device, label, BufferKind::Positions, data)
}

/// Uploads per-vertex colors into a new GPU buffer.
pub fn upload_colors(device: &wgpu::Device, label: &str, data: &[[f32; 3]]) -> Result<GpuBuffer> {
    upload(device, label, BufferKind::Colors, data)
}

fn upload(
    device: &wgpu::Device,
    label: &str,
    kind: BufferKind,
    data: &[[f32; 3]],
) -> Result<GpuBuffer> {
    anyhow::ensure!(!data.is_empty(), "{label}: refusing to upload an empty {kind:?} buffer");
    let len = u32::try_from(data.len())
        .with_context(|| format!("{label}: {} elements do not fit a draw call", data.len()))?;

    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(data),
        usage: wgpu::BufferUsages::VERTEX,
    });

    log::debug!("uploaded {label}: {len} x {kind:?} ({} bytes)", buffer.size());

    Ok(GpuBuffer { buffer, len })
}
