use anyhow::{Context, Result};
use wgpu::util::DeviceExt;

use super::buffer::{upload_colors, upload_vertices, GpuBuffer};

/// How a mesh's vertices are assembled into triangles.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Topology {
    /// Every three vertices form one triangle.
    TriangleList,
    /// Vertex 0 is shared; each adjacent pair after it closes one triangle.
    TriangleFan,
}

/// A drawable: positions + colors (same length, same order) and a topology.
///
/// wgpu has no fan topology, so fans carry an index buffer expanding them
/// into a triangle list. The vertex data itself is uploaded unchanged.
pub struct Mesh {
    label: String,
    topology: Topology,
    positions: GpuBuffer,
    colors: GpuBuffer,
    indices: Option<wgpu::Buffer>,
    index_count: u32,
}

impl Mesh {
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        topology: Topology,
        positions: &[[f32; 3]],
        colors: &[[f32; 3]],
    ) -> Result<Self> {
        check_attribute_lengths(label, positions.len(), colors.len())?;

        let positions_buf = upload_vertices(device, &format!("{label} positions"), positions)?;
        let colors_buf = upload_colors(device, &format!("{label} colors"), colors)?;

        let (indices, index_count) = match topology {
            Topology::TriangleList => {
                anyhow::ensure!(
                    positions.len() % 3 == 0,
                    "{label}: triangle list needs a multiple of 3 vertices, got {}",
                    positions.len()
                );
                (None, 0)
            }
            Topology::TriangleFan => {
                anyhow::ensure!(
                    positions.len() >= 3,
                    "{label}: triangle fan needs at least 3 vertices, got {}",
                    positions.len()
                );
                let indices = fan_indices(positions_buf.len());
                let index_count = u32::try_from(indices.len())
                    .with_context(|| format!("{label}: fan index count overflows u32"))?;
                let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{label} fan indices")),
                    contents: bytemuck::cast_slice(&indices),
                    usage: wgpu::BufferUsages::INDEX,
                });
                (Some(buffer), index_count)
            }
        };

        Ok(Self {
            label: label.to_string(),
            topology,
            positions: positions_buf,
            colors: colors_buf,
            indices,
            index_count,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Number of vertices submitted per draw.
    pub fn vertex_count(&self) -> u32 {
        self.positions.len()
    }

    pub fn positions(&self) -> &GpuBuffer {
        &self.positions
    }

    pub fn colors(&self) -> &GpuBuffer {
        &self.colors
    }

    /// Fan expansion indices; `None` for triangle lists.
    pub(crate) fn indices(&self) -> Option<(&wgpu::Buffer, u32)> {
        self.indices.as_ref().map(|b| (b, self.index_count))
    }
}

/// Expands a triangle fan of `vertex_count` vertices into list indices.
///
/// Triangle `i` is `(0, i, i + 1)` for `i` in `1..vertex_count - 1`.
/// Fewer than 3 vertices produce no triangles.
pub fn fan_indices(vertex_count: u32) -> Vec<u32> {
    (1..vertex_count.saturating_sub(1))
        .flat_map(|i| [0, i, i + 1])
        .collect()
}

fn check_attribute_lengths(label: &str, positions: usize, colors: usize) -> Result<()> {
    anyhow::ensure!(
        positions == colors,
        "{label}: {positions} positions but {colors} colors; every vertex needs exactly one color"
    );
    Ok(())
}
