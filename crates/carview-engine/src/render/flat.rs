use anyhow::Result;

use crate::render::{RenderCtx, RenderTarget};

use super::mesh::{Mesh, Topology};
use super::program::{ShaderProgram, TransformUniforms};

/// One draw: a mesh and the matrices it is drawn with.
#[derive(Copy, Clone)]
pub struct DrawCall<'m> {
    pub mesh: &'m Mesh,
    pub transforms: TransformUniforms,
}

/// Draws meshes with the flat-color program.
///
/// Every draw rebinds its position and color buffers and its own uniform
/// slot; nothing is cached between draws or frames.
pub struct FlatRenderer {
    program: ShaderProgram,
}

impl FlatRenderer {
    /// Builds the shader program. Fails if the shader does not validate.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
    ) -> Result<Self> {
        Ok(Self {
            program: ShaderProgram::build(device, surface_format, depth_format)?,
        })
    }

    /// Records `draws` in order into one pass over an already cleared target.
    ///
    /// Returns the number of draw calls issued.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draws: &[DrawCall<'_>],
    ) -> usize {
        if draws.is_empty() {
            return 0;
        }

        let Ok(slots) = u32::try_from(draws.len()) else {
            log::warn!("skipping frame with {} draws", draws.len());
            return 0;
        };
        self.program.ensure_slots(ctx.device, slots);

        let Some(offsets) = draws
            .iter()
            .zip(0..slots)
            .map(|(draw, slot)| self.program.write_slot(ctx.queue, slot, &draw.transforms))
            .collect::<Option<Vec<u32>>>()
        else {
            log::warn!("skipping frame: uniform offsets for {} draws overflow", draws.len());
            return 0;
        };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("carview flat pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: target.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(self.program.pipeline());

        for (draw, offset) in draws.iter().zip(offsets) {
            let mesh = draw.mesh;

            rpass.set_vertex_buffer(0, mesh.positions().buffer().slice(..));
            rpass.set_vertex_buffer(1, mesh.colors().buffer().slice(..));
            rpass.set_bind_group(0, self.program.bind_group(), &[offset]);

            match (mesh.topology(), mesh.indices()) {
                (Topology::TriangleFan, Some((indices, count))) => {
                    rpass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                    rpass.draw_indexed(0..count, 0, 0..1);
                }
                _ => rpass.draw(0..mesh.vertex_count(), 0..1),
            }

            log::trace!(
                "draw {} ({:?}, {} vertices)",
                mesh.label(),
                mesh.topology(),
                mesh.vertex_count()
            );
        }

        draws.len()
    }
}
