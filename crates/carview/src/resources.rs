use anyhow::{Context, Result};

use carview_engine::device::Gpu;
use carview_engine::render::{
    DrawCall, FlatRenderer, Mesh, RenderCtx, RenderTarget, Topology, TransformUniforms,
};

use crate::geometry::{self, Float3, WHEEL_SEGMENTS};
use crate::scene::{DrawStep, Drawable};

/// Geometry for one mesh before upload.
pub struct MeshData {
    pub label: &'static str,
    pub topology: Topology,
    pub positions: Vec<Float3>,
    pub colors: Vec<Float3>,
}

/// One value per [`Drawable`].
pub struct SceneMeshes<M> {
    pub body: M,
    pub wheel: M,
}

impl<M> SceneMeshes<M> {
    /// The mesh a draw step of kind `drawable` renders.
    pub fn get(&self, drawable: Drawable) -> &M {
        match drawable {
            Drawable::Body => &self.body,
            Drawable::Wheel => &self.wheel,
        }
    }

    fn try_map<N>(self, mut f: impl FnMut(M) -> Result<N>) -> Result<SceneMeshes<N>> {
        Ok(SceneMeshes {
            body: f(self.body)?,
            wheel: f(self.wheel)?,
        })
    }
}

/// Body quad as a triangle list; both wheels share one fan.
pub fn scene_geometry() -> SceneMeshes<MeshData> {
    let (body_vertices, body_colors) = geometry::car_body();

    SceneMeshes {
        body: MeshData {
            label: "car body",
            topology: Topology::TriangleList,
            positions: body_vertices.to_vec(),
            colors: body_colors.to_vec(),
        },
        wheel: MeshData {
            label: "wheel",
            topology: Topology::TriangleFan,
            positions: geometry::circle_vertices(WHEEL_SEGMENTS),
            colors: geometry::circle_colors(WHEEL_SEGMENTS),
        },
    }
}

/// GPU resources for the scene, created once at startup.
pub struct SceneResources {
    meshes: SceneMeshes<Mesh>,
    renderer: FlatRenderer,
}

impl SceneResources {
    /// Uploads the body and wheel geometry and builds the shader program.
    pub fn init(gpu: &Gpu<'_>) -> Result<Self> {
        let device = gpu.device();

        let meshes = scene_geometry().try_map(|data| {
            Mesh::new(
                device,
                data.label,
                data.topology,
                &data.positions,
                &data.colors,
            )
            .with_context(|| format!("failed to upload {}", data.label))
        })?;

        let renderer = FlatRenderer::new(device, gpu.surface_format(), gpu.depth_format())?;

        log::info!(
            "scene ready on {}: body {} vertices, wheel {} vertices",
            gpu.adapter_info().name,
            meshes.body.vertex_count(),
            meshes.wheel.vertex_count()
        );

        Ok(Self { meshes, renderer })
    }

    /// Draws `plan` in order; returns the number of draw calls issued.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        plan: &[DrawStep],
    ) -> usize {
        let Self { meshes, renderer } = self;

        let draws: Vec<DrawCall<'_>> = plan
            .iter()
            .map(|step| DrawCall {
                mesh: meshes.get(step.drawable),
                transforms: TransformUniforms::new(step.projection, step.model_view),
            })
            .collect();

        renderer.render(ctx, target, &draws)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{plan_frame, TransformState};

    #[test]
    fn frame_draws_body_list_then_two_wheel_fans() {
        let meshes = scene_geometry();
        let draws: Vec<(Topology, usize)> = plan_frame(&TransformState::new(), 0.0)
            .iter()
            .map(|step| {
                let mesh = meshes.get(step.drawable);
                (mesh.topology, mesh.positions.len())
            })
            .collect();

        let body_len = geometry::car_body().0.len();
        let wheel_len = geometry::circle_vertices(WHEEL_SEGMENTS).len();
        assert_eq!((body_len, wheel_len), (6, 52));
        assert_eq!(
            draws,
            vec![
                (Topology::TriangleList, body_len),
                (Topology::TriangleFan, wheel_len),
                (Topology::TriangleFan, wheel_len),
            ]
        );
    }

    #[test]
    fn every_mesh_pairs_positions_with_colors() {
        let meshes = scene_geometry();
        for mesh in [&meshes.body, &meshes.wheel] {
            assert_eq!(mesh.positions.len(), mesh.colors.len(), "{}", mesh.label);
        }
        assert!(meshes.body.colors.iter().all(|&c| c == geometry::BODY_COLOR));
        assert!(meshes.wheel.colors.iter().all(|&c| c == geometry::WHEEL_COLOR));
    }
}
