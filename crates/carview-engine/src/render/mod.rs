//! GPU rendering subsystem.
//!
//! A single flat-color path: positions and per-vertex colors live in separate
//! vertex buffers, a projection and a model-view matrix are supplied per draw,
//! and fragments take the interpolated vertex color at full opacity.
//!
//! Convention:
//! - geometry is authored directly in the coordinate space the caller's
//!   projection expects (no implicit viewport mapping)
//! - matrices are column-major, as produced by `glam`

mod buffer;
mod ctx;
mod flat;
mod mesh;
mod program;

pub use buffer::{upload_colors, upload_vertices, BufferKind, GpuBuffer};
pub use ctx::{RenderCtx, RenderTarget};
pub use flat::{DrawCall, FlatRenderer};
pub use mesh::{fan_indices, Mesh, Topology};
pub use program::{validate_wgsl, ShaderProgram, TransformUniforms, FLAT_SHADER_WGSL};
