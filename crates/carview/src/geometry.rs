//! Vertex and color data for the car body and its wheels.
//!
//! Everything here is plain CPU data in scene units; uploading happens in
//! [`crate::resources`].

use std::f64::consts::PI;

/// `(x, y, z)` or `(r, g, b)`.
pub type Float3 = [f32; 3];

/// Segments used for each wheel fan.
pub const WHEEL_SEGMENTS: u32 = 50;

/// Wheel radius in scene units.
pub const WHEEL_RADIUS: f32 = 0.1;

pub const BODY_COLOR: Float3 = [0.8, 0.0, 0.0];
pub const WHEEL_COLOR: Float3 = [0.5, 0.5, 0.5];

/// Two triangles covering `[-0.6, 0.6] x [-0.1, 0.1]` at z = 0.
const BODY_VERTICES: [Float3; 6] = [
    [-0.6, -0.1, 0.0],
    [0.6, -0.1, 0.0],
    [-0.6, 0.1, 0.0],
    [0.6, -0.1, 0.0],
    [0.6, 0.1, 0.0],
    [-0.6, 0.1, 0.0],
];

const BODY_COLORS: [Float3; 6] = [BODY_COLOR; 6];

/// Car body as a triangle list, with its flat red colors.
pub fn car_body() -> (&'static [Float3], &'static [Float3]) {
    (&BODY_VERTICES, &BODY_COLORS)
}

/// Triangle fan approximating a wheel centered on the origin.
///
/// The center comes first, then `segments + 1` rim points; the last rim point
/// repeats the first so the fan closes. `segments` must be at least 1.
pub fn circle_vertices(segments: u32) -> Vec<Float3> {
    debug_assert!(segments >= 1, "a circle needs at least one segment");

    let radius = f64::from(WHEEL_RADIUS);
    let n = f64::from(segments);

    std::iter::once([0.0, 0.0, 0.0])
        .chain((0..=segments).map(|i| {
            let angle = 2.0 * f64::from(i) * PI / n;
            [
                (radius * angle.cos()) as f32,
                (radius * angle.sin()) as f32,
                0.0,
            ]
        }))
        .collect()
}

/// One gray color per vertex of [`circle_vertices`]`(segments)`.
pub fn circle_colors(segments: u32) -> Vec<Float3> {
    vec![WHEEL_COLOR; segments as usize + 2]
}
