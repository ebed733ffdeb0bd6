//! Transform state and the per-frame draw plan.
//!
//! The plan is a pure function of the transform state and the car position:
//! every draw's model-view matrix is derived from the previous draw's matrix
//! and a fixed relative offset, so the compounding order is spelled out in one
//! place instead of living in a shared mutable matrix.

use glam::{Mat4, Vec3};

/// Orthographic view volume: `(left, right, bottom, top, near, far)`.
pub const ORTHO_VOLUME: (f32, f32, f32, f32, f32, f32) = (-1.0, 1.0, -1.0, 1.0, 0.1, 100.0);

pub const EYE: Vec3 = Vec3::new(0.0, 0.0, 1.0);
pub const CENTER: Vec3 = Vec3::ZERO;
pub const UP: Vec3 = Vec3::Y;

/// Left wheel, relative to the body's transform.
pub const LEFT_WHEEL_OFFSET: Vec3 = Vec3::new(-0.5, -0.1, 0.0);

/// Right wheel, relative to the left wheel's transform.
pub const RIGHT_WHEEL_OFFSET: Vec3 = Vec3::new(1.0, 0.0, 0.0);

pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.9,
    g: 0.9,
    b: 0.9,
    a: 1.0,
};

/// Projection and camera matrices, rebuilt from constants.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TransformState {
    pub projection: Mat4,
    pub view: Mat4,
}

impl TransformState {
    /// Builds both matrices from the scene constants.
    ///
    /// The projection targets wgpu's `[0, 1]` depth range; x/y mapping matches a
    /// GL-style orthographic projection of the same volume.
    pub fn new() -> Self {
        let (left, right, bottom, top, near, far) = ORTHO_VOLUME;
        Self {
            projection: Mat4::orthographic_rh(left, right, bottom, top, near, far),
            view: Mat4::look_at_rh(EYE, CENTER, UP),
        }
    }

    /// Discards the current matrices and rebuilds them.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for TransformState {
    fn default() -> Self {
        Self::new()
    }
}

/// What a draw step renders.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Drawable {
    Body,
    Wheel,
}

/// One planned draw.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawStep {
    pub drawable: Drawable,
    pub projection: Mat4,
    pub model_view: Mat4,
}

/// `base` followed by a translation by `offset`, in `base`'s local frame.
pub fn translated(base: Mat4, offset: Vec3) -> Mat4 {
    base * Mat4::from_translation(offset)
}

/// Plans one frame: body, left wheel, right wheel, in that order.
///
/// - body: view translated by `(car_position, 0, 0)`
/// - left wheel: body translated by [`LEFT_WHEEL_OFFSET`]
/// - right wheel: left wheel translated by [`RIGHT_WHEEL_OFFSET`]
pub fn plan_frame(state: &TransformState, car_position: f32) -> [DrawStep; 3] {
    let body = translated(state.view, Vec3::new(car_position, 0.0, 0.0));
    let left_wheel = translated(body, LEFT_WHEEL_OFFSET);
    let right_wheel = translated(left_wheel, RIGHT_WHEEL_OFFSET);

    let step = |drawable, model_view| DrawStep {
        drawable,
        projection: state.projection,
        model_view,
    };

    [
        step(Drawable::Body, body),
        step(Drawable::Wheel, left_wheel),
        step(Drawable::Wheel, right_wheel),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    const EPS: f32 = 1e-6;

    fn origin_of(m: Mat4) -> Vec3 {
        m.w_axis.truncate()
    }

    // ── transform state ───────────────────────────────────────────────────

    #[test]
    fn view_looks_down_negative_z_from_one_unit_away() {
        let state = TransformState::new();
        let expected = Mat4::from_translation(Vec3::new(0.0, 0.0, -1.0));
        assert!(state.view.abs_diff_eq(expected, EPS));
    }

    #[test]
    fn projection_maps_unit_square_to_ndc() {
        let state = TransformState::new();
        let clip = state.projection * Vec4::new(1.0, -1.0, -1.0, 1.0);
        assert!((clip.x - 1.0).abs() < EPS);
        assert!((clip.y + 1.0).abs() < EPS);
        // z = -1 in view space sits just past the near plane, inside [0, 1].
        assert!(clip.z > 0.0 && clip.z < 0.01, "depth {}", clip.z);
        assert_eq!(clip.w, 1.0);
    }

    #[test]
    fn reset_rebuilds_from_constants() {
        let mut state = TransformState::new();
        state.view = Mat4::from_scale(Vec3::splat(3.0));
        state.reset();
        assert_eq!(state, TransformState::new());
    }

    // ── frame plan ────────────────────────────────────────────────────────

    #[test]
    fn plan_is_body_then_two_wheels() {
        let plan = plan_frame(&TransformState::new(), 0.0);
        let order: Vec<Drawable> = plan.iter().map(|s| s.drawable).collect();
        assert_eq!(order, vec![Drawable::Body, Drawable::Wheel, Drawable::Wheel]);
    }

    #[test]
    fn body_is_view_translated_by_car_position() {
        let state = TransformState::new();
        let p = 0.37;
        let plan = plan_frame(&state, p);

        let expected = state.view * Mat4::from_translation(Vec3::new(p, 0.0, 0.0));
        assert!(plan[0].model_view.abs_diff_eq(expected, EPS));
    }

    #[test]
    fn wheels_compound_on_the_previous_draw() {
        let state = TransformState::new();
        let plan = plan_frame(&state, -0.2);

        let left = plan[0].model_view * Mat4::from_translation(Vec3::new(-0.5, -0.1, 0.0));
        let right = left * Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));

        assert!(plan[1].model_view.abs_diff_eq(left, EPS));
        assert!(plan[2].model_view.abs_diff_eq(right, EPS));
    }

    #[test]
    fn net_wheel_positions_relative_to_car() {
        let p = 0.05;
        let plan = plan_frame(&TransformState::new(), p);

        // The view contributes the -1 on z.
        assert!(origin_of(plan[0].model_view).abs_diff_eq(Vec3::new(p, 0.0, -1.0), EPS));
        assert!(origin_of(plan[1].model_view).abs_diff_eq(Vec3::new(p - 0.5, -0.1, -1.0), EPS));
        assert!(origin_of(plan[2].model_view).abs_diff_eq(Vec3::new(p + 0.5, -0.1, -1.0), EPS));
    }

    #[test]
    fn every_step_shares_the_projection() {
        let state = TransformState::new();
        assert!(plan_frame(&state, 1.0).iter().all(|s| s.projection == state.projection));
    }

    #[test]
    fn translated_applies_offset_in_local_frame() {
        let scaled = Mat4::from_scale(Vec3::splat(2.0));
        let m = translated(scaled, Vec3::new(1.0, 0.0, 0.0));
        assert!(origin_of(m).abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), EPS));
    }
}
