//! Model, view and projection matrices.
//!
//! [`Transforms`] keeps the three stages as independent values and derives
//! the composite and normal matrices from them once per frame. [`Spin`] is
//! the per-frame rotation applied to the model matrix.

use glam::{Mat4, Vec3};

/// One of the three principal axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Returns the elementary rotation of `radians` about this axis.
    pub fn rotation(self, radians: f32) -> Mat4 {
        match self {
            Axis::X => Mat4::from_rotation_x(radians),
            Axis::Y => Mat4::from_rotation_y(radians),
            Axis::Z => Mat4::from_rotation_z(radians),
        }
    }
}

/// Parameters of a perspective projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perspective {
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Perspective {
    /// The projection used by most lessons: 75 degrees, near 1e-4, far 1e4.
    pub const STANDARD: Perspective = Perspective {
        fov_y: 75.0,
        near: 1e-4,
        far: 1e4,
    };

    pub fn new(fov_y: f32, near: f32, far: f32) -> Self {
        Self { fov_y, near, far }
    }

    /// Builds the OpenGL clip-space projection (depth mapped to -1..1).
    pub fn matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y.to_radians(), aspect, self.near, self.far)
    }
}

/// An ordered list of rotations applied to a model matrix every frame.
///
/// The steps are post-multiplied in order, so a spin of `Z, X` turns the
/// model by `model * Rz * Rx` each frame. Angles accumulate in the model
/// matrix itself, there is no absolute angle to recompute from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spin {
    steps: Vec<(Axis, f32)>,
}

impl Spin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rotation of `radians` about `axis`.
    pub fn then(mut self, axis: Axis, radians: f32) -> Self {
        self.steps.push((axis, radians));
        self
    }

    pub fn steps(&self) -> &[(Axis, f32)] {
        &self.steps
    }

    pub fn is_still(&self) -> bool {
        self.steps.is_empty()
    }

    /// Rotates `model` by one frame's worth of steps.
    pub fn apply(&self, model: &mut Mat4) {
        for &(axis, radians) in &self.steps {
            *model *= axis.rotation(radians);
        }
    }

    /// Returns the rotation of a single frame as one matrix.
    pub fn frame_rotation(&self) -> Mat4 {
        self.steps
            .iter()
            .fold(Mat4::IDENTITY, |acc, &(axis, radians)| acc * axis.rotation(radians))
    }
}

/// The per-scene transform state.
#[derive(Debug, Clone, PartialEq)]
pub struct Transforms {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    model_view: Mat4,
    mvp: Mat4,
    normal: Mat4,
}

impl Default for Transforms {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            model_view: Mat4::IDENTITY,
            mvp: Mat4::IDENTITY,
            normal: Mat4::IDENTITY,
        }
    }
}

impl Transforms {
    pub fn new(projection: Mat4) -> Self {
        Self {
            projection,
            ..Self::default()
        }
    }

    /// Places the camera at `position`. The view matrix is the inverse of
    /// the camera's own translation.
    pub fn set_camera(&mut self, position: Vec3) {
        self.view = Mat4::from_translation(position).inverse();
    }

    pub fn translate_model(&mut self, offset: Vec3) {
        self.model *= Mat4::from_translation(offset);
    }

    pub fn scale_model(&mut self, factor: Vec3) {
        self.model *= Mat4::from_scale(factor);
    }

    pub fn rotate_model(&mut self, axis: Axis, radians: f32) {
        self.model *= axis.rotation(radians);
    }

    /// Recomputes the derived matrices in the order `view * model`, then
    /// `projection * model_view`, then the inverse-transpose of the
    /// model-view for normals.
    pub fn update(&mut self) {
        self.model_view = self.view * self.model;
        self.mvp = self.projection * self.model_view;
        self.normal = self.model_view.inverse().transpose();
    }

    pub fn model_view(&self) -> &Mat4 {
        &self.model_view
    }

    pub fn mvp(&self) -> &Mat4 {
        &self.mvp
    }

    pub fn normal(&self) -> &Mat4 {
        &self.normal
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_spin_matches_repeated_product() {
        let spin = Spin::new()
            .then(Axis::Z, PI / 140.0)
            .then(Axis::X, PI / 140.0)
            .then(Axis::Y, -PI / 100.0);

        let mut model = Mat4::IDENTITY;
        let mut expected = Mat4::IDENTITY;
        for _ in 0..90 {
            spin.apply(&mut model);
            expected = expected
                * Mat4::from_rotation_z(PI / 140.0)
                * Mat4::from_rotation_x(PI / 140.0)
                * Mat4::from_rotation_y(-PI / 100.0);
        }
        assert!(model.abs_diff_eq(expected, EPS));
    }

    #[test]
    fn test_single_axis_half_turns() {
        let mut model = Mat4::IDENTITY;
        let spin = Spin::new().then(Axis::X, PI / 140.0);
        for _ in 0..140 {
            spin.apply(&mut model);
        }
        assert!(model.abs_diff_eq(Mat4::from_rotation_x(PI), EPS));

        let mut model = Mat4::IDENTITY;
        let spin = Spin::new().then(Axis::Y, PI / 200.0);
        for _ in 0..200 {
            spin.apply(&mut model);
        }
        assert!(model.abs_diff_eq(Mat4::from_rotation_y(PI), EPS));
    }

    #[test]
    fn test_interleaved_spin_over_seventy_frames() {
        let spin = Spin::new().then(Axis::X, PI / 140.0).then(Axis::Y, PI / 200.0);
        let mut transforms = Transforms::default();
        for _ in 0..70 {
            spin.apply(&mut transforms.model);
        }
        let step = spin.frame_rotation();
        let expected = (0..70).fold(Mat4::IDENTITY, |acc, _| acc * step);
        assert!(transforms.model.abs_diff_eq(expected, EPS));
        // interleaving does not commute into separate axis turns
        let separate = Mat4::from_rotation_x(PI / 2.0) * Mat4::from_rotation_y(0.35 * PI);
        assert!(!transforms.model.abs_diff_eq(separate, EPS));
    }

    #[test]
    fn test_composite_is_projection_view_model() {
        let projection = Perspective::STANDARD.matrix(4.0 / 3.0);
        let mut transforms = Transforms::new(projection);
        transforms.set_camera(Vec3::new(0.0, 0.1, 2.0));
        transforms.translate_model(Vec3::new(-1.5, 0.0, -2.0));
        transforms.rotate_model(Axis::Y, 0.3);
        transforms.update();

        let camera = Mat4::from_translation(Vec3::new(0.0, 0.1, 2.0));
        let expected = projection * camera.inverse() * transforms.model;
        assert!(transforms.mvp().abs_diff_eq(expected, EPS));
        assert!(
            transforms
                .model_view()
                .abs_diff_eq(camera.inverse() * transforms.model, EPS)
        );
    }

    #[test]
    fn test_identity_pipeline_passes_model_through() {
        let mut transforms = Transforms::default();
        transforms.translate_model(Vec3::new(0.2, 0.5, 0.0));
        transforms.scale_model(Vec3::new(0.25, 0.25, 1.0));
        transforms.update();
        assert_eq!(*transforms.mvp(), transforms.model);
    }

    #[test]
    fn test_normal_matrix_is_inverse_transpose() {
        let mut transforms = Transforms::default();
        transforms.set_camera(Vec3::new(0.0, 0.1, 2.0));
        transforms.rotate_model(Axis::X, 0.7);
        transforms.scale_model(Vec3::new(2.0, 1.0, 1.0));
        transforms.update();
        let product = *transforms.normal() * transforms.model_view().transpose();
        assert!(product.abs_diff_eq(Mat4::IDENTITY, EPS));
    }

    #[test]
    fn test_perspective_matches_formula() {
        let (width, height) = (960.0_f32, 720.0_f32);
        let aspect = width / height;
        let projection = Perspective::STANDARD.matrix(aspect);

        let (near, far) = (1e-4_f32, 1e4_f32);
        let f = 1.0 / (75.0_f32.to_radians() / 2.0).tan();
        #[rustfmt::skip]
        let expected = Mat4::from_cols_array(&[
            f / aspect, 0.0, 0.0, 0.0,
            0.0, f, 0.0, 0.0,
            0.0, 0.0, (far + near) / (near - far), -1.0,
            0.0, 0.0, 2.0 * far * near / (near - far), 0.0,
        ]);
        assert!(projection.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_still_spin_leaves_model_alone() {
        let spin = Spin::new();
        let mut model = Mat4::from_translation(Vec3::X);
        spin.apply(&mut model);
        assert!(spin.is_still());
        assert_eq!(model, Mat4::from_translation(Vec3::X));
    }
}
