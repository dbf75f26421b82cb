/// 4x4 transforms for the row-vector convention (`v' = v · M`)
use nalgebra::{Matrix4, RowVector4};
use std::ops::Mul;

use crate::error::MathError;
use crate::vector::Vec3;

/// A general 4x4 matrix, indexed `(row, column)`.
///
/// Points are row vectors, so translation lives in row 3 and composing "`a`
/// then `b`" is `a * b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4(Matrix4<f32>);

impl Mat4 {
    pub fn identity() -> Self {
        Self(Matrix4::identity())
    }

    pub fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        Self(Matrix4::from_fn(|r, c| rows[r][c]))
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.0[(row, col)]
    }

    pub fn as_matrix(&self) -> &Matrix4<f32> {
        &self.0
    }

    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, s, 0.0],
            [0.0, -s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([
            [c, s, 0.0, 0.0],
            [-s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        Self::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [x, y, z, 1.0],
        ])
    }

    /// Perspective projection from view space to clip space.
    ///
    /// The view-space `z` is copied into the result's `w` so a later
    /// perspective divide yields normalized device coordinates. `fov_degrees`
    /// must lie strictly inside `(0, 180)`.
    pub fn projection(fov_degrees: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov_degrees.to_radians() * 0.5).tan();
        let depth = far / (far - near);
        Self::from_rows([
            [aspect_ratio * f, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, depth, 1.0],
            [0.0, 0.0, -near * depth, 0.0],
        ])
    }

    pub fn multiply_vector(&self, v: Vec3) -> Vec3 {
        let r = RowVector4::new(v.x, v.y, v.z, v.w) * self.0;
        Vec3::with_w(r[0], r[1], r[2], r[3])
    }

    pub fn multiply(&self, other: &Mat4) -> Mat4 {
        Mat4(self.0 * other.0)
    }

    pub fn approx_eq(&self, other: &Mat4, epsilon: f32) -> bool {
        (self.0 - other.0).norm() < epsilon
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for Mat4 {
    type Output = Mat4;
    fn mul(self, rhs: Mat4) -> Mat4 {
        self.multiply(&rhs)
    }
}

/// A transform made only of rotations and translations.
///
/// The orthonormal upper 3x3 block is what makes [`RigidTransform::quick_inverse`]
/// valid; projections and scales are deliberately not constructible here.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RigidTransform(Mat4);

impl RigidTransform {
    pub fn identity() -> Self {
        Self(Mat4::identity())
    }

    pub fn rotation_x(angle: f32) -> Self {
        Self(Mat4::rotation_x(angle))
    }

    pub fn rotation_y(angle: f32) -> Self {
        Self(Mat4::rotation_y(angle))
    }

    pub fn rotation_z(angle: f32) -> Self {
        Self(Mat4::rotation_z(angle))
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        Self(Mat4::translation(x, y, z))
    }

    /// Camera-to-world basis looking from `eye` towards `target`.
    ///
    /// Rows are right, up, forward and the eye position. Fails when `eye`
    /// and `target` coincide or `up` is parallel to the view direction.
    pub fn point_at(eye: Vec3, target: Vec3, up: Vec3) -> Result<Self, MathError> {
        let forward = (target - eye).normalize()?;
        let up = (up - forward * up.dot(forward)).normalize()?;
        let right = up.cross(forward);

        Ok(Self(Mat4::from_rows([
            [right.x, right.y, right.z, 0.0],
            [up.x, up.y, up.z, 0.0],
            [forward.x, forward.y, forward.z, 0.0],
            [eye.x, eye.y, eye.z, 1.0],
        ])))
    }

    /// `self` followed by `next`.
    pub fn then(&self, next: &RigidTransform) -> RigidTransform {
        RigidTransform(self.0.multiply(&next.0))
    }

    /// Inverse by transposing the rotation block and counter-rotating the
    /// translation.
    pub fn quick_inverse(&self) -> RigidTransform {
        let m = &self.0;
        let mut rows = [[0.0f32; 4]; 4];
        for r in 0..3 {
            for c in 0..3 {
                rows[r][c] = m.get(c, r);
            }
        }
        for c in 0..3 {
            rows[3][c] = -(m.get(3, 0) * rows[0][c] + m.get(3, 1) * rows[1][c] + m.get(3, 2) * rows[2][c]);
        }
        rows[3][3] = 1.0;
        RigidTransform(Mat4::from_rows(rows))
    }

    pub fn transform(&self, v: Vec3) -> Vec3 {
        self.0.multiply_vector(v)
    }

    pub fn matrix(&self) -> &Mat4 {
        &self.0
    }
}

impl From<RigidTransform> for Mat4 {
    fn from(t: RigidTransform) -> Self {
        t.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPS: f32 = 1e-5;

    fn sample() -> Mat4 {
        Mat4::from_rows([
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [-1.0, 0.5, 0.25, 2.0],
            [9.0, -3.0, 1.5, 1.0],
        ])
    }

    #[test]
    fn test_identity_is_neutral() {
        let m = sample();
        assert_eq!(Mat4::identity().multiply(&m), m);
        assert_eq!(m.multiply(&Mat4::identity()), m);
    }

    #[test]
    fn test_translation_moves_points_not_directions() {
        let t = Mat4::translation(1.0, 2.0, 3.0);
        assert_eq!(t.multiply_vector(Vec3::new(1.0, 1.0, 1.0)), Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(
            t.multiply_vector(Vec3::direction(1.0, 1.0, 1.0)),
            Vec3::direction(1.0, 1.0, 1.0)
        );
    }

    #[test]
    fn test_rotation_y_quarter_turn() {
        let v = Mat4::rotation_y(FRAC_PI_2).multiply_vector(Vec3::FORWARD);
        assert!((v.x + 1.0).abs() < EPS);
        assert!(v.y.abs() < EPS);
        assert!(v.z.abs() < EPS);
    }

    #[test]
    fn test_composition_order() {
        // Rotate then translate: the translation is not rotated
        let m = Mat4::rotation_z(FRAC_PI_2) * Mat4::translation(10.0, 0.0, 0.0);
        let v = m.multiply_vector(Vec3::new(1.0, 0.0, 0.0));
        assert!((v.x - 10.0).abs() < EPS);
        assert!((v.y - 1.0).abs() < EPS);
    }

    #[test]
    fn test_projection_copies_depth_into_w() {
        let p = Mat4::projection(90.0, 1.0, 0.1, 1000.0);
        let v = p.multiply_vector(Vec3::new(1.0, 1.0, 4.0));
        assert!((v.w - 4.0).abs() < EPS);
        let ndc = v.perspective_divide().unwrap();
        // tan(45 deg) == 1, so x/z is preserved
        assert!((ndc.x - 0.25).abs() < EPS);
        assert!((ndc.y - 0.25).abs() < EPS);
    }

    #[test]
    fn test_projection_depth_range() {
        let p = Mat4::projection(60.0, 1.0, 0.5, 50.0);
        let near = p.multiply_vector(Vec3::new(0.0, 0.0, 0.5)).perspective_divide().unwrap();
        let far = p.multiply_vector(Vec3::new(0.0, 0.0, 50.0)).perspective_divide().unwrap();
        assert!(near.z.abs() < EPS);
        assert!((far.z - 1.0).abs() < EPS);
    }

    #[test]
    fn test_quick_inverse_of_point_at() {
        let cases = [
            (Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
            (Vec3::new(3.0, -2.0, 5.0), Vec3::new(-1.0, 4.0, 0.5)),
            (Vec3::new(10.0, 1.0, -7.0), Vec3::new(10.5, 1.2, -6.0)),
        ];
        for (eye, target) in cases {
            let camera = RigidTransform::point_at(eye, target, Vec3::UP).unwrap();
            let view = camera.quick_inverse();
            assert!(view.then(&camera).matrix().approx_eq(&Mat4::identity(), EPS));
            assert!(camera.then(&view).matrix().approx_eq(&Mat4::identity(), EPS));

            let general = camera.matrix().as_matrix().try_inverse().unwrap();
            assert!((general - view.matrix().as_matrix()).norm() < 1e-4);
        }
    }

    #[test]
    fn test_point_at_parallel_up_fails() {
        let r = RigidTransform::point_at(Vec3::ORIGIN, Vec3::new(0.0, 5.0, 0.0), Vec3::UP);
        assert_eq!(r, Err(MathError::ZeroLength));
    }

    #[test]
    fn test_view_moves_eye_to_origin() {
        let eye = Vec3::new(2.0, 3.0, 4.0);
        let view = RigidTransform::point_at(eye, Vec3::new(2.0, 3.0, 10.0), Vec3::UP)
            .unwrap()
            .quick_inverse();
        let v = view.transform(eye);
        assert!(v.x.abs() < EPS && v.y.abs() < EPS && v.z.abs() < EPS);
        let ahead = view.transform(Vec3::new(2.0, 3.0, 6.0));
        assert!((ahead.z - 2.0).abs() < EPS);
    }
}
