/// Homogeneous 3D vector algebra
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

use crate::error::MathError;

/// A homogeneous 3D vector.
///
/// `w == 1` marks a point and `w == 0` a direction. Addition and subtraction
/// combine `w` arithmetically, so `point - point` is a direction and
/// `point + direction` is a point; a matrix translation row therefore only
/// moves values that really are points. Scaling and division leave `w` alone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    #[serde(default = "default_w")]
    pub w: f32,
}

fn default_w() -> f32 {
    1.0
}

impl Vec3 {
    pub const ORIGIN: Vec3 = Vec3::point(0.0, 0.0, 0.0);
    pub const UP: Vec3 = Vec3::direction(0.0, 1.0, 0.0);
    pub const FORWARD: Vec3 = Vec3::direction(0.0, 0.0, 1.0);

    /// A point (`w = 1`). This is the default for vertex data.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self::point(x, y, z)
    }

    pub const fn point(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, w: 1.0 }
    }

    pub const fn direction(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, w: 0.0 }
    }

    pub const fn with_w(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn is_point(&self) -> bool {
        self.w != 0.0
    }

    /// True when x, y and z are all neither NaN nor infinite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn scale(self, s: f32) -> Self {
        Self::with_w(self.x * s, self.y * s, self.z * s, self.w)
    }

    /// Scales `x, y, z` by `1 / s`; fails instead of producing infinities.
    pub fn divide(self, s: f32) -> Result<Self, MathError> {
        if s == 0.0 {
            return Err(MathError::DivideByZero);
        }
        Ok(self.scale(1.0 / s))
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Right-handed cross product. Argument order matters: face normals are
    /// `edge1.cross(edge2)` for edges taken from vertex 0.
    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3::direction(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn normalize(self) -> Result<Self, MathError> {
        let len = self.length();
        if len == 0.0 {
            return Err(MathError::ZeroLength);
        }
        self.divide(len)
    }

    /// Divide `x, y, z` by this vector's own `w`, leaving a point in
    /// normalized device coordinates.
    pub fn perspective_divide(self) -> Result<Self, MathError> {
        let v = self.divide(self.w)?;
        Ok(Vec3::point(v.x, v.y, v.z))
    }

    /// Point where the infinite line through `line_start` and `line_end`
    /// crosses the plane through `plane_point` with normal `plane_normal`.
    ///
    /// The normal is renormalized. Fails when the line is parallel to the
    /// plane.
    pub fn intersect_plane(
        plane_point: Vec3,
        plane_normal: Vec3,
        line_start: Vec3,
        line_end: Vec3,
    ) -> Result<Vec3, MathError> {
        let normal = plane_normal.normalize()?;
        let plane_d = -normal.dot(plane_point);
        let ad = line_start.dot(normal);
        let bd = line_end.dot(normal);
        if bd - ad == 0.0 {
            return Err(MathError::DivideByZero);
        }
        Ok(lerp_to_plane(plane_d, ad, bd, line_start, line_end))
    }
}

/// Interpolate from `start` to `end` to the plane `n·p + plane_d = 0`, given
/// each endpoint's projection onto the unit normal. Callers guarantee
/// `ad != bd`.
pub(crate) fn lerp_to_plane(plane_d: f32, ad: f32, bd: f32, start: Vec3, end: Vec3) -> Vec3 {
    let t = (-plane_d - ad) / (bd - ad);
    start + (end - start) * t
}

impl Default for Vec3 {
    fn default() -> Self {
        Vec3::ORIGIN
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3::with_w(
            self.x + other.x,
            self.y + other.y,
            self.z + other.z,
            self.w + other.w,
        )
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3::with_w(
            self.x - other.x,
            self.y - other.y,
            self.z - other.z,
            self.w - other.w,
        )
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f32) -> Vec3 {
        self.scale(s)
    }
}

impl From<Point3<f32>> for Vec3 {
    fn from(p: Point3<f32>) -> Self {
        Vec3::point(p.x, p.y, p.z)
    }
}

impl From<Vector3<f32>> for Vec3 {
    fn from(v: Vector3<f32>) -> Self {
        Vec3::direction(v.x, v.y, v.z)
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(a: [f32; 3]) -> Self {
        Vec3::point(a[0], a[1], a[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_point_minus_point_is_direction() {
        let a = Vec3::new(3.0, 2.0, 1.0);
        let b = Vec3::new(1.0, 1.0, 1.0);
        let d = a - b;
        assert_eq!(d, Vec3::direction(2.0, 1.0, 0.0));
        assert!(!d.is_point());
        assert!((b + d).is_point());
    }

    #[test]
    fn test_normalize_unit_length() {
        for v in [
            Vec3::new(3.0, 4.0, 0.0),
            Vec3::direction(-1e-3, 2e-3, 5e-4),
            Vec3::new(120.0, -7.5, 33.0),
        ] {
            let n = v.normalize().unwrap();
            assert!((n.length() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_is_finite() {
        assert!(Vec3::new(1.0, -2.0, 3.0).is_finite());
        assert!(!Vec3::new(f32::NAN, 0.0, 0.0).is_finite());
        assert!(!Vec3::new(0.0, f32::NEG_INFINITY, 0.0).is_finite());
    }

    #[test]
    fn test_zero_length_and_zero_divisor_fail() {
        assert_eq!(
            Vec3::direction(0.0, 0.0, 0.0).normalize(),
            Err(MathError::ZeroLength)
        );
        assert_eq!(
            Vec3::new(1.0, 2.0, 3.0).divide(0.0),
            Err(MathError::DivideByZero)
        );
    }

    #[test]
    fn test_cross_is_anticommutative() {
        let a = Vec3::direction(1.0, 0.0, 0.0);
        let b = Vec3::direction(0.0, 1.0, 0.0);
        assert_eq!(a.cross(b), Vec3::direction(0.0, 0.0, 1.0));
        assert_eq!(b.cross(a), Vec3::direction(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_intersect_plane() {
        // Plane z = 2 with an unnormalized normal
        let p = Vec3::intersect_plane(
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::direction(0.0, 0.0, 5.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(1.0, 3.0, 4.0),
        )
        .unwrap();
        assert!((p.x - 1.0).abs() < EPS);
        assert!((p.y - 2.0).abs() < EPS);
        assert!((p.z - 2.0).abs() < EPS);
        assert!(p.is_point());
    }

    #[test]
    fn test_intersect_parallel_line_fails() {
        let r = Vec3::intersect_plane(
            Vec3::ORIGIN,
            Vec3::UP,
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(5.0, 1.0, 0.0),
        );
        assert_eq!(r, Err(MathError::DivideByZero));
    }

    #[test]
    fn test_perspective_divide() {
        let v = Vec3::with_w(2.0, 4.0, 1.0, 2.0).perspective_divide().unwrap();
        assert_eq!(v, Vec3::new(1.0, 2.0, 0.5));
        assert!(Vec3::with_w(1.0, 1.0, 1.0, 0.0).perspective_divide().is_err());
    }
}
