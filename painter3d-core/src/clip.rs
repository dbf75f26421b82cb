/// Triangle clipping against a single plane
use crate::error::MathError;
use crate::geometry::Triangle;
use crate::vector::{lerp_to_plane, Vec3};

/// A clipping plane. The side the normal points to is "inside".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    point: Vec3,
    normal: Vec3,
    offset: f32,
}

impl Plane {
    /// Plane through `point`; `normal` is renormalized.
    pub fn new(point: Vec3, normal: Vec3) -> Result<Self, MathError> {
        Ok(Self::unit(point, normal.normalize()?))
    }

    /// Plane from a normal already known to be unit length.
    pub(crate) fn unit(point: Vec3, normal: Vec3) -> Self {
        Self {
            point,
            normal,
            offset: normal.dot(point),
        }
    }

    pub fn point(&self) -> Vec3 {
        self.point
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Signed distance from the plane, positive on the inside.
    pub fn signed_distance(&self, v: Vec3) -> f32 {
        self.normal.dot(v) - self.offset
    }

    fn intersect(&self, inside: Vec3, outside: Vec3) -> Vec3 {
        lerp_to_plane(
            -self.offset,
            self.normal.dot(inside),
            self.normal.dot(outside),
            inside,
            outside,
        )
    }

    /// Clip `tri` to the inside half-space.
    ///
    /// Vertices exactly on the plane count as inside. Output triangles keep
    /// the input color.
    pub fn clip(&self, tri: &Triangle) -> Clipped {
        let mut inside = [Vec3::ORIGIN; 3];
        let mut outside = [Vec3::ORIGIN; 3];
        let (mut n_in, mut n_out) = (0, 0);

        for &p in &tri.p {
            if self.signed_distance(p) >= 0.0 {
                inside[n_in] = p;
                n_in += 1;
            } else {
                outside[n_out] = p;
                n_out += 1;
            }
        }

        match n_in {
            0 => Clipped::None,
            3 => Clipped::One(*tri),
            1 => Clipped::One(Triangle {
                p: [
                    inside[0],
                    self.intersect(inside[0], outside[0]),
                    self.intersect(inside[0], outside[1]),
                ],
                color: tri.color,
            }),
            _ => {
                // The inside region is a quad, split along a shared diagonal
                let first = Triangle {
                    p: [
                        inside[0],
                        inside[1],
                        self.intersect(inside[0], outside[0]),
                    ],
                    color: tri.color,
                };
                let second = Triangle {
                    p: [
                        inside[1],
                        first.p[2],
                        self.intersect(inside[1], outside[0]),
                    ],
                    color: tri.color,
                };
                Clipped::Two(first, second)
            }
        }
    }
}

/// Result of clipping one triangle against one plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Clipped {
    None,
    One(Triangle),
    Two(Triangle, Triangle),
}

impl Clipped {
    pub fn count(&self) -> usize {
        match self {
            Clipped::None => 0,
            Clipped::One(_) => 1,
            Clipped::Two(..) => 2,
        }
    }

    pub fn triangles(self) -> impl Iterator<Item = Triangle> {
        let pair = match self {
            Clipped::None => [None, None],
            Clipped::One(a) => [Some(a), None],
            Clipped::Two(a, b) => [Some(a), Some(b)],
        };
        pair.into_iter().flatten()
    }
}

/// Clip `tri` against the plane through `plane_point` with `plane_normal`.
pub fn clip_triangle(
    plane_point: Vec3,
    plane_normal: Vec3,
    tri: &Triangle,
) -> Result<Clipped, MathError> {
    Ok(Plane::new(plane_point, plane_normal)?.clip(tri))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn area(t: &Triangle) -> f32 {
        t.face_cross().length() * 0.5
    }

    fn ground() -> Plane {
        // Keep y >= 0
        Plane::new(Vec3::ORIGIN, Vec3::direction(0.0, 3.0, 0.0)).unwrap()
    }

    fn red(tri: Triangle) -> Triangle {
        tri.with_color(Vec3::new(1.0, 0.0, 0.0))
    }

    #[test]
    fn test_fully_inside_passes_through() {
        let tri = red(Triangle::new(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(2.0, 1.0, 3.0),
        ));
        assert_eq!(ground().clip(&tri), Clipped::One(tri));
    }

    #[test]
    fn test_fully_outside_is_discarded() {
        let tri = Triangle::new(
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(1.0, -2.0, 0.0),
            Vec3::new(2.0, -0.5, 3.0),
        );
        let clipped = ground().clip(&tri);
        assert_eq!(clipped.count(), 0);
        assert_eq!(clipped.triangles().count(), 0);
    }

    #[test]
    fn test_on_plane_counts_as_inside() {
        let tri = Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        );
        assert_eq!(ground().clip(&tri), Clipped::One(tri));
    }

    #[test]
    fn test_one_inside_shrinks_to_one_triangle() {
        let tri = red(Triangle::new(
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(-2.0, -2.0, 0.0),
            Vec3::new(2.0, -2.0, 0.0),
        ));
        let plane = ground();
        let out: Vec<Triangle> = plane.clip(&tri).triangles().collect();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].color, tri.color);
        for p in &out[0].p {
            assert!(plane.signed_distance(*p) >= -EPS);
        }
        // Tip of height 2 over a base of 2
        assert!((area(&out[0]) - 2.0).abs() < EPS);
    }

    #[test]
    fn test_two_inside_splits_quad_preserving_area() {
        let tri = red(Triangle::new(
            Vec3::new(-2.0, 2.0, 0.0),
            Vec3::new(2.0, 2.0, 0.0),
            Vec3::new(0.0, -2.0, 0.0),
        ));
        let plane = ground();
        let clipped = plane.clip(&tri);
        assert_eq!(clipped.count(), 2);
        let out: Vec<Triangle> = clipped.triangles().collect();

        // Whole triangle has area 8, the cut-off tip below y = 0 has area 2
        let total: f32 = out.iter().map(area).sum();
        assert!((total - 6.0).abs() < EPS);
        for t in &out {
            assert_eq!(t.color, tri.color);
            for p in &t.p {
                assert!(plane.signed_distance(*p) >= -EPS);
            }
        }
        // The two halves share the first computed intersection
        assert_eq!(out[0].p[2], out[1].p[1]);
    }

    #[test]
    fn test_zero_normal_is_rejected() {
        let tri = Triangle::new(Vec3::ORIGIN, Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(
            clip_triangle(Vec3::ORIGIN, Vec3::direction(0.0, 0.0, 0.0), &tri),
            Err(MathError::ZeroLength)
        );
    }
}
