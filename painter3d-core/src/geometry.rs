/// Geometry primitives for 3D rendering
use crate::error::MathError;
use crate::vector::Vec3;

/// A flat-colored triangle. `color` holds RGB in `0..=1` as `x, y, z`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub p: [Vec3; 3],
    pub color: Vec3,
}

impl Triangle {
    pub const WHITE: Vec3 = Vec3::point(1.0, 1.0, 1.0);

    pub fn new(p0: Vec3, p1: Vec3, p2: Vec3) -> Self {
        Self {
            p: [p0, p1, p2],
            color: Self::WHITE,
        }
    }

    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    /// Unnormalized face normal, `(p1 - p0) x (p2 - p0)`.
    pub fn face_cross(&self) -> Vec3 {
        let edge1 = self.p[1] - self.p[0];
        let edge2 = self.p[2] - self.p[0];
        edge1.cross(edge2)
    }

    /// Unit face normal; fails for zero-area triangles.
    pub fn normal(&self) -> Result<Vec3, MathError> {
        self.face_cross().normalize()
    }

    pub fn average_depth(&self) -> f32 {
        (self.p[0].z + self.p[1].z + self.p[2].z) / 3.0
    }

    /// Apply `f` to every vertex, keeping the color.
    pub fn map<F: FnMut(Vec3) -> Vec3>(&self, f: F) -> Triangle {
        Triangle {
            p: self.p.map(f),
            color: self.color,
        }
    }

    pub fn try_map<F>(&self, mut f: F) -> Result<Triangle, MathError>
    where
        F: FnMut(Vec3) -> Result<Vec3, MathError>,
    {
        Ok(Triangle {
            p: [f(self.p[0])?, f(self.p[1])?, f(self.p[2])?],
            color: self.color,
        })
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Move every vertex by `offset`.
    pub fn translate(&mut self, offset: Vec3) {
        let offset = Vec3::direction(offset.x, offset.y, offset.z);
        for tri in &mut self.triangles {
            for p in &mut tri.p {
                *p = *p + offset;
            }
        }
    }

    /// Scale every vertex about the origin.
    pub fn scale(&mut self, factor: f32) {
        for tri in &mut self.triangles {
            for p in &mut tri.p {
                p.x *= factor;
                p.y *= factor;
                p.z *= factor;
            }
        }
    }

    /// Axis-aligned box spanning `min..max`, 12 triangles wound so every face
    /// normal points outward.
    pub fn cuboid(min: Vec3, max: Vec3) -> Self {
        let (x1, y1, z1) = (min.x, min.y, min.z);
        let (x2, y2, z2) = (max.x, max.y, max.z);
        let v = Vec3::new;
        let mut mesh = Self::with_capacity(12);

        // Front (z1), facing -z
        mesh.add_triangle(Triangle::new(v(x1, y1, z1), v(x1, y2, z1), v(x2, y1, z1)));
        mesh.add_triangle(Triangle::new(v(x1, y2, z1), v(x2, y2, z1), v(x2, y1, z1)));

        // Back (z2), facing +z
        mesh.add_triangle(Triangle::new(v(x1, y1, z2), v(x2, y1, z2), v(x1, y2, z2)));
        mesh.add_triangle(Triangle::new(v(x1, y2, z2), v(x2, y1, z2), v(x2, y2, z2)));

        // Left (x1), facing -x
        mesh.add_triangle(Triangle::new(v(x1, y1, z1), v(x1, y1, z2), v(x1, y2, z1)));
        mesh.add_triangle(Triangle::new(v(x1, y2, z1), v(x1, y1, z2), v(x1, y2, z2)));

        // Right (x2), facing +x
        mesh.add_triangle(Triangle::new(v(x2, y1, z1), v(x2, y2, z1), v(x2, y1, z2)));
        mesh.add_triangle(Triangle::new(v(x2, y2, z1), v(x2, y2, z2), v(x2, y1, z2)));

        // Bottom (y1), facing -y
        mesh.add_triangle(Triangle::new(v(x1, y1, z1), v(x2, y1, z1), v(x1, y1, z2)));
        mesh.add_triangle(Triangle::new(v(x1, y1, z2), v(x2, y1, z1), v(x2, y1, z2)));

        // Top (y2), facing +y
        mesh.add_triangle(Triangle::new(v(x1, y2, z1), v(x1, y2, z2), v(x2, y2, z1)));
        mesh.add_triangle(Triangle::new(v(x1, y2, z2), v(x2, y2, z2), v(x2, y2, z1)));

        mesh
    }

    /// Box with its minimum corner at `corner`.
    pub fn bounding_box(corner: Vec3, width: f32, height: f32, depth: f32) -> Self {
        Self::cuboid(
            corner,
            Vec3::new(corner.x + width, corner.y + height, corner.z + depth),
        )
    }

    pub fn centered_box(center: Vec3, width: f32, height: f32, depth: f32) -> Self {
        Self::bounding_box(
            Vec3::new(
                center.x - width / 2.0,
                center.y - height / 2.0,
                center.z - depth / 2.0,
            ),
            width,
            height,
            depth,
        )
    }

    /// Cube of edge `size` centered on the origin
    pub fn cube(size: f32) -> Self {
        Self::centered_box(Vec3::ORIGIN, size, size, size)
    }
}
