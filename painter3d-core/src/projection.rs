/// Camera and screen mapping
use serde::{Deserialize, Serialize};

use crate::clip::Plane;
use crate::error::MathError;
use crate::matrix::RigidTransform;
use crate::vector::Vec3;

/// A first-person camera.
///
/// `position`, `yaw` and `pitch` are driven by the owning application.
/// `look_dir`, `up` and `target` are derived by [`Camera::orient`] once per
/// frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    pub look_dir: Vec3,
    pub up: Vec3,
    pub target: Vec3,
    /// Rotation about the world y axis, in radians.
    pub yaw: f32,
    /// Rotation about the camera x axis, in radians.
    pub pitch: f32,
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            look_dir: Vec3::FORWARD,
            up: Vec3::UP,
            target: position + Vec3::FORWARD,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Rebuild the derived direction vectors from yaw and pitch and return
    /// the world-to-view transform.
    pub fn orient(&mut self) -> Result<RigidTransform, MathError> {
        let rotation = RigidTransform::rotation_x(self.pitch)
            .then(&RigidTransform::rotation_y(self.yaw));

        self.up = Vec3::UP;
        self.look_dir = rotation.transform(Vec3::FORWARD);
        self.target = self.position + self.look_dir;

        let camera = RigidTransform::point_at(self.position, self.target, self.up)?;
        Ok(camera.quick_inverse())
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ORIGIN)
    }
}

/// Output surface size in pixels, and the mapping onto it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Height of one pixel relative to its width.
    pub pixel_aspect: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
            pixel_aspect: 1.0,
        }
    }

    /// For non-square pixels, such as terminal character cells.
    pub fn with_pixel_aspect(mut self, pixel_aspect: f32) -> Self {
        self.pixel_aspect = pixel_aspect;
        self
    }

    /// Ratio handed to the projection matrix, which scales `x` by it.
    pub fn aspect_ratio(&self) -> f32 {
        self.height * self.pixel_aspect / self.width
    }

    /// Map half-scaled device coordinates (`-0.5..=0.5` on screen) to pixels.
    ///
    /// Pixel `y` grows downwards.
    pub fn to_pixels(&self, v: Vec3) -> Vec3 {
        Vec3::with_w(
            (v.x + 0.5) * (self.width - 1.0),
            (0.5 - v.y) * (self.height - 1.0),
            v.z,
            v.w,
        )
    }

    /// The four screen edges in clipping order: bottom, top, left, right.
    pub fn edge_planes(&self) -> [Plane; 4] {
        [
            Plane::unit(Vec3::ORIGIN, Vec3::direction(0.0, 1.0, 0.0)),
            Plane::unit(
                Vec3::new(0.0, self.height - 1.0, 0.0),
                Vec3::direction(0.0, -1.0, 0.0),
            ),
            Plane::unit(Vec3::ORIGIN, Vec3::direction(1.0, 0.0, 0.0)),
            Plane::unit(
                Vec3::new(self.width - 1.0, 0.0, 0.0),
                Vec3::direction(-1.0, 0.0, 0.0),
            ),
        ]
    }

    pub fn contains(&self, x: f32, y: f32, epsilon: f32) -> bool {
        x >= -epsilon
            && y >= -epsilon
            && x <= self.width - 1.0 + epsilon
            && y <= self.height - 1.0 + epsilon
    }
}
