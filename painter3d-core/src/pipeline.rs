/// Per-frame geometry pipeline: world, cull, light, view, clip, project,
/// sort and screen-edge clip.
use std::collections::VecDeque;
use tracing::{debug, trace, warn};

use crate::clip::Plane;
use crate::config::PipelineConfig;
use crate::error::ConfigError;
use crate::geometry::{Mesh, Triangle};
use crate::matrix::{Mat4, RigidTransform};
use crate::projection::{Camera, Viewport};
use crate::vector::Vec3;

/// The external "fill a triangle with a flat color" primitive.
pub trait Rasterizer {
    fn fill_triangle(&mut self, a: (f32, f32), b: (f32, f32), c: (f32, f32), color: Vec3);
}

/// Per-frame triangle accounting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Source triangles examined.
    pub submitted: usize,
    /// Dropped for zero area, non-finite vertices or a failed perspective
    /// divide.
    pub degenerate: usize,
    /// Facing away from the camera.
    pub culled: usize,
    /// Entirely behind the near plane.
    pub near_clipped: usize,
    /// Candidates left after projection, before screen-edge clipping.
    pub projected: usize,
    /// Triangles handed to the rasterizer.
    pub emitted: usize,
}

/// The output of one pass: screen-space triangles in draw order.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub triangles: Vec<Triangle>,
    pub stats: FrameStats,
}

pub struct Pipeline {
    config: PipelineConfig,
    viewport: Viewport,
    projection: Mat4,
    world: RigidTransform,
    light: Vec3,
    near_plane: Plane,
    edges: [Plane; 4],
}

impl Pipeline {
    pub fn new(config: PipelineConfig, viewport: Viewport) -> Result<Self, ConfigError> {
        config.validate()?;
        check_viewport(&viewport)?;
        let light = config
            .light()
            .normalize()
            .map_err(|e| ConfigError::Invalid {
                field: "light_direction",
                reason: e.to_string(),
            })?;

        Ok(Self {
            projection: Mat4::projection(
                config.fov_degrees,
                viewport.aspect_ratio(),
                config.near,
                config.far,
            ),
            world: RigidTransform::identity(),
            light,
            near_plane: Plane::unit(
                Vec3::new(0.0, 0.0, config.near),
                Vec3::direction(0.0, 0.0, 1.0),
            ),
            edges: viewport.edge_planes(),
            viewport,
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Adopt a new output size, rebuilding the projection.
    pub fn resize(&mut self, viewport: Viewport) -> Result<(), ConfigError> {
        check_viewport(&viewport)?;
        self.projection = Mat4::projection(
            self.config.fov_degrees,
            viewport.aspect_ratio(),
            self.config.near,
            self.config.far,
        );
        self.edges = viewport.edge_planes();
        self.viewport = viewport;
        Ok(())
    }

    /// Place every mesh with a world translation.
    pub fn set_world_offset(&mut self, offset: Vec3) {
        self.world = RigidTransform::translation(offset.x, offset.y, offset.z);
    }

    /// Run the geometry stages up to and including the depth sort.
    ///
    /// Returned triangles are in half-scaled device coordinates (the visible
    /// square is `-0.5..=0.5`), farthest first. Writes the camera's derived
    /// `look_dir` and `target`.
    pub fn project(
        &self,
        meshes: &[Mesh],
        camera: &mut Camera,
        stats: &mut FrameStats,
    ) -> Vec<Triangle> {
        let view = match camera.orient() {
            Ok(view) => view,
            Err(e) => {
                warn!(error = %e, "degenerate camera basis, skipping frame");
                return Vec::new();
            }
        };

        let mut candidates = Vec::new();
        for mesh in meshes {
            for tri in &mesh.triangles {
                self.transform_triangle(tri, camera.position, &view, stats, &mut candidates);
            }
        }
        stats.projected = candidates.len();

        // Painter's order: largest average depth drawn first
        candidates.sort_by(|a, b| b.average_depth().total_cmp(&a.average_depth()));
        candidates
    }

    /// Full pass: projected triangles mapped to pixels and clipped to the
    /// screen edges, in draw order.
    pub fn frame(&self, meshes: &[Mesh], camera: &mut Camera) -> Frame {
        let mut stats = FrameStats::default();
        let candidates = self.project(meshes, camera, &mut stats);

        let mut triangles = Vec::with_capacity(candidates.len());
        for tri in candidates {
            let on_screen = tri.map(|p| self.viewport.to_pixels(p));
            self.clip_to_screen(on_screen, &mut triangles);
        }
        stats.emitted = triangles.len();

        debug!(
            submitted = stats.submitted,
            degenerate = stats.degenerate,
            culled = stats.culled,
            near_clipped = stats.near_clipped,
            projected = stats.projected,
            emitted = stats.emitted,
            "frame"
        );
        Frame { triangles, stats }
    }

    /// Run a pass and hand every triangle to `sink`, farthest first.
    pub fn render<R: Rasterizer + ?Sized>(
        &self,
        meshes: &[Mesh],
        camera: &mut Camera,
        sink: &mut R,
    ) -> FrameStats {
        let frame = self.frame(meshes, camera);
        for tri in &frame.triangles {
            sink.fill_triangle(
                (tri.p[0].x, tri.p[0].y),
                (tri.p[1].x, tri.p[1].y),
                (tri.p[2].x, tri.p[2].y),
                tri.color,
            );
        }
        frame.stats
    }

    fn transform_triangle(
        &self,
        tri: &Triangle,
        eye: Vec3,
        view: &RigidTransform,
        stats: &mut FrameStats,
        out: &mut Vec<Triangle>,
    ) {
        stats.submitted += 1;

        let world = tri.map(|p| self.world.transform(p));
        let normal = match world.normal() {
            Ok(normal) if normal.is_finite() && world.p.iter().all(Vec3::is_finite) => normal,
            _ => {
                trace!(?tri, "zero-area or non-finite triangle dropped");
                stats.degenerate += 1;
                return;
            }
        };

        if normal.dot(world.p[0] - eye) >= 0.0 {
            stats.culled += 1;
            return;
        }

        let intensity = self.light.dot(normal).max(self.config.min_intensity);
        let viewed = world
            .map(|p| view.transform(p))
            .with_color(Vec3::new(intensity, intensity, intensity));

        let clipped = self.near_plane.clip(&viewed);
        if clipped.count() == 0 {
            stats.near_clipped += 1;
            return;
        }

        for tri in clipped.triangles() {
            match tri.try_map(|p| self.projection.multiply_vector(p).perspective_divide()) {
                Ok(ndc) => out.push(ndc.map(|p| Vec3::new(p.x * 0.5, p.y * 0.5, p.z))),
                Err(e) => {
                    trace!(error = %e, "projection failed, triangle dropped");
                    stats.degenerate += 1;
                }
            }
        }
    }

    /// Clip against bottom, top, left and right in turn. Each edge may split
    /// the triangles produced by the previous one.
    fn clip_to_screen(&self, tri: Triangle, out: &mut Vec<Triangle>) {
        let mut queue = VecDeque::from([tri]);
        for edge in &self.edges {
            for _ in 0..queue.len() {
                if let Some(next) = queue.pop_front() {
                    queue.extend(edge.clip(&next).triangles());
                }
            }
        }
        out.extend(queue);
    }
}

fn check_viewport(viewport: &Viewport) -> Result<(), ConfigError> {
    if !(viewport.width >= 2.0 && viewport.height >= 2.0) {
        return Err(ConfigError::Invalid {
            field: "viewport",
            reason: format!("{}x{} is too small", viewport.width, viewport.height),
        });
    }
    if !(viewport.pixel_aspect > 0.0) {
        return Err(ConfigError::Invalid {
            field: "viewport",
            reason: format!("pixel aspect {} must be positive", viewport.pixel_aspect),
        });
    }
    Ok(())
}
