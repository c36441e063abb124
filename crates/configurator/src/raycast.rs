//! Rays, camera unprojection and ray-mesh intersection.
//!
//! Triangle tests use the Moller-Trumbore algorithm. [`MeshRayCaster`] keeps
//! meshes in local space together with their world transform, so a part that
//! moves (the turntable) only needs a new transform, not new triangles.

use std::collections::HashMap;

use glam::{Mat4, Vec2, Vec3};

use crate::constants::RAY_EPSILON;
use crate::types::{GeometryRef, SelectablePart};

/// Half-line in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length for rays built with [`Ray::new`]
    pub direction: Vec3,
}

impl Ray {
    /// Build a ray, normalizing the direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at parameter `t` along the ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Distance along the ray and barycentric coordinates of a triangle hit
#[derive(Debug, Clone, Copy)]
pub struct TriangleHit {
    pub t: f32,
    pub u: f32,
    pub v: f32,
}

/// Moller-Trumbore ray-triangle intersection.
///
/// `t` is expressed in units of `ray.direction`, so a non-normalized direction
/// scales the returned distance accordingly. Hits behind the origin are
/// rejected.
pub fn ray_triangle_intersection(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<TriangleHit> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let pvec = ray.direction.cross(edge2);
    let det = edge1.dot(pvec);
    // Parallel to the triangle plane, relative to the edge and direction lengths
    if det.abs() < RAY_EPSILON * edge1.length() * edge2.length() * ray.direction.length() {
        return None;
    }
    let inv_det = 1.0 / det;

    let tvec = ray.origin - v0;
    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let qvec = tvec.cross(edge1);
    let v = ray.direction.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(qvec) * inv_det;
    (t >= RAY_EPSILON).then_some(TriangleHit { t, u, v })
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Smallest box containing all points, `None` for an empty set.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self { min: first, max: first }, |bounds, p| Self {
            min: bounds.min.min(p),
            max: bounds.max.max(p),
        }))
    }

    /// Slab test. Returns the entry distance, or 0.0 when the origin is
    /// inside the box.
    pub fn ray_intersection(&self, ray: &Ray) -> Option<f32> {
        let inv_dir = ray.direction.recip();
        let t1 = (self.min - ray.origin) * inv_dir;
        let t2 = (self.max - ray.origin) * inv_dir;

        let t_enter = t1.min(t2).max_element().max(0.0);
        let t_exit = t1.max(t2).min_element();
        (t_exit >= t_enter).then_some(t_enter)
    }
}

/// View and projection transforms of the active camera.
///
/// Right-handed. Both the 0..1 depth range and the reversed infinite range
/// the renderer uses are accepted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraProjection {
    /// World to view transform
    pub view: Mat4,
    pub projection: Mat4,
}

impl CameraProjection {
    pub fn new(view: Mat4, projection: Mat4) -> Self {
        Self { view, projection }
    }

    /// Perspective camera at `eye` looking at `target`.
    pub fn perspective(
        eye: Vec3,
        target: Vec3,
        up: Vec3,
        fov_y_radians: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            view: Mat4::look_at_rh(eye, target, up),
            projection: Mat4::perspective_rh(fov_y_radians, aspect_ratio, near, far),
        }
    }

    /// Unproject a viewport pixel into a world-space ray starting on the near
    /// plane.
    ///
    /// `cursor` is measured from the top-left corner. Positions outside the
    /// viewport still produce a ray. Returns `None` only for a degenerate
    /// viewport or camera.
    pub fn viewport_to_ray(&self, cursor: Vec2, viewport_size: Vec2) -> Option<Ray> {
        if viewport_size.x <= 0.0 || viewport_size.y <= 0.0 {
            return None;
        }

        let ndc = Vec2::new(
            2.0 * cursor.x / viewport_size.x - 1.0,
            1.0 - 2.0 * cursor.y / viewport_size.y,
        );

        let eye = self.view.inverse().transform_point3(Vec3::ZERO);
        let clip_to_world = (self.projection * self.view).inverse();
        // Depth 1 is at infinity for a reversed infinite projection, depth 0
        // for the standard one; the near plane is the finite end closest to
        // the eye.
        let near = [0.0, 1.0]
            .into_iter()
            .map(|depth| clip_to_world.project_point3(ndc.extend(depth)))
            .filter(|point| point.is_finite())
            .min_by(|a, b| a.distance_squared(eye).total_cmp(&b.distance_squared(eye)))?;

        let direction = near - eye;
        if !eye.is_finite() || direction.length_squared() < RAY_EPSILON * RAY_EPSILON {
            return None;
        }
        Some(Ray::new(near, direction))
    }
}

/// Ray-vs-geometry query provided by the renderer.
pub trait RayCaster {
    /// Distance from the ray origin to the nearest intersection with the
    /// part's geometry, if any.
    fn intersect(&self, ray: &Ray, part: &SelectablePart) -> Option<f32>;
}

/// Triangle soup extracted from a render mesh, in mesh-local space.
#[derive(Debug, Clone, Default)]
pub struct RaycastMesh {
    positions: Vec<Vec3>,
    /// Triangle indices (3 per triangle)
    indices: Vec<u32>,
    bounds: Option<Aabb>,
}

impl RaycastMesh {
    /// Build from vertex positions and a triangle list. A trailing partial
    /// triangle is dropped.
    pub fn new(positions: Vec<Vec3>, mut indices: Vec<u32>) -> Self {
        let remainder = indices.len() % 3;
        if remainder != 0 {
            tracing::warn!(
                "RaycastMesh: index count {} is not a multiple of 3, dropping {} trailing indices",
                indices.len(),
                remainder
            );
            indices.truncate(indices.len() - remainder);
        }
        let bounds = Aabb::from_points(positions.iter().copied());
        Self {
            positions,
            indices,
            bounds,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }

    fn triangle(&self, tri_index: usize) -> Option<(Vec3, Vec3, Vec3)> {
        let base = tri_index * 3;
        let vertex = |i: usize| self.positions.get(self.indices[base + i] as usize).copied();
        Some((vertex(0)?, vertex(1)?, vertex(2)?))
    }

    /// Closest hit distance, in units of `ray.direction`.
    pub fn raycast(&self, ray: &Ray) -> Option<f32> {
        self.bounds?.ray_intersection(ray)?;

        // Brute force; shoe parts are small enough that a BVH does not pay off
        (0..self.triangle_count())
            .filter_map(|tri| {
                let (v0, v1, v2) = self.triangle(tri)?;
                ray_triangle_intersection(ray, v0, v1, v2)
            })
            .map(|hit| hit.t)
            .min_by(f32::total_cmp)
    }
}

struct PlacedMesh {
    mesh: RaycastMesh,
    world_to_local: Mat4,
}

/// [`RayCaster`] over CPU-side triangle meshes keyed by geometry handle.
#[derive(Default)]
pub struct MeshRayCaster {
    meshes: HashMap<GeometryRef, PlacedMesh>,
}

impl std::fmt::Debug for MeshRayCaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeshRayCaster")
            .field("mesh_count", &self.meshes.len())
            .finish()
    }
}

impl MeshRayCaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the mesh for a geometry handle.
    pub fn insert(&mut self, geometry: GeometryRef, mesh: RaycastMesh, local_to_world: Mat4) {
        self.meshes.insert(
            geometry,
            PlacedMesh {
                mesh,
                world_to_local: local_to_world.inverse(),
            },
        );
    }

    /// Update the world transform of a known mesh. Returns false if the
    /// geometry is unknown.
    pub fn set_transform(&mut self, geometry: GeometryRef, local_to_world: Mat4) -> bool {
        match self.meshes.get_mut(&geometry) {
            Some(placed) => {
                placed.world_to_local = local_to_world.inverse();
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, geometry: GeometryRef) -> Option<RaycastMesh> {
        self.meshes.remove(&geometry).map(|placed| placed.mesh)
    }

    pub fn contains(&self, geometry: GeometryRef) -> bool {
        self.meshes.contains_key(&geometry)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

impl RayCaster for MeshRayCaster {
    fn intersect(&self, ray: &Ray, part: &SelectablePart) -> Option<f32> {
        let placed = self.meshes.get(&part.geometry)?;
        let origin = placed.world_to_local.transform_point3(ray.origin);
        let direction = placed.world_to_local.transform_vector3(ray.direction);
        // Local units per world unit along the ray
        let stretch = direction.length();
        if !origin.is_finite() || !stretch.is_finite() || stretch < RAY_EPSILON {
            return None;
        }
        let local_ray = Ray::new(origin, direction);
        placed
            .mesh
            .raycast(&local_ray)
            .map(|local_t| local_t * ray.direction.length() / stretch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SelectablePart;

    const TOLERANCE: f32 = 1e-4;

    /// Unit quad in the XY plane centred on the origin, facing +Z.
    fn unit_quad() -> RaycastMesh {
        RaycastMesh::new(
            vec![
                Vec3::new(-0.5, -0.5, 0.0),
                Vec3::new(0.5, -0.5, 0.0),
                Vec3::new(0.5, 0.5, 0.0),
                Vec3::new(-0.5, 0.5, 0.0),
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn test_ray_triangle_hit() {
        let ray = Ray::new(Vec3::new(0.25, 0.25, 1.0), Vec3::NEG_Z);
        let hit = ray_triangle_intersection(&ray, Vec3::ZERO, Vec3::X, Vec3::Y).unwrap();
        assert!((hit.t - 1.0).abs() < TOLERANCE);
        assert!((hit.u - 0.25).abs() < TOLERANCE);
        assert!((hit.v - 0.25).abs() < TOLERANCE);
    }

    #[test]
    fn test_ray_triangle_miss_and_behind() {
        let outside = Ray::new(Vec3::new(2.0, 2.0, 1.0), Vec3::NEG_Z);
        assert!(ray_triangle_intersection(&outside, Vec3::ZERO, Vec3::X, Vec3::Y).is_none());

        let away = Ray::new(Vec3::new(0.25, 0.25, 1.0), Vec3::Z);
        assert!(ray_triangle_intersection(&away, Vec3::ZERO, Vec3::X, Vec3::Y).is_none());

        let parallel = Ray::new(Vec3::new(0.25, 0.25, 1.0), Vec3::X);
        assert!(ray_triangle_intersection(&parallel, Vec3::ZERO, Vec3::X, Vec3::Y).is_none());
    }

    #[test]
    fn test_aabb_slab() {
        let bounds = Aabb::from_points([Vec3::splat(-1.0), Vec3::splat(1.0)]).unwrap();

        let front = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!((bounds.ray_intersection(&front).unwrap() - 4.0).abs() < TOLERANCE);

        let inside = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(bounds.ray_intersection(&inside), Some(0.0));

        let miss = Ray::new(Vec3::new(3.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!(bounds.ray_intersection(&miss).is_none());

        assert!(Aabb::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn test_center_pixel_looks_down_view_axis() {
        let camera = CameraProjection::perspective(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::ZERO,
            Vec3::Y,
            60f32.to_radians(),
            16.0 / 9.0,
            0.1,
            1000.0,
        );
        let ray = camera
            .viewport_to_ray(Vec2::new(640.0, 360.0), Vec2::new(1280.0, 720.0))
            .unwrap();
        assert!((ray.direction - Vec3::NEG_Z).length() < TOLERANCE);
        assert!((ray.origin - Vec3::new(0.0, 0.0, 4.9)).length() < 1e-3);
    }

    #[test]
    fn test_reversed_infinite_projection() {
        let camera = CameraProjection::new(
            Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y),
            Mat4::perspective_infinite_reverse_rh(60f32.to_radians(), 1.0, 0.1),
        );
        let ray = camera
            .viewport_to_ray(Vec2::new(400.0, 400.0), Vec2::new(800.0, 800.0))
            .unwrap();
        assert!((ray.direction - Vec3::NEG_Z).length() < TOLERANCE);
        assert!((ray.origin - Vec3::new(0.0, 0.0, 4.9)).length() < 1e-3);

        let right = camera
            .viewport_to_ray(Vec2::new(800.0, 400.0), Vec2::new(800.0, 800.0))
            .unwrap();
        assert!(right.direction.x > 0.0);
    }

    #[test]
    fn test_pixel_outside_viewport_still_yields_ray() {
        let camera = CameraProjection::perspective(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::ZERO,
            Vec3::Y,
            60f32.to_radians(),
            1.0,
            0.1,
            100.0,
        );
        let ray = camera
            .viewport_to_ray(Vec2::new(-400.0, 1500.0), Vec2::new(800.0, 800.0))
            .unwrap();
        // Left of and below the view axis
        assert!(ray.direction.x < 0.0);
        assert!(ray.direction.y < 0.0);

        assert!(
            camera
                .viewport_to_ray(Vec2::new(1.0, 1.0), Vec2::new(0.0, 600.0))
                .is_none()
        );
    }

    #[test]
    fn test_mesh_caster_respects_world_transform() {
        let mut caster = MeshRayCaster::new();
        let geometry = GeometryRef(1);
        let part = SelectablePart::mesh("upper", geometry);
        caster.insert(geometry, unit_quad(), Mat4::from_translation(Vec3::new(0.0, 0.0, -3.0)));

        let ray = Ray::new(Vec3::new(0.0, 0.0, 2.0), Vec3::NEG_Z);
        let distance = caster.intersect(&ray, &part).unwrap();
        assert!((distance - 5.0).abs() < TOLERANCE);

        // Scaling the quad must not distort the reported world distance
        assert!(caster.set_transform(
            geometry,
            Mat4::from_scale_rotation_translation(
                Vec3::splat(3.0),
                glam::Quat::IDENTITY,
                Vec3::new(0.0, 0.0, -1.0),
            ),
        ));
        let distance = caster.intersect(&ray, &part).unwrap();
        assert!((distance - 3.0).abs() < TOLERANCE);

        // Moved out of the ray's path
        caster.set_transform(geometry, Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)));
        assert!(caster.intersect(&ray, &part).is_none());
    }

    /// Square of the given edge length in the XY plane at height `z`.
    fn quad(edge: f32, z: f32) -> RaycastMesh {
        let h = edge * 0.5;
        RaycastMesh::new(
            vec![
                Vec3::new(-h, -h, z),
                Vec3::new(h, -h, z),
                Vec3::new(h, h, z),
                Vec3::new(-h, h, z),
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn test_tiny_triangle_hit_under_scaled_model() {
        let mut caster = MeshRayCaster::new();
        let scale = Mat4::from_scale(Vec3::splat(3.0));
        let eyelet = SelectablePart::mesh("eyelet", GeometryRef(1));
        let sole = SelectablePart::mesh("sole", GeometryRef(2));
        caster.insert(GeometryRef(1), quad(0.0015, 0.0), scale);
        caster.insert(GeometryRef(2), quad(4.0, -1.0), scale);

        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let front = caster.intersect(&ray, &eyelet).unwrap();
        let back = caster.intersect(&ray, &sole).unwrap();
        assert!((front - 5.0).abs() < TOLERANCE);
        assert!((back - 8.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_small_triangle_not_treated_as_parallel() {
        let ray = Ray::new(Vec3::new(0.0001, 0.0001, 1.0), Vec3::NEG_Z);
        let hit = ray_triangle_intersection(&ray, Vec3::ZERO, Vec3::X * 0.0005, Vec3::Y * 0.0005);
        assert!((hit.unwrap().t - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_unknown_geometry_never_hits() {
        let caster = MeshRayCaster::new();
        let part = SelectablePart::mesh("sole", GeometryRef(42));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 2.0), Vec3::NEG_Z);
        assert!(caster.intersect(&ray, &part).is_none());
        assert!(!MeshRayCaster::new().set_transform(GeometryRef(42), Mat4::IDENTITY));
    }

    #[test]
    fn test_partial_triangle_dropped() {
        let mesh = RaycastMesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 2, 0]);
        assert_eq!(mesh.triangle_count(), 1);
    }
}
