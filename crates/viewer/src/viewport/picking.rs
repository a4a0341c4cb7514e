use std::sync::Arc;

use glam::Vec3;

use super::mesh::MeshData;
use crate::model::LoadedModel;

/// A ray in world space
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Inverted box; the identity for [`Aabb::union`]
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::MAX),
        max: Vec3::splat(f32::MIN),
    };

    /// Compute AABB from MeshData (9 floats per vertex: pos+normal+color)
    pub fn from_mesh(data: &MeshData) -> Self {
        let mut aabb = Self::EMPTY;
        for i in 0..data.vertex_count() {
            aabb.extend(data.position(i));
        }
        aabb
    }

    pub fn extend(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Center of the bounding box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }

    /// Largest of the three box dimensions
    pub fn max_extent(&self) -> f32 {
        self.size().max_element()
    }
}

/// Ray-AABB intersection using the slab method.
/// Returns the distance along the ray to the nearest hit, or None.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let inv_dir = ray.direction.recip();

    let t1 = (aabb.min - ray.origin) * inv_dir;
    let t2 = (aabb.max - ray.origin) * inv_dir;

    let tmin = t1.min(t2).max_element();
    let tmax = t1.max(t2).min_element();

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some(if tmin < 0.0 { tmax } else { tmin })
}

/// Möller-Trumbore ray-triangle intersection algorithm.
/// Returns the distance along the ray if hit, or None if no intersection.
pub fn ray_triangle_intersect(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);

    // Intersection is behind ray origin
    if t > EPSILON {
        Some(t)
    } else {
        None
    }
}

/// Result of picking a triangle in a mesh
#[derive(Clone, Debug)]
pub struct TriangleHit {
    /// Index of the triangle (into mesh.indices / 3)
    pub triangle_index: usize,
    /// Distance from ray origin to hit point
    pub distance: f32,
    /// Normal of the hit triangle
    pub normal: Vec3,
}

/// Find the nearest triangle in a mesh intersected by the ray.
pub fn pick_triangle(ray: &Ray, mesh: &MeshData) -> Option<TriangleHit> {
    let mut best: Option<TriangleHit> = None;

    for tri_idx in 0..mesh.triangle_count() {
        let Some([v0, v1, v2]) = mesh.triangle(tri_idx) else {
            continue;
        };

        if let Some(dist) = ray_triangle_intersect(ray, v0, v1, v2) {
            if best.as_ref().is_none_or(|b| dist < b.distance) {
                best = Some(TriangleHit {
                    triangle_index: tri_idx,
                    distance: dist,
                    normal: (v1 - v0).cross(v2 - v0).normalize_or_zero(),
                });
            }
        }
    }

    best
}

/// A resolved surface point on the loaded model
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceHit {
    /// World-space intersection point
    pub point: Vec3,
    /// Distance from the ray origin
    pub distance: f32,
    /// Geometric normal of the hit triangle
    pub normal: Vec3,
    /// Name of the drawable part that was hit
    pub part: String,
}

/// Outcome of a pick query
#[derive(Clone, Debug, PartialEq)]
pub enum PickResult {
    Hit(SurfaceHit),
    /// The ray does not touch any model surface
    Miss,
    /// No model is attached yet
    ModelNotReady,
}

impl PickResult {
    pub fn hit(self) -> Option<SurfaceHit> {
        match self {
            PickResult::Hit(hit) => Some(hit),
            _ => None,
        }
    }
}

/// Resolves rays against every drawable part of the loaded model.
///
/// Holds a shared reference to the model so the renderer and the picker
/// can see the same geometry; `release` drops it on teardown.
#[derive(Default)]
pub struct PickingEngine {
    model: Option<Arc<LoadedModel>>,
}

impl PickingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a fully loaded model. Picks become valid from here on.
    pub fn attach(&mut self, model: Arc<LoadedModel>) {
        self.model = Some(model);
    }

    /// Drop the model reference. Subsequent picks return `ModelNotReady`.
    pub fn release(&mut self) {
        self.model = None;
    }

    pub fn is_ready(&self) -> bool {
        self.model.is_some()
    }

    pub fn model(&self) -> Option<&Arc<LoadedModel>> {
        self.model.as_ref()
    }

    /// Nearest intersection (smallest positive distance) across all parts.
    pub fn pick(&self, ray: &Ray) -> PickResult {
        let Some(model) = &self.model else {
            return PickResult::ModelNotReady;
        };

        if ray_aabb(ray, &model.bounds).is_none() {
            return PickResult::Miss;
        }

        let mut best: Option<SurfaceHit> = None;
        for part in model.parts() {
            let Some(box_dist) = ray_aabb(ray, &part.bounds) else {
                continue;
            };
            // Box entry is already past the best hit (exit distance when starting inside)
            let inside = part.bounds.contains(ray.origin);
            if !inside && best.as_ref().is_some_and(|b| box_dist > b.distance) {
                continue;
            }

            if let Some(hit) = pick_triangle(ray, &part.mesh) {
                if best.as_ref().is_none_or(|b| hit.distance < b.distance) {
                    best = Some(SurfaceHit {
                        point: ray.at(hit.distance),
                        distance: hit.distance,
                        normal: hit.normal,
                        part: part.name.clone(),
                    });
                }
            }
        }

        match best {
            Some(hit) => PickResult::Hit(hit),
            None => PickResult::Miss,
        }
    }
}
