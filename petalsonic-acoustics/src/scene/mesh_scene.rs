use super::ray_tracer::{RayHit, RayTracer};
use crate::error::{AcousticsError, Result};
use crate::geometry::{Aabb, Mesh, Ray, Triangle};
use crate::math::Vec3;

/// Hits closer than this are treated as self-intersections and skipped.
const MIN_HIT_DISTANCE: f32 = 1e-4;

struct SceneMesh {
    mesh: Mesh,
    materials: Vec<u8>,
    bounds: Aabb,
}

/// Brute-force ray tracer over a list of static meshes.
///
/// Each mesh is culled with its bounding box before its triangles are tested.
#[derive(Default)]
pub struct MeshScene {
    meshes: Vec<SceneMesh>,
}

impl MeshScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mesh with one material index per triangle. Returns the mesh's
    /// index within the scene.
    pub fn add_mesh(&mut self, mesh: Mesh, materials: Vec<u8>) -> Result<usize> {
        if materials.len() != mesh.num_triangles() {
            return Err(AcousticsError::Configuration(format!(
                "Mesh has {} triangles but {} material indices",
                mesh.num_triangles(),
                materials.len()
            )));
        }

        let bounds = mesh.bounds();
        self.meshes.push(SceneMesh {
            mesh,
            materials,
            bounds,
        });

        log::debug!("Added mesh {} to scene", self.meshes.len() - 1);
        Ok(self.meshes.len() - 1)
    }

    /// Adds a mesh whose triangles all share `material`.
    pub fn add_mesh_with_material(&mut self, mesh: Mesh, material: u8) -> Result<usize> {
        let materials = vec![material; mesh.num_triangles()];
        self.add_mesh(mesh, materials)
    }

    /// Adds the six faces of `aabb` as a closed mesh, e.g. the walls of a
    /// shoebox room.
    pub fn add_box(&mut self, aabb: Aabb, material: u8) -> Result<usize> {
        let (lo, hi) = (aabb.min, aabb.max);
        let vertices = vec![
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
        ];
        // Wound so that normals face into the box.
        let quads: [[u32; 4]; 6] = [
            [0, 1, 2, 3], // z = lo
            [4, 7, 6, 5], // z = hi
            [0, 4, 5, 1], // y = lo
            [3, 2, 6, 7], // y = hi
            [0, 3, 7, 4], // x = lo
            [1, 5, 6, 2], // x = hi
        ];
        let triangles = quads
            .iter()
            .flat_map(|&[a, b, c, d]| [Triangle::new(a, b, c), Triangle::new(a, c, d)])
            .collect();

        self.add_mesh_with_material(Mesh::new(vertices, triangles)?, material)
    }

    pub fn num_meshes(&self) -> usize {
        self.meshes.len()
    }

    pub fn num_triangles(&self) -> usize {
        self.meshes.iter().map(|m| m.mesh.num_triangles()).sum()
    }
}

impl RayTracer for MeshScene {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> RayHit {
        let ray = Ray { origin, direction };
        let mut closest = RayHit::miss();
        let mut best = max_distance;

        for scene_mesh in &self.meshes {
            if ray
                .intersect_aabb(&scene_mesh.bounds, 0.0, best)
                .is_none()
            {
                continue;
            }

            let mesh = &scene_mesh.mesh;
            for tri in 0..mesh.num_triangles() {
                if mesh.is_degenerate(tri) {
                    continue;
                }
                if let Some(t) = ray.intersect_triangle(mesh, tri) {
                    if t > MIN_HIT_DISTANCE && t < best {
                        best = t;
                        closest = RayHit::new(t, scene_mesh.materials[tri], mesh.normal(tri));
                    }
                }
            }
        }

        closest
    }
}
