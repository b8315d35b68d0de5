use super::Aabb;
use crate::error::{AcousticsError, Result};
use crate::math::Vec3;

/// Three indices into a mesh's vertex buffer. Owns no vertex data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Triangle {
    pub indices: [u32; 3],
}

impl Triangle {
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Self { indices: [a, b, c] }
    }
}

/// Indexed triangle mesh.
///
/// Normals and areas are derived once at construction. A degenerate triangle
/// (collinear or coincident vertices) gets a zero normal and a zero area, so
/// it never contributes energy when used by the simulator.
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    triangles: Vec<Triangle>,
    normals: Vec<Vec3>,
    areas: Vec<f32>,
    bounds: Aabb,
}

impl Mesh {
    /// Creates a mesh, validating that every index refers to a vertex.
    pub fn new(vertices: Vec<Vec3>, triangles: Vec<Triangle>) -> Result<Self> {
        let num_vertices = vertices.len();
        if let Some((tri_index, tri)) = triangles
            .iter()
            .enumerate()
            .find(|(_, t)| t.indices.iter().any(|&i| i as usize >= num_vertices))
        {
            return Err(AcousticsError::Configuration(format!(
                "Triangle {} has indices {:?} but the mesh only has {} vertices",
                tri_index, tri.indices, num_vertices
            )));
        }

        let mut bounds = Aabb::empty();
        for &v in &vertices {
            bounds.grow(v);
        }

        let mut mesh = Self {
            vertices,
            triangles,
            normals: Vec::new(),
            areas: Vec::new(),
            bounds,
        };
        mesh.calc_normals_and_areas();

        log::debug!(
            "Created mesh with {} vertices and {} triangles",
            mesh.num_vertices(),
            mesh.num_triangles()
        );

        Ok(mesh)
    }

    fn calc_normals_and_areas(&mut self) {
        let mut normals = Vec::with_capacity(self.triangles.len());
        let mut areas = Vec::with_capacity(self.triangles.len());

        for tri in 0..self.triangles.len() {
            let v0 = self.triangle_vertex(tri, 0);
            let v1 = self.triangle_vertex(tri, 1);
            let v2 = self.triangle_vertex(tri, 2);

            let cross = (v1 - v0).cross(v2 - v0);
            let length = cross.length();
            if length > f32::EPSILON {
                normals.push(cross / length);
                areas.push(0.5 * length);
            } else {
                normals.push(Vec3::ZERO);
                areas.push(0.0);
            }
        }

        self.normals = normals;
        self.areas = areas;
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn vertex(&self, index: usize) -> Vec3 {
        self.vertices[index]
    }

    pub fn triangle(&self, index: usize) -> Triangle {
        self.triangles[index]
    }

    /// Position of corner `corner` (0, 1 or 2) of triangle `triangle`.
    pub fn triangle_vertex(&self, triangle: usize, corner: usize) -> Vec3 {
        self.vertices[self.triangles[triangle].indices[corner] as usize]
    }

    /// Unit normal following the right-hand rule over the stored winding.
    /// `Vec3::ZERO` for degenerate triangles.
    pub fn normal(&self, triangle: usize) -> Vec3 {
        self.normals[triangle]
    }

    pub fn is_degenerate(&self, triangle: usize) -> bool {
        self.areas[triangle] == 0.0
    }

    pub fn area(&self, triangle: usize) -> f32 {
        self.areas[triangle]
    }

    pub fn surface_area(&self) -> f32 {
        self.areas.iter().sum()
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }
}
