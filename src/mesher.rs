use bevy::prelude::Vec3;

use crate::grid::SampleGrid;

pub const VERTICES_IN_TRIANGLE: usize = 3; // Don't change this. The mesher can't make anything other than triangles.

/// Triangles whose squared sine between their two edges at the first vertex is at or below this are degenerate.
/// Relative to the edge lengths so it holds for any cell size.
const DEGENERATE_SINE_SQUARED_EPSILON: f32 = 1e-10;

/// Shared-vertex triangle mesh.
///
/// Vertex indices are the order in which vertices were emitted. Walkable & blocked meshes each have their own index
/// space.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriangleMesh {
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<[u32; VERTICES_IN_TRIANGLE]>,
}

impl TriangleMesh {
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Finds the first triangle referencing a vertex that doesn't exist.
    ///
    /// Returns the triangle index and the offending vertex index.
    pub fn find_invalid_index(&self) -> Option<(usize, u32)> {
        self.triangles
            .iter()
            .enumerate()
            .find_map(|(triangle_index, triangle)| {
                triangle
                    .iter()
                    .find(|index| **index as usize >= self.vertices.len())
                    .map(|index| (triangle_index, *index))
            })
    }

    /// Unweighted centroid of ``triangle``.
    pub fn triangle_center(&self, triangle: &[u32; VERTICES_IN_TRIANGLE]) -> Vec3 {
        triangle
            .iter()
            .map(|index| self.vertices[*index as usize])
            .sum::<Vec3>()
            / VERTICES_IN_TRIANGLE as f32
    }
}

/// Builds a triangle mesh out of the sample ``points`` of one classification.
///
/// Every point becomes a vertex. Each grid cell whose four corners all have a sample gets two triangles,
/// ``(v00, v10, v11)`` & ``(v00, v11, v01)``. Cells with a missing corner are left as holes.
///
/// Points rounding to the same grid coordinate overwrite each other in the lookup, the last one wins. The earlier
/// vertex is still emitted but no triangle references it.
pub fn build_triangle_mesh(points: &[Vec3], grid: &SampleGrid) -> TriangleMesh {
    let width = grid.width as usize;

    let mut cell_vertex = vec![None; grid.sample_count()]; // Laid out X to Y.
    for (i, point) in points.iter().enumerate() {
        if let Some(cell) = grid.cell_containing(*point) {
            cell_vertex[cell.y as usize * width + cell.x as usize] = Some(i as u32);
        }
    }

    let vertex_at = |x: u32, y: u32| cell_vertex[y as usize * width + x as usize];

    let max_tris =
        grid.width.saturating_sub(1) as usize * grid.height.saturating_sub(1) as usize * 2;
    let mut mesh = TriangleMesh {
        vertices: points.to_vec(),
        triangles: Vec::with_capacity(max_tris.min(points.len() * 2)),
    };

    for x in 0..grid.width.saturating_sub(1) {
        for y in 0..grid.height.saturating_sub(1) {
            let (Some(v00), Some(v10), Some(v01), Some(v11)) = (
                vertex_at(x, y),
                vertex_at(x + 1, y),
                vertex_at(x, y + 1),
                vertex_at(x + 1, y + 1),
            ) else {
                continue;
            };

            for triangle in [[v00, v10, v11], [v00, v11, v01]] {
                if !is_degenerate(&mesh.vertices, triangle) {
                    mesh.triangles.push(triangle);
                }
            }
        }
    }

    mesh
}

fn is_degenerate(vertices: &[Vec3], [a, b, c]: [u32; VERTICES_IN_TRIANGLE]) -> bool {
    if a == b || a == c || b == c {
        return true;
    }

    let a = vertices[a as usize];
    let b = vertices[b as usize];
    let c = vertices[c as usize];

    let (ab, ac) = (b - a, c - a);

    ab.cross(ac).length_squared()
        <= DEGENERATE_SINE_SQUARED_EPSILON * ab.length_squared() * ac.length_squared()
}
