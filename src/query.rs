use bevy::prelude::Vec3;

use crate::document::NavMeshDocument;

/// Triangles whose XZ projection has a squared sine between its edges at ``c`` at or below this are skipped.
const DEGENERATE_SINE_SQUARED_EPSILON: f32 = 1e-10;

impl NavMeshDocument {
    /// Index of the first triangle containing ``position`` when projected onto the XZ-plane.
    ///
    /// Expects ``position`` in the document's (exported) coordinate convention. Height is ignored.
    pub fn find_triangle_at(&self, position: Vec3) -> Option<usize> {
        self.triangles.iter().position(|triangle| {
            let [a, b, c] = self.triangle_vertices(triangle);
            contains_xz(a, b, c, position)
        })
    }
}

fn contains_xz(a: Vec3, b: Vec3, c: Vec3, point: Vec3) -> bool {
    let denominator = (b.z - c.z) * (a.x - c.x) + (c.x - b.x) * (a.z - c.z);
    let ca_length_squared = (a.x - c.x).powi(2) + (a.z - c.z).powi(2);
    let cb_length_squared = (b.x - c.x).powi(2) + (b.z - c.z).powi(2);
    // The denominator is the doubled area, so its square is |ca|^2 * |cb|^2 * sin^2.
    if denominator * denominator
        <= DEGENERATE_SINE_SQUARED_EPSILON * ca_length_squared * cb_length_squared
    {
        return false;
    }

    let weight_a = ((b.z - c.z) * (point.x - c.x) + (c.x - b.x) * (point.z - c.z)) / denominator;
    let weight_b = ((c.z - a.z) * (point.x - c.x) + (a.x - c.x) * (point.z - c.z)) / denominator;
    let weight_c = 1.0 - weight_a - weight_b;

    (0.0..=1.0).contains(&weight_a)
        && (0.0..=1.0).contains(&weight_b)
        && (0.0..=1.0).contains(&weight_c)
}
