use bevy::prelude::{UVec2, Vec2, Vec3};

use crate::bounds::BoundingBox;

/// Tolerance (in cells) used when deciding whether the far edge of the bounds lands on a grid line.
pub const GRID_EPSILON: f32 = 1e-4;

/// The sampling grid laid over the XY projection of a [BoundingBox].
///
/// Cell ``(gx, gy)`` sits at ``origin + (gx, gy) * cell_size``. Positions are computed from the
/// integer coordinate rather than by stepping, so the set of sampled cells doesn't depend on
/// accumulated floating point error. The final row/column at ``bounds.max`` is included when the
/// extent is a whole multiple of ``cell_size`` (within [GRID_EPSILON]).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleGrid {
    pub origin: Vec2,
    pub cell_size: f32,
    /// Number of samples along X.
    pub width: u32,
    /// Number of samples along Y.
    pub height: u32,
}

impl SampleGrid {
    pub fn from_bounds(bounds: &BoundingBox, cell_size: f32) -> Self {
        let size = bounds.size();

        Self {
            origin: bounds.min.truncate(),
            cell_size,
            width: samples_along(size.x, cell_size),
            height: samples_along(size.y, cell_size),
        }
    }

    /// Total amount of candidate samples.
    #[inline]
    pub fn sample_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// World XY position of a grid coordinate.
    #[inline]
    pub fn cell_position(&self, cell: UVec2) -> Vec2 {
        self.origin + cell.as_vec2() * self.cell_size
    }

    /// Grid coordinate nearest to ``position``. ``None`` if it rounds to a coordinate outside the grid.
    pub fn cell_containing(&self, position: Vec3) -> Option<UVec2> {
        let offset = ((position.truncate() - self.origin) / self.cell_size).round();

        if offset.x < 0.0
            || offset.y < 0.0
            || offset.x >= self.width as f32
            || offset.y >= self.height as f32
        {
            return None;
        }

        Some(offset.as_uvec2())
    }

    /// Iterates all cells in sweep order, X outer and Y inner.
    pub fn cells(&self) -> impl Iterator<Item = UVec2> + '_ {
        (0..self.width).flat_map(move |x| (0..self.height).map(move |y| UVec2::new(x, y)))
    }
}

fn samples_along(extent: f32, cell_size: f32) -> u32 {
    (extent / cell_size + GRID_EPSILON).floor().max(0.0) as u32 + 1
}
