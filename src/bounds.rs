use bevy::prelude::{Transform, Vec3};

/// World-space axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Bounding box covering ``points``. Returns ``None`` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;

        Some(points.fold(Self { min: first, max: first }, |bounds, point| Self {
            min: bounds.min.min(point),
            max: bounds.max.max(point),
        }))
    }

    /// Bounding box of a surface's local ``vertices`` after applying its world ``transform``.
    pub fn from_surface(vertices: &[Vec3], transform: &Transform) -> Option<Self> {
        Self::from_points(vertices.iter().map(|vertex| transform.transform_point(*vertex)))
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}
