//! [SceneHost] backed by `parry3d` shapes.
//!
//! Useful for running generation outside of an editor, e.g. on collision geometry loaded by a tool or in tests.
use bevy::{
    log::warn,
    platform::collections::HashMap,
    prelude::{Transform, Vec3},
};
use parry3d::{
    math::{Isometry, Point, Real, Vector},
    query::Ray,
    shape::SharedShape,
};

use crate::{
    conversion::shape_vertices,
    host::{NavMeshKind, RayHit, SceneHost, SurfaceGeometry},
    mesher::TriangleMesh,
};

/// Handle of a surface added to a [ParrySceneHost].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u32);

struct ParrySurface {
    id: SurfaceId,
    transform: Transform,
    isometry: Isometry<Real>,
    shape: SharedShape,
}

#[derive(Default)]
pub struct ParrySceneHost {
    surfaces: Vec<ParrySurface>,
    next_id: u32,
    nav_meshes: HashMap<NavMeshKind, TriangleMesh>,
}

impl ParrySceneHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds ``shape`` placed at ``transform`` to the scene.
    ///
    /// Parry shapes can't be scaled by a transform. Apply the scale to the shape itself, any scale on ``transform`` is
    /// ignored.
    pub fn add_surface(&mut self, transform: Transform, shape: SharedShape) -> SurfaceId {
        if transform.scale != Vec3::ONE {
            warn!(
                "Surface transform has scale {}, parry shapes are not scaled by their transform. Ignoring it.",
                transform.scale
            );
        }
        let transform = transform.with_scale(Vec3::ONE);

        let id = SurfaceId(self.next_id);
        self.next_id += 1;

        self.surfaces.push(ParrySurface {
            id,
            transform,
            isometry: Isometry::new(
                transform.translation.into(),
                transform.rotation.to_scaled_axis().into(),
            ),
            shape,
        });

        id
    }

    /// Removes a surface. Returns ``false`` if it didn't exist.
    pub fn remove_surface(&mut self, surface: SurfaceId) -> bool {
        let surface_count = self.surfaces.len();
        self.surfaces.retain(|existing| existing.id != surface);

        self.surfaces.len() != surface_count
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }
}

impl SceneHost for ParrySceneHost {
    type Surface = SurfaceId;

    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: Option<f32>,
    ) -> Option<RayHit<SurfaceId>> {
        let ray = Ray::new(
            Point::new(origin.x, origin.y, origin.z),
            Vector::new(direction.x, direction.y, direction.z),
        );
        let max_distance = max_distance.unwrap_or(Real::MAX);

        self.surfaces
            .iter()
            .filter_map(|surface| {
                surface
                    .shape
                    .cast_ray(&surface.isometry, &ray, max_distance, true)
                    .map(|distance| (distance, surface.id))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(distance, surface)| RayHit {
                position: origin + direction * distance,
                surface,
            })
    }

    fn surface_geometry(&self, surface: SurfaceId) -> Option<SurfaceGeometry> {
        let surface = self.surfaces.iter().find(|existing| existing.id == surface)?;

        Some(SurfaceGeometry {
            vertices: shape_vertices(&surface.shape)?,
            transform: surface.transform,
        })
    }

    fn emit_nav_mesh(&mut self, kind: NavMeshKind, mesh: &TriangleMesh) {
        self.nav_meshes.insert(kind, mesh.clone());
    }

    fn nav_mesh(&self, kind: NavMeshKind) -> Option<TriangleMesh> {
        self.nav_meshes.get(&kind).cloned()
    }

    fn clear_nav_meshes(&mut self) {
        self.nav_meshes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_hit_wins() {
        let mut host = ParrySceneHost::new();
        let ground = host.add_surface(Transform::IDENTITY, SharedShape::cuboid(5.0, 5.0, 0.1));
        let roof = host.add_surface(
            Transform::from_xyz(0.0, 0.0, 3.0),
            SharedShape::cuboid(1.0, 1.0, 0.1),
        );

        let hit = host.raycast(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z, None).unwrap();
        assert_eq!(hit.surface, roof);
        assert!((hit.position.z - 3.1).abs() < 1e-4);

        let hit = host.raycast(Vec3::new(3.0, 0.0, 10.0), Vec3::NEG_Z, None).unwrap();
        assert_eq!(hit.surface, ground);
        assert!((hit.position.z - 0.1).abs() < 1e-4);
    }

    #[test]
    fn test_max_distance_limits_hits() {
        let mut host = ParrySceneHost::new();
        host.add_surface(
            Transform::from_xyz(0.0, 0.0, 3.0),
            SharedShape::cuboid(1.0, 1.0, 0.1),
        );

        assert!(host.raycast(Vec3::ZERO, Vec3::Z, Some(2.0)).is_none());
        assert!(host.raycast(Vec3::ZERO, Vec3::Z, Some(4.0)).is_some());
    }

    #[test]
    fn test_surface_geometry_and_removal() {
        let mut host = ParrySceneHost::new();
        let surface = host.add_surface(
            Transform::from_xyz(1.0, 2.0, 3.0),
            SharedShape::cuboid(1.0, 1.0, 1.0),
        );

        let geometry = host.surface_geometry(surface).unwrap();
        assert_eq!(geometry.vertices.len(), 8);
        assert_eq!(geometry.transform.translation, Vec3::new(1.0, 2.0, 3.0));

        assert!(host.remove_surface(surface));
        assert!(!host.remove_surface(surface));
        assert!(host.surface_geometry(surface).is_none());
        assert_eq!(host.surface_count(), 0);
    }

    #[test]
    fn test_emitted_meshes_can_be_cleared() {
        let mut host = ParrySceneHost::new();
        host.emit_nav_mesh(NavMeshKind::Walkable, &TriangleMesh::default());

        assert!(host.nav_mesh(NavMeshKind::Walkable).is_some());
        assert!(host.nav_mesh(NavMeshKind::Blocked).is_none());

        host.clear_nav_meshes();
        assert!(host.nav_mesh(NavMeshKind::Walkable).is_none());
    }
}
