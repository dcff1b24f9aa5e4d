use std::{fmt::Debug, hash::Hash, path::Path};

use bevy::prelude::{Transform, Vec3};

use crate::mesher::TriangleMesh;

/// Result of a [SceneHost::raycast].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit<S> {
    /// World position of the hit.
    pub position: Vec3,
    /// The surface that was hit.
    pub surface: S,
}

/// Geometry of a surface as known by the host.
#[derive(Clone, Debug, Default)]
pub struct SurfaceGeometry {
    /// Vertices in the surface's local space.
    pub vertices: Vec<Vec3>,
    /// Local to world transform.
    pub transform: Transform,
}

/// Which of the generated nav-meshes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NavMeshKind {
    /// Mesh built from walkable samples. This is the one that gets exported.
    Walkable,
    /// Mesh built from blocked samples. Only for visualization.
    Blocked,
}

impl NavMeshKind {
    /// Object name the mesh goes by in the host scene.
    pub fn object_name(&self) -> &'static str {
        match self {
            NavMeshKind::Walkable => "NavMesh_Walkable",
            NavMeshKind::Blocked => "NavMesh_Blocked",
        }
    }
}

/// The capabilities nav-mesh generation needs from the scene it runs in.
///
/// The host is borrowed mutably for a whole generation or export run. Scene graphs providing ray casts are
/// usually bound to a single thread, so the pipeline never calls into the host from more than one thread.
///
/// See [crate::parry::ParrySceneHost] for an implementation backed by `parry3d` shapes.
pub trait SceneHost {
    /// Handle identifying a surface (object) in the scene.
    type Surface: Copy + Eq + Hash + Debug;

    /// Casts a ray against the full scene and returns the nearest hit.
    ///
    /// ``direction`` is normalized. A ``max_distance`` of ``None`` means the ray is unbounded.
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: Option<f32>,
    ) -> Option<RayHit<Self::Surface>>;

    /// Vertices & world transform of ``surface``. ``None`` if the host doesn't know the surface.
    fn surface_geometry(&self, surface: Self::Surface) -> Option<SurfaceGeometry>;

    /// Creates (or replaces) the generated mesh of ``kind`` in the scene.
    fn emit_nav_mesh(&mut self, kind: NavMeshKind, mesh: &TriangleMesh);

    /// Reads back the generated mesh of ``kind``, if present.
    fn nav_mesh(&self, kind: NavMeshKind) -> Option<TriangleMesh>;

    /// Removes all generated meshes from the scene.
    fn clear_nav_meshes(&mut self);

    /// Simplifies a copy of ``mesh`` keeping roughly ``keep_ratio`` of its triangles.
    ///
    /// Returns ``None`` if the host has no simplification available.
    fn simplify_mesh(&mut self, _mesh: &TriangleMesh, _keep_ratio: f32) -> Option<TriangleMesh> {
        None
    }

    /// Writes ``content`` to ``path``.
    fn write_text(&mut self, path: &Path, content: &str) -> std::io::Result<()> {
        std::fs::write(path, content)
    }

    /// Called roughly every 10% of the sampling sweep with the completed percentage.
    fn sampling_progress(&mut self, _percent: f32) {}
}
