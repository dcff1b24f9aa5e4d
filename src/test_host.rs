//! Scripted [SceneHost] made of axis-aligned boxes, used by unit tests.
//!
//! Only vertical rays are supported, which is all the sampler casts.

use std::path::{Path, PathBuf};

use bevy::{
    platform::collections::HashMap,
    prelude::{Transform, Vec3},
};

use crate::{
    host::{NavMeshKind, RayHit, SceneHost, SurfaceGeometry},
    mesher::TriangleMesh,
};

pub(crate) struct BoxSurface {
    pub id: u32,
    pub min: Vec3,
    pub max: Vec3,
}

#[derive(Default)]
pub(crate) struct BoxHost {
    pub surfaces: Vec<BoxSurface>,
    pub meshes: HashMap<NavMeshKind, TriangleMesh>,
    pub written: Vec<(PathBuf, String)>,
    pub progress: Vec<f32>,
    pub simplified: Option<TriangleMesh>,
    pub fail_writes: bool,
}

impl BoxHost {
    pub fn with_box(mut self, id: u32, min: Vec3, max: Vec3) -> Self {
        self.surfaces.push(BoxSurface { id, min, max });
        self
    }
}

impl SceneHost for BoxHost {
    type Surface = u32;

    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: Option<f32>,
    ) -> Option<RayHit<u32>> {
        let max_distance = max_distance.unwrap_or(f32::MAX);
        let downward = direction.z < 0.0;

        self.surfaces
            .iter()
            .filter(|surface| {
                origin.x >= surface.min.x
                    && origin.x <= surface.max.x
                    && origin.y >= surface.min.y
                    && origin.y <= surface.max.y
            })
            .filter_map(|surface| {
                let distance = if origin.z >= surface.min.z && origin.z <= surface.max.z {
                    0.0
                } else if downward && origin.z > surface.max.z {
                    origin.z - surface.max.z
                } else if !downward && origin.z < surface.min.z {
                    surface.min.z - origin.z
                } else {
                    return None;
                };

                (distance <= max_distance).then_some((distance, surface.id))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(distance, surface)| RayHit {
                position: origin + direction * distance,
                surface,
            })
    }

    fn surface_geometry(&self, surface: u32) -> Option<SurfaceGeometry> {
        let surface = self.surfaces.iter().find(|s| s.id == surface)?;

        Some(SurfaceGeometry {
            vertices: vec![surface.min, surface.max],
            transform: Transform::IDENTITY,
        })
    }

    fn emit_nav_mesh(&mut self, kind: NavMeshKind, mesh: &TriangleMesh) {
        self.meshes.insert(kind, mesh.clone());
    }

    fn nav_mesh(&self, kind: NavMeshKind) -> Option<TriangleMesh> {
        self.meshes.get(&kind).cloned()
    }

    fn clear_nav_meshes(&mut self) {
        self.meshes.clear();
    }

    fn simplify_mesh(&mut self, _mesh: &TriangleMesh, _keep_ratio: f32) -> Option<TriangleMesh> {
        self.simplified.clone()
    }

    fn write_text(&mut self, path: &Path, content: &str) -> std::io::Result<()> {
        if self.fail_writes {
            return Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            ));
        }

        self.written.push((path.to_path_buf(), content.to_string()));
        Ok(())
    }

    fn sampling_progress(&mut self, percent: f32) {
        self.progress.push(percent);
    }
}
