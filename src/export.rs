use bevy::prelude::Vec3;
use serde::{Deserialize, Serialize};

use crate::{
    adjacency::AdjacencyGraph,
    document::{DocumentPoint, DocumentTriangle, NavMeshDocument, NAV_MESH_DOCUMENT_VERSION},
    mesher::TriangleMesh,
    NavGridSettings,
};

/// How positions are converted when written to the document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordinateRemap {
    /// Z-up authoring space to Y-up engine space: ``(x, y, z) -> (x, z, y)``.
    #[default]
    SwapYZ,
    /// Positions are written as they are.
    Preserve,
}

impl CoordinateRemap {
    #[inline]
    pub fn apply(&self, position: Vec3) -> Vec3 {
        match self {
            CoordinateRemap::SwapYZ => Vec3::new(position.x, position.z, position.y),
            CoordinateRemap::Preserve => position,
        }
    }
}

/// Assembles the export document of the walkable ``mesh``.
///
/// Triangle centers are computed from the remapped vertices.
pub fn build_document(
    mesh: &TriangleMesh,
    adjacency: AdjacencyGraph,
    nav_grid_settings: &NavGridSettings,
) -> NavMeshDocument {
    let remap = nav_grid_settings.coordinate_remap;

    let remapped = TriangleMesh {
        vertices: mesh
            .vertices
            .iter()
            .map(|vertex| remap.apply(*vertex))
            .collect(),
        triangles: Vec::new(),
    };

    let triangles = mesh
        .triangles
        .iter()
        .map(|indices| DocumentTriangle {
            indices: *indices,
            center: remapped.triangle_center(indices).into(),
        })
        .collect();

    NavMeshDocument {
        version: NAV_MESH_DOCUMENT_VERSION.to_string(),
        agent_radius: nav_grid_settings.agent_radius,
        agent_height: nav_grid_settings.agent_height,
        vertices: remapped
            .vertices
            .into_iter()
            .map(DocumentPoint::from)
            .collect(),
        triangles,
        adjacency,
    }
}
