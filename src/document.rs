//! The exported nav-mesh document & its JSON representation.
//!
//! ```text
//! {
//!   "version": "1.0",
//!   "agent_radius": 0.5,
//!   "agent_height": 2.0,
//!   "vertices": [ { "x": 0.0, "y": 0.0, "z": 0.0 }, ... ],
//!   "triangles": [ { "indices": [0, 2, 3], "center": { "x": .., "y": .., "z": .. } }, ... ],
//!   "adjacency": { "0": [1], "1": [0], ... }
//! }
//! ```
use bevy::{log::warn, prelude::Vec3};
use serde::{Deserialize, Serialize};

use crate::{
    adjacency::AdjacencyGraph,
    error::{NavGridError, NavGridResult},
    mesher::VERTICES_IN_TRIANGLE,
};

pub const NAV_MESH_DOCUMENT_VERSION: &str = "1.0";

/// Point as written to the document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<Vec3> for DocumentPoint {
    fn from(value: Vec3) -> Self {
        Self {
            x: value.x,
            y: value.y,
            z: value.z,
        }
    }
}

impl From<DocumentPoint> for Vec3 {
    fn from(value: DocumentPoint) -> Self {
        Vec3::new(value.x, value.y, value.z)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentTriangle {
    pub indices: [u32; VERTICES_IN_TRIANGLE],
    /// Centroid of the triangle, in the same convention as the vertices.
    pub center: DocumentPoint,
}

/// A walkable nav-mesh ready to be consumed by a game engine.
///
/// Created fresh for every export.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavMeshDocument {
    pub version: String,
    pub agent_radius: f32,
    pub agent_height: f32,
    pub vertices: Vec<DocumentPoint>,
    pub triangles: Vec<DocumentTriangle>,
    pub adjacency: AdjacencyGraph,
}

impl NavMeshDocument {
    /// Serializes the document. ``compact`` leaves out all insignificant whitespace, otherwise it's indented with
    /// 2 spaces.
    pub fn to_json(&self, compact: bool) -> NavGridResult<String> {
        let json = if compact {
            serde_json::to_string(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };

        Ok(json)
    }

    /// Parses & validates a document.
    pub fn from_json(json: &str) -> NavGridResult<Self> {
        let document: NavMeshDocument = serde_json::from_str(json)?;

        if document.version != NAV_MESH_DOCUMENT_VERSION {
            warn!(
                "Nav-mesh document has version {}, expected {}. Attempting to read it anyway.",
                document.version, NAV_MESH_DOCUMENT_VERSION
            );
        }

        document.validate()?;

        Ok(document)
    }

    /// Checks that triangles only reference existing vertices & that the adjacency is symmetric and in range.
    pub fn validate(&self) -> NavGridResult<()> {
        for (i, triangle) in self.triangles.iter().enumerate() {
            if let Some(index) = triangle
                .indices
                .iter()
                .find(|index| **index as usize >= self.vertices.len())
            {
                return Err(NavGridError::InvalidDocument(format!(
                    "triangle {i} references vertex {index} but there are only {} vertices",
                    self.vertices.len()
                )));
            }
        }

        for (triangle, neighbours) in self.adjacency.iter() {
            if triangle as usize >= self.triangles.len() {
                return Err(NavGridError::InvalidDocument(format!(
                    "adjacency lists triangle {triangle} but there are only {} triangles",
                    self.triangles.len()
                )));
            }
            if let Some(neighbour) = neighbours
                .iter()
                .find(|neighbour| **neighbour as usize >= self.triangles.len() || **neighbour == triangle)
            {
                return Err(NavGridError::InvalidDocument(format!(
                    "triangle {triangle} has invalid neighbour {neighbour}"
                )));
            }
        }

        if let Some((a, b)) = self.adjacency.find_asymmetry() {
            return Err(NavGridError::InvalidDocument(format!(
                "triangle {b} lists {a} as a neighbour but not the other way around"
            )));
        }

        Ok(())
    }

    /// Vertex positions of ``triangle``.
    pub fn triangle_vertices(&self, triangle: &DocumentTriangle) -> [Vec3; VERTICES_IN_TRIANGLE] {
        triangle
            .indices
            .map(|index| self.vertices[index as usize].into())
    }
}
