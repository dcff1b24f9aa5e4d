//! Error types for nav-mesh generation and export.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that end a generation or export run.
#[derive(Debug, Error)]
pub enum NavGridError {
    /// No ground surface has been selected.
    #[error("Ground object not set")]
    GroundNotSet,

    /// The ground surface is unknown to the host or has no vertices.
    #[error("Ground object has no vertices")]
    EmptyGround,

    /// A setting is outside of its accepted range.
    #[error("Invalid setting `{name}`: {reason}")]
    InvalidSettings {
        name: &'static str,
        reason: String,
    },

    /// The sweep finished without a single walkable sample.
    #[error("No walkable areas found")]
    NoWalkableArea,

    /// Export was requested before a walkable nav-mesh was generated.
    #[error("No walkable navmesh found. Generate navmesh first.")]
    NoWalkableMesh,

    /// The host returned a simplified mesh referencing vertices it doesn't have.
    #[error(
        "Simplified mesh is invalid: triangle {triangle} references vertex {index} but the mesh only has {vertex_count} vertices"
    )]
    InvalidSimplifiedMesh {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },

    /// A loaded document breaks one of the document invariants.
    #[error("Invalid nav-mesh document: {0}")]
    InvalidDocument(String),

    /// (De)serializing the document failed.
    #[error("Nav-mesh document serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Writing the document failed.
    #[error("Failed to write nav-mesh to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for nav-mesh generation and export.
pub type NavGridResult<T> = std::result::Result<T, NavGridError>;
