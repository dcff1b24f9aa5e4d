//! Grid-sampled **Nav-mesh** Generation & Export for game engines.
//!
//! Samples a ground surface on a regular grid by casting rays against the scene, classifies every sample as walkable or
//! blocked by wall surfaces, then builds a triangle mesh with a triangle adjacency graph & exports it as a JSON
//! document ([document::NavMeshDocument]) a game engine can load for pathfinding.
//!
//! The scene itself is provided by the host through the [host::SceneHost] trait. With the default `parry3d` feature
//! [parry::ParrySceneHost] is available, which is a host backed by `parry3d` shapes.
//!
//! ## Quick-start:
//! **Nav-mesh generation:**
//! 1. Implement [host::SceneHost] for your scene, or use [parry::ParrySceneHost] and add your geometry to it.
//! 2. Create a [selection::SurfaceSelection] with the ground surface & any wall surfaces.
//! 3. Call [generate_nav_mesh] with your [NavGridSettings]. The walkable & blocked meshes are emitted to the host.
//!
//! **Export:**
//! 1. Call [export_nav_mesh]. This reads back the walkable mesh, optionally simplifies it through the host & writes the
//!    document to [NavGridSettings::export_path].
//! 2. In the engine, load the document with [document::NavMeshDocument::from_json] and use
//!    [document::NavMeshDocument::find_triangle_at] to find which triangle an agent is standing on.
//!
//! ## FAQ
//!
//! > Why are there no samples under my wall?
//!
//! The downward ray hits the first surface above the ground. If that's a wall (or anything else) the cell isn't
//! sampled at all. Only walls *above* the ground, within ``agent_height`` and above the probe origin, produce blocked
//! samples. Lower [NavGridSettings::probe_height] if your walls are floating obstacles like low ceilings.
//!
//! > Why is my exported mesh rotated?
//!
//! Generation works in a Z-up space and the export swaps Y & Z by default ([export::CoordinateRemap::SwapYZ]). Use
//! [export::CoordinateRemap::Preserve] if your engine is Z-up.

use std::path::PathBuf;

use bevy::{
    log::{debug, info, warn},
    prelude::Resource,
};
#[cfg(feature = "trace")]
use bevy::log::info_span;
use serde::{Deserialize, Serialize};

use adjacency::build_adjacency;
use bounds::BoundingBox;
use error::{NavGridError, NavGridResult};
use export::{build_document, CoordinateRemap};
use grid::SampleGrid;
use host::{NavMeshKind, SceneHost};
use mesher::build_triangle_mesh;
use sampler::sample_grid;
use selection::SurfaceSelection;

pub mod adjacency;
pub mod bounds;
pub mod document;
pub mod error;
pub mod export;
pub mod grid;
pub mod host;
pub mod mesher;
pub mod query;
pub mod sampler;
pub mod selection;
#[cfg(test)]
mod test_host;

cfg_if::cfg_if! {
    if #[cfg(feature = "parry3d")] {
        pub mod conversion;
        pub mod parry;

        pub use parry3d;
    }
}

/// Settings for nav-mesh generation & export.
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavGridSettings {
    /// Radius of the navigating agent. Carried to the exported document.
    pub agent_radius: f32,
    /// Height of the navigating agent.
    ///
    /// A sample is blocked if a wall is within this distance above the ground.
    pub agent_height: f32,

    /// Distance between samples on the XY-plane.
    ///
    /// **Suggested value**: The agent radius or smaller.
    ///
    /// Sampling cost grows quadratically as this gets smaller.
    pub cell_size: f32,

    /// How much to simplify the walkable mesh before export. ``0.0`` is none, ``1.0`` is max.
    ///
    /// Simplification is done by the host, see [SceneHost::simplify_mesh].
    pub simplify_ratio: f32,
    /// Where the exported document is written.
    pub export_path: PathBuf,
    /// Write the document without any insignificant whitespace.
    pub compact_json: bool,
    /// How positions are converted for the exported document.
    pub coordinate_remap: CoordinateRemap,

    /// How far above the top of the ground bounds the downward rays start.
    ///
    /// **Suggested value**: Just above the tallest wall surface that should still block.
    pub probe_height: f32,
    /// Offset above the ground hit the upward ray starts at, so it doesn't hit the ground itself.
    pub clearance_offset: f32,
}

impl Default for NavGridSettings {
    fn default() -> Self {
        Self {
            agent_radius: 0.5,
            agent_height: 2.0,
            cell_size: 1.0,
            simplify_ratio: 0.0,
            export_path: PathBuf::from("navmesh.json"),
            compact_json: false,
            coordinate_remap: CoordinateRemap::SwapYZ,
            probe_height: 10.0,
            clearance_offset: 0.1,
        }
    }
}

impl NavGridSettings {
    /// Helper function for creating settings from the size of your navigation agent. Everything else is default.
    #[inline]
    pub fn from_agent(agent_radius: f32, agent_height: f32) -> Self {
        Self {
            agent_radius,
            agent_height,
            ..Default::default()
        }
    }

    /// Setter for [`NavGridSettings::agent_radius`]
    pub fn with_agent_radius(mut self, agent_radius: f32) -> Self {
        self.agent_radius = agent_radius;

        self
    }
    /// Setter for [`NavGridSettings::agent_height`]
    pub fn with_agent_height(mut self, agent_height: f32) -> Self {
        self.agent_height = agent_height;

        self
    }
    /// Setter for [`NavGridSettings::cell_size`]
    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;

        self
    }
    /// Setter for [`NavGridSettings::simplify_ratio`]
    pub fn with_simplify_ratio(mut self, simplify_ratio: f32) -> Self {
        self.simplify_ratio = simplify_ratio;

        self
    }
    /// Setter for [`NavGridSettings::export_path`]
    pub fn with_export_path(mut self, export_path: impl Into<PathBuf>) -> Self {
        self.export_path = export_path.into();

        self
    }
    /// Setter for [`NavGridSettings::compact_json`]
    pub fn with_compact_json(mut self, compact_json: bool) -> Self {
        self.compact_json = compact_json;

        self
    }
    /// Setter for [`NavGridSettings::coordinate_remap`]
    pub fn with_coordinate_remap(mut self, coordinate_remap: CoordinateRemap) -> Self {
        self.coordinate_remap = coordinate_remap;

        self
    }
    /// Setter for [`NavGridSettings::probe_height`]
    pub fn with_probe_height(mut self, probe_height: f32) -> Self {
        self.probe_height = probe_height;

        self
    }
    /// Setter for [`NavGridSettings::clearance_offset`]
    pub fn with_clearance_offset(mut self, clearance_offset: f32) -> Self {
        self.clearance_offset = clearance_offset;

        self
    }

    /// Checks that every setting is within its accepted range.
    pub fn validate(&self) -> NavGridResult<()> {
        require_positive("agent_radius", self.agent_radius)?;
        require_positive("agent_height", self.agent_height)?;
        require_positive("cell_size", self.cell_size)?;
        require_positive("probe_height", self.probe_height)?;

        if !(self.clearance_offset.is_finite() && self.clearance_offset >= 0.0) {
            return Err(NavGridError::InvalidSettings {
                name: "clearance_offset",
                reason: format!("must be 0 or greater, got {}", self.clearance_offset),
            });
        }

        if !(0.0..=1.0).contains(&self.simplify_ratio) {
            return Err(NavGridError::InvalidSettings {
                name: "simplify_ratio",
                reason: format!("must be within [0, 1], got {}", self.simplify_ratio),
            });
        }

        Ok(())
    }
}

fn require_positive(name: &'static str, value: f32) -> NavGridResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(NavGridError::InvalidSettings {
            name,
            reason: format!("must be greater than 0, got {value}"),
        })
    }
}

/// Summary of a successful [generate_nav_mesh] run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Samples along X & Y.
    pub grid_width: u32,
    pub grid_height: u32,
    pub walkable_samples: usize,
    pub blocked_samples: usize,
    pub walkable_triangles: usize,
    pub blocked_triangles: usize,
}

/// Summary of a successful [export_nav_mesh] run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportReport {
    pub path: PathBuf,
    pub vertex_count: usize,
    pub triangle_count: usize,
}

/// Generates the walkable & blocked nav-meshes and emits them to ``host``.
///
/// Any previously generated meshes are removed first. If no walkable area is found the host is left without
/// nav-meshes.
pub fn generate_nav_mesh<H: SceneHost>(
    host: &mut H,
    selection: &SurfaceSelection<H::Surface>,
    nav_grid_settings: &NavGridSettings,
) -> NavGridResult<GenerationReport> {
    #[cfg(feature = "trace")]
    let _span = info_span!("Generate nav-mesh").entered();

    nav_grid_settings.validate()?;

    let ground = selection.ground().ok_or(NavGridError::GroundNotSet)?;

    let bounds = {
        #[cfg(feature = "trace")]
        let _span = info_span!("Calculate bounds").entered();

        host.surface_geometry(ground)
            .and_then(|geometry| BoundingBox::from_surface(&geometry.vertices, &geometry.transform))
            .ok_or(NavGridError::EmptyGround)?
    };

    if selection.walls().is_empty() {
        warn!("No walls registered. Every sampled cell will be walkable.");
    }

    host.clear_nav_meshes();

    info!(
        "Generating nav-mesh on {:?} with {} wall(s).",
        ground,
        selection.walls().len()
    );

    let grid = SampleGrid::from_bounds(&bounds, nav_grid_settings.cell_size);
    let samples = {
        #[cfg(feature = "trace")]
        let _span = info_span!("Sample grid").entered();

        sample_grid(
            host,
            &grid,
            &bounds,
            ground,
            &selection.wall_set(),
            nav_grid_settings,
        )
    };

    if samples.walkable.is_empty() {
        return Err(NavGridError::NoWalkableArea);
    }

    let walkable_mesh = {
        #[cfg(feature = "trace")]
        let _span = info_span!("Build walkable mesh").entered();

        build_triangle_mesh(&samples.walkable, &grid)
    };
    host.emit_nav_mesh(NavMeshKind::Walkable, &walkable_mesh);
    debug!(
        "Emitted {} ({} verts, {} tris).",
        NavMeshKind::Walkable.object_name(),
        walkable_mesh.vertices.len(),
        walkable_mesh.triangles.len()
    );

    let blocked_triangles = if samples.blocked.is_empty() {
        0
    } else {
        #[cfg(feature = "trace")]
        let _span = info_span!("Build blocked mesh").entered();

        let blocked_mesh = build_triangle_mesh(&samples.blocked, &grid);
        host.emit_nav_mesh(NavMeshKind::Blocked, &blocked_mesh);
        debug!(
            "Emitted {} ({} verts, {} tris).",
            NavMeshKind::Blocked.object_name(),
            blocked_mesh.vertices.len(),
            blocked_mesh.triangles.len()
        );

        blocked_mesh.triangles.len()
    };

    let report = GenerationReport {
        grid_width: grid.width,
        grid_height: grid.height,
        walkable_samples: samples.walkable.len(),
        blocked_samples: samples.blocked.len(),
        walkable_triangles: walkable_mesh.triangles.len(),
        blocked_triangles,
    };

    info!(
        "NavMesh generated: {} walkable & {} blocked samples, {} walkable triangles.",
        report.walkable_samples, report.blocked_samples, report.walkable_triangles
    );

    Ok(report)
}

/// Exports the walkable nav-mesh of ``host`` to [NavGridSettings::export_path].
///
/// The document is fully built & serialized before anything is written.
pub fn export_nav_mesh<H: SceneHost>(
    host: &mut H,
    nav_grid_settings: &NavGridSettings,
) -> NavGridResult<ExportReport> {
    #[cfg(feature = "trace")]
    let _span = info_span!("Export nav-mesh").entered();

    nav_grid_settings.validate()?;

    let walkable_mesh = host
        .nav_mesh(NavMeshKind::Walkable)
        .ok_or(NavGridError::NoWalkableMesh)?;
    if walkable_mesh.is_empty() {
        warn!(
            "{} has no triangles. Exporting its {} vertices without triangles.",
            NavMeshKind::Walkable.object_name(),
            walkable_mesh.vertices.len()
        );
    }

    let mesh = if nav_grid_settings.simplify_ratio > 0.0 {
        info!(
            "Simplifying mesh (ratio: {:.2})...",
            nav_grid_settings.simplify_ratio
        );

        match host.simplify_mesh(&walkable_mesh, 1.0 - nav_grid_settings.simplify_ratio) {
            Some(simplified) => {
                if let Some((triangle, index)) = simplified.find_invalid_index() {
                    return Err(NavGridError::InvalidSimplifiedMesh {
                        triangle,
                        index,
                        vertex_count: simplified.vertices.len(),
                    });
                }

                simplified
            }
            None => {
                warn!("Host can't simplify meshes. Exporting the mesh as is.");
                walkable_mesh
            }
        }
    } else {
        walkable_mesh
    };

    let adjacency = {
        #[cfg(feature = "trace")]
        let _span = info_span!("Build adjacency").entered();

        build_adjacency(&mesh.triangles)
    };

    let json = {
        #[cfg(feature = "trace")]
        let _span = info_span!("Serialize document").entered();

        build_document(&mesh, adjacency, nav_grid_settings).to_json(nav_grid_settings.compact_json)?
    };

    let path = &nav_grid_settings.export_path;
    host.write_text(path, &json)
        .map_err(|source| NavGridError::Io {
            path: path.clone(),
            source,
        })?;

    info!(
        "NavMesh exported: {} ({} verts, {} tris)",
        path.display(),
        mesh.vertices.len(),
        mesh.triangles.len()
    );

    Ok(ExportReport {
        path: path.clone(),
        vertex_count: mesh.vertices.len(),
        triangle_count: mesh.triangles.len(),
    })
}

/// Removes the generated nav-meshes from ``host``.
pub fn clear_nav_mesh<H: SceneHost>(host: &mut H) {
    host.clear_nav_meshes();

    info!("NavMesh cleared.");
}
