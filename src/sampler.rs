use bevy::{
    log::{debug, info},
    platform::collections::HashSet,
    prelude::{UVec2, Vec3},
};

use crate::{bounds::BoundingBox, grid::SampleGrid, host::SceneHost, NavGridSettings};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    /// Nothing from the wall set within agent height above the ground.
    Walkable,
    /// A wall surface is within agent height above the ground.
    Blocked,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplePoint {
    /// Where the downward ray hit the ground.
    pub position: Vec3,
    pub classification: Classification,
}

/// Output of [sample_grid]. Both lists keep the order of the sweep.
#[derive(Default, Debug)]
pub struct GridSamples {
    pub walkable: Vec<Vec3>,
    pub blocked: Vec<Vec3>,
}

impl GridSamples {
    fn push(&mut self, sample: SamplePoint) {
        match sample.classification {
            Classification::Walkable => self.walkable.push(sample.position),
            Classification::Blocked => self.blocked.push(sample.position),
        }
    }
}

/// Classifies the single grid ``cell``.
///
/// Returns ``None`` if the downward ray misses or hits anything but the ground, in which case the cell produces no
/// sample at all.
pub fn classify_cell<H: SceneHost>(
    host: &H,
    grid: &SampleGrid,
    cell: UVec2,
    probe_z: f32,
    ground: H::Surface,
    walls: &HashSet<H::Surface>,
    nav_grid_settings: &NavGridSettings,
) -> Option<SamplePoint> {
    let position = grid.cell_position(cell);

    let ground_hit = host.raycast(position.extend(probe_z), Vec3::NEG_Z, None)?;
    if ground_hit.surface != ground {
        return None;
    }

    let clearance_start = ground_hit.position + Vec3::Z * nav_grid_settings.clearance_offset;
    let blocked = host
        .raycast(
            clearance_start,
            Vec3::Z,
            Some(nav_grid_settings.agent_height),
        )
        .is_some_and(|hit| walls.contains(&hit.surface));

    Some(SamplePoint {
        position: ground_hit.position,
        classification: if blocked {
            Classification::Blocked
        } else {
            Classification::Walkable
        },
    })
}

/// Sweeps every cell of ``grid`` and classifies it.
///
/// Runs on the calling thread until the sweep is complete. Progress is reported every 10% of the cells.
pub fn sample_grid<H: SceneHost>(
    host: &mut H,
    grid: &SampleGrid,
    bounds: &BoundingBox,
    ground: H::Surface,
    walls: &HashSet<H::Surface>,
    nav_grid_settings: &NavGridSettings,
) -> GridSamples {
    let probe_z = bounds.max.z + nav_grid_settings.probe_height;

    let total_samples = grid.sample_count();
    let progress_interval = (total_samples / 10).max(1);

    let mut samples = GridSamples::default();
    for (i, cell) in grid.cells().enumerate() {
        let sample_count = i + 1;
        if sample_count % progress_interval == 0 {
            let percent = sample_count as f32 / total_samples as f32 * 100.0;
            info!("Sampling: {percent:.0}%");
            host.sampling_progress(percent);
        }

        if let Some(sample) =
            classify_cell(host, grid, cell, probe_z, ground, walls, nav_grid_settings)
        {
            samples.push(sample);
        }
    }

    debug!(
        "Sampled {} cells: {} walkable, {} blocked.",
        total_samples,
        samples.walkable.len(),
        samples.blocked.len()
    );

    samples
}
