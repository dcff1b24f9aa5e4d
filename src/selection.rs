use std::{fmt::Debug, hash::Hash};

use bevy::platform::collections::HashSet;

/// Which surfaces act as ground & walls.
///
/// Walls keep the order they were added in and never contain duplicates or the ground.
#[derive(Clone, Debug)]
pub struct SurfaceSelection<S> {
    ground: Option<S>,
    walls: Vec<S>,
}

impl<S> Default for SurfaceSelection<S> {
    fn default() -> Self {
        Self {
            ground: None,
            walls: Vec::new(),
        }
    }
}

impl<S: Copy + Eq + Hash + Debug> SurfaceSelection<S> {
    pub fn new(ground: S) -> Self {
        Self {
            ground: Some(ground),
            walls: Vec::new(),
        }
    }

    pub fn ground(&self) -> Option<S> {
        self.ground
    }

    /// Sets the ground surface. If it was registered as a wall it stops being one.
    pub fn set_ground(&mut self, ground: S) {
        self.walls.retain(|wall| *wall != ground);
        self.ground = Some(ground);
    }

    pub fn walls(&self) -> &[S] {
        &self.walls
    }

    /// Adds ``walls``, skipping ones already added & the ground. Returns how many were added.
    pub fn add_walls(&mut self, walls: impl IntoIterator<Item = S>) -> usize {
        let before = self.walls.len();

        for wall in walls {
            if Some(wall) != self.ground && !self.walls.contains(&wall) {
                self.walls.push(wall);
            }
        }

        self.walls.len() - before
    }

    /// Builder variant of [SurfaceSelection::add_walls].
    pub fn with_walls(mut self, walls: impl IntoIterator<Item = S>) -> Self {
        self.add_walls(walls);

        self
    }

    /// Removes the wall at ``index``. Returns the removed wall, if there was one at that index.
    pub fn remove_wall(&mut self, index: usize) -> Option<S> {
        (index < self.walls.len()).then(|| self.walls.remove(index))
    }

    pub fn clear_walls(&mut self) {
        self.walls.clear();
    }

    /// Walls as a set for membership tests during sampling.
    pub fn wall_set(&self) -> HashSet<S> {
        self.walls.iter().copied().collect()
    }
}
