use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::mesher::VERTICES_IN_TRIANGLE;

/// Neighbours of a triangle. Grid meshes have at most 3, simplified meshes may have more.
pub type Neighbours = SmallVec<[u32; VERTICES_IN_TRIANGLE]>;

/// Triangle to triangle adjacency via shared edges.
///
/// Every triangle of the mesh has an entry, neighbour lists are sorted & free of duplicates. Serializes as a map
/// from the decimal triangle index to its neighbours.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdjacencyGraph(BTreeMap<u32, Neighbours>);

impl AdjacencyGraph {
    /// Neighbours of ``triangle``. Empty if the triangle has none or isn't part of the graph.
    pub fn neighbours(&self, triangle: u32) -> &[u32] {
        self.0
            .get(&triangle)
            .map(|neighbours| neighbours.as_slice())
            .unwrap_or_default()
    }

    /// Amount of triangles with an entry.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &[u32])> + '_ {
        self.0
            .iter()
            .map(|(triangle, neighbours)| (*triangle, neighbours.as_slice()))
    }

    /// Finds a pair ``(a, b)`` where ``b`` lists ``a`` as a neighbour but not the other way around.
    pub fn find_asymmetry(&self) -> Option<(u32, u32)> {
        self.iter().find_map(|(triangle, neighbours)| {
            neighbours
                .iter()
                .find(|neighbour| !self.neighbours(**neighbour).contains(&triangle))
                .map(|neighbour| (*neighbour, triangle))
        })
    }
}

#[derive(Debug)]
struct Edge {
    // The vertices that make up this edge, lowest first.
    vertices: [u32; 2],
    // The triangles that share this edge.
    triangles: SmallVec<[u32; 2]>,
}

/// Builds the adjacency graph of ``triangles``.
///
/// Two triangles are neighbours if they share an undirected edge. Every edge only exists once in the edge list &
/// all triangles containing it are recorded on it, so the relation comes out symmetric.
pub fn build_adjacency(triangles: &[[u32; VERTICES_IN_TRIANGLE]]) -> AdjacencyGraph {
    let vertex_count = triangles
        .iter()
        .flatten()
        .max()
        .map_or(0, |max| *max as usize + 1);
    let max_edge_count = triangles.len() * VERTICES_IN_TRIANGLE;

    // Edges are bucketed by their lowest vertex, chained through ``next_edge``.
    let mut first_edge: Vec<Option<usize>> = vec![None; vertex_count];
    let mut next_edge: Vec<Option<usize>> = vec![None; max_edge_count];
    let mut edges: Vec<Edge> = Vec::with_capacity(max_edge_count);
    let mut triangle_edges = Vec::with_capacity(triangles.len());

    for (i, indices) in triangles.iter().enumerate() {
        let mut own_edges = [0; VERTICES_IN_TRIANGLE];

        for (j, current) in indices.iter().enumerate() {
            let next = indices[(j + 1) % indices.len()];
            let vertices = [(*current).min(next), (*current).max(next)];

            let mut edge_iter = first_edge[vertices[0] as usize];
            let existing = loop {
                let Some(edge_index) = edge_iter else {
                    break None;
                };
                if edges[edge_index].vertices == vertices {
                    break Some(edge_index);
                }
                edge_iter = next_edge[edge_index];
            };

            let edge_index = existing.unwrap_or_else(|| {
                let edge_index = edges.len();
                next_edge[edge_index] = first_edge[vertices[0] as usize];
                first_edge[vertices[0] as usize] = Some(edge_index);
                edges.push(Edge {
                    vertices,
                    triangles: SmallVec::new(),
                });

                edge_index
            });

            let edge = &mut edges[edge_index];
            if !edge.triangles.contains(&(i as u32)) {
                edge.triangles.push(i as u32);
            }
            own_edges[j] = edge_index;
        }

        triangle_edges.push(own_edges);
    }

    let adjacency = triangle_edges
        .iter()
        .enumerate()
        .map(|(i, own_edges)| {
            let mut neighbours: Neighbours = own_edges
                .iter()
                .flat_map(|edge_index| edges[*edge_index].triangles.iter().copied())
                .filter(|triangle| *triangle != i as u32)
                .collect();
            neighbours.sort_unstable();
            neighbours.dedup();

            (i as u32, neighbours)
        })
        .collect();

    AdjacencyGraph(adjacency)
}
