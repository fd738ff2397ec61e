//! The dual graph searched by path planning. There is one node per live
//! triangle, keyed by the triangle's index, and an edge wherever two triangles
//! share a side that is not fixed.
use crate::triangle::Polypoint;
use std::collections::BTreeMap;

use super::TriangleIndex;

#[derive(Clone, Debug, PartialEq)]
pub struct PolypointNode {
    pub polypoint: Polypoint,
    pub neighbours: Vec<TriangleIndex>,
}

#[derive(Clone, Debug, Default)]
pub struct PolypointGraph {
    nodes: BTreeMap<TriangleIndex, PolypointNode>,
}

impl PolypointGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, index: TriangleIndex, polypoint: Polypoint) {
        self.nodes.insert(
            index,
            PolypointNode {
                polypoint,
                neighbours: Vec::new(),
            },
        );
    }

    /// Remove a node and every dual edge touching it.
    pub(crate) fn remove(&mut self, index: TriangleIndex) -> Option<Polypoint> {
        let node = self.nodes.remove(&index)?;
        for n in node.neighbours.iter() {
            if let Some(other) = self.nodes.get_mut(n) {
                other.neighbours.retain(|&m| m != index);
            }
        }
        Some(node.polypoint)
    }

    pub(crate) fn connect(&mut self, a: TriangleIndex, b: TriangleIndex) -> bool {
        if a == b || !self.nodes.contains_key(&a) || !self.nodes.contains_key(&b) {
            return false;
        }
        if self.is_connected(a, b) {
            return false;
        }
        if let Some(node) = self.nodes.get_mut(&a) {
            node.neighbours.push(b);
        }
        if let Some(node) = self.nodes.get_mut(&b) {
            node.neighbours.push(a);
        }
        true
    }

    pub(crate) fn disconnect(&mut self, a: TriangleIndex, b: TriangleIndex) -> bool {
        let mut removed = false;
        if let Some(node) = self.nodes.get_mut(&a) {
            let before = node.neighbours.len();
            node.neighbours.retain(|&m| m != b);
            removed = before != node.neighbours.len();
        }
        if let Some(node) = self.nodes.get_mut(&b) {
            node.neighbours.retain(|&m| m != a);
        }
        removed
    }

    pub fn is_connected(&self, a: TriangleIndex, b: TriangleIndex) -> bool {
        self.nodes
            .get(&a)
            .map(|node| node.neighbours.contains(&b))
            .unwrap_or(false)
    }

    pub fn get(&self, index: TriangleIndex) -> Option<&Polypoint> {
        self.nodes.get(&index).map(|node| &node.polypoint)
    }

    pub fn neighbours(&self, index: TriangleIndex) -> Option<&[TriangleIndex]> {
        self.nodes.get(&index).map(|node| node.neighbours.as_slice())
    }

    /// The polypoints reachable from `index` in one step.
    pub fn neighbouring_polypoints(
        &self,
        index: TriangleIndex,
    ) -> impl Iterator<Item = (TriangleIndex, &Polypoint)> + '_ {
        self.neighbours(index)
            .unwrap_or(&[])
            .iter()
            .filter_map(move |n| self.get(*n).map(|pp| (*n, pp)))
    }

    pub fn polypoints(&self) -> impl Iterator<Item = (TriangleIndex, &Polypoint)> + '_ {
        self.nodes.iter().map(|(i, node)| (*i, &node.polypoint))
    }

    /// Every dual edge once, lower index first.
    pub fn edges(&self) -> Vec<(TriangleIndex, TriangleIndex)> {
        let mut edges = Vec::new();
        for (i, node) in self.nodes.iter() {
            for n in node.neighbours.iter() {
                if i < n {
                    edges.push((*i, *n));
                }
            }
        }
        edges
    }

    pub fn num_polypoints(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.nodes
            .values()
            .map(|node| node.neighbours.len())
            .sum::<usize>()
            / 2
    }
}
