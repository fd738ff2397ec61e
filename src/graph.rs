//! An undirected planar graph over [`Point`]s.
use crate::error::{MeshError, Result};
use crate::point::*;
use crate::predicates::{collinear, Edge};
use slab::Slab;
use std::collections::HashMap;

/// An offset into the vertex slab. Stable for the lifetime of the vertex.
pub type VertexIndex = usize;

#[derive(Clone, Debug, PartialEq)]
pub struct Vertex {
    pub point: Point,
    pub neighbours: Vec<VertexIndex>,
}

/// Vertices are deduplicated by coordinate: adding a point equal to an
/// existing vertex refers to that vertex. Adjacency is kept symmetric, with no
/// self-loops and no parallel edges.
#[derive(Clone, Debug, Default)]
pub struct PlanarGraph {
    vertices: Slab<Vertex>,
    lookup: HashMap<Point, VertexIndex>,
}

impl PlanarGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index_of(&self, p: Point) -> Option<VertexIndex> {
        self.lookup.get(&p).copied()
    }

    pub fn contains_vertex(&self, p: Point) -> bool {
        self.lookup.contains_key(&p)
    }

    fn require(&self, p: Point) -> Result<VertexIndex> {
        self.index_of(p).ok_or(MeshError::MissingVertex(p))
    }

    /// Add a vertex, returning true if it was not already present.
    pub fn add_vertex(&mut self, p: Point) -> Result<bool> {
        if !p.is_finite() {
            return Err(MeshError::NonFinitePoint(p));
        }
        if self.lookup.contains_key(&p) {
            return Ok(false);
        }
        let i = self.vertices.insert(Vertex {
            point: p,
            neighbours: Vec::new(),
        });
        self.lookup.insert(p, i);
        Ok(true)
    }

    /// Connect two existing vertices, returning true if the edge is new.
    pub fn add_edge(&mut self, p1: Point, p2: Point) -> Result<bool> {
        let i1 = self.require(p1)?;
        let i2 = self.require(p2)?;
        if i1 == i2 {
            return Err(MeshError::SelfLoop(p1));
        }
        if self.vertices[i1].neighbours.contains(&i2) {
            return Ok(false);
        }
        self.vertices[i1].neighbours.push(i2);
        self.vertices[i2].neighbours.push(i1);
        Ok(true)
    }

    pub fn add_edge_and_vertices(&mut self, p1: Point, p2: Point) -> Result<bool> {
        if p1 == p2 {
            return Err(MeshError::SelfLoop(p1));
        }
        self.add_vertex(p1)?;
        self.add_vertex(p2)?;
        self.add_edge(p1, p2)
    }

    /// Disconnect two vertices, returning true if they were connected.
    pub fn remove_edge(&mut self, p1: Point, p2: Point) -> bool {
        let (i1, i2) = match (self.index_of(p1), self.index_of(p2)) {
            (Some(i1), Some(i2)) => (i1, i2),
            _ => return false,
        };
        let before = self.vertices[i1].neighbours.len();
        self.vertices[i1].neighbours.retain(|&n| n != i2);
        self.vertices[i2].neighbours.retain(|&n| n != i1);
        before != self.vertices[i1].neighbours.len()
    }

    /// Remove a vertex that no longer has any edges.
    pub fn remove_vertex(&mut self, p: Point) -> Result<()> {
        let i = self.require(p)?;
        let degree = self.vertices[i].neighbours.len();
        if degree != 0 {
            return Err(MeshError::VertexHasEdges(p, degree));
        }
        self.vertices.remove(i);
        self.lookup.remove(&p);
        Ok(())
    }

    /// Remove a vertex along with every edge attached to it.
    pub fn safe_remove_vertex(&mut self, p: Point) -> Result<()> {
        let i = self.require(p)?;
        let neighbours = std::mem::take(&mut self.vertices[i].neighbours);
        for n in neighbours {
            self.vertices[n].neighbours.retain(|&m| m != i);
        }
        self.remove_vertex(p)
    }

    pub fn is_connected(&self, p1: Point, p2: Point) -> bool {
        match (self.index_of(p1), self.index_of(p2)) {
            (Some(i1), Some(i2)) => self.vertices[i1].neighbours.contains(&i2),
            _ => false,
        }
    }

    pub fn neighbours(&self, p: Point) -> Result<Vec<Point>> {
        let i = self.require(p)?;
        Ok(self.vertices[i]
            .neighbours
            .iter()
            .map(|&n| self.vertices[n].point)
            .collect())
    }

    pub fn degree(&self, p: Point) -> Result<usize> {
        let i = self.require(p)?;
        Ok(self.vertices[i].neighbours.len())
    }

    /// Points adjacent to both `p1` and `p2`.
    pub fn common_neighbours(&self, p1: Point, p2: Point) -> Result<Vec<Point>> {
        let i1 = self.require(p1)?;
        let i2 = self.require(p2)?;
        let n2 = &self.vertices[i2].neighbours;
        Ok(self.vertices[i1]
            .neighbours
            .iter()
            .filter(|n| n2.contains(n))
            .map(|&n| self.vertices[n].point)
            .collect())
    }

    pub fn vertices(&self) -> impl Iterator<Item = Point> + '_ {
        self.vertices.iter().map(|(_, v)| v.point)
    }

    /// Every edge once, regardless of direction.
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges = Vec::new();
        for (i, v) in self.vertices.iter() {
            for &n in v.neighbours.iter() {
                if i < n {
                    edges.push(Edge::new(v.point, self.vertices[n].point));
                }
            }
        }
        edges
    }

    pub fn num_edges(&self) -> usize {
        self.vertices
            .iter()
            .map(|(_, v)| v.neighbours.len())
            .sum::<usize>()
            / 2
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Edges lying on the infinite line through `e`.
    pub fn edges_in_line_with(&self, e: Edge) -> Vec<Edge> {
        self.edges()
            .into_iter()
            .filter(|f| collinear(e.p1, e.p2, f.p1) && collinear(e.p1, e.p2, f.p2))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn num_edges() {
        let mut g = PlanarGraph::new();
        g.add_edge_and_vertices(p(0.0, 0.0), p(1.0, 0.0)).unwrap();
        g.add_edge_and_vertices(p(0.0, 0.0), p(-1.0, 0.0)).unwrap();
        g.add_edge_and_vertices(p(0.0, 0.0), p(0.0, -1.0)).unwrap();
        g.add_edge_and_vertices(p(0.0, 0.0), p(0.0, 1.0)).unwrap();
        assert_eq!(g.num_edges(), 4);
        assert_eq!(g.edges().len(), 4);
        assert_eq!(g.num_vertices(), 5);
    }

    #[test]
    fn edges_in_line_with() {
        let mut g = PlanarGraph::new();
        g.add_edge_and_vertices(p(2.0, 1.0), p(3.0, 2.0)).unwrap();
        g.add_edge_and_vertices(p(2.0, 2.0), p(3.0, 3.0)).unwrap();
        g.add_edge_and_vertices(p(-1.0, 1.0), p(-1.0, 2.0)).unwrap();
        g.add_edge_and_vertices(p(-2.0, 1.0), p(-2.0, 0.0)).unwrap();
        g.add_edge_and_vertices(p(-2.0, -1.0), p(-2.0, 0.0)).unwrap();
        g.add_edge_and_vertices(p(0.0, -1.0), p(-2.0, -3.0)).unwrap();
        g.add_edge_and_vertices(p(-4.0, -5.0), p(-3.0, -4.0)).unwrap();
        g.add_edge_and_vertices(p(0.0, -3.0), p(3.0, -3.0)).unwrap();
        let count = |a: Point, b: Point| g.edges_in_line_with(Edge::new(a, b)).len();
        assert_eq!(count(p(2.0, 1.0), p(3.0, 2.0)), 3);
        assert_eq!(count(p(-1.0, 0.0), p(-1.0, -1.0)), 1);
        assert_eq!(count(p(-2.0, 0.0), p(-2.0, -1.0)), 2);
        assert_eq!(count(p(-3.0, 0.0), p(-2.0, -1.0)), 0);
        assert_eq!(count(p(-3.0, -3.0), p(-2.0, -3.0)), 1);
    }

    #[test]
    fn idempotent_operations() {
        let mut g = PlanarGraph::new();
        assert_eq!(g.add_vertex(p(0.0, 0.0)), Ok(true));
        assert_eq!(g.add_vertex(p(0.0, 0.0)), Ok(false));
        assert_eq!(g.add_edge_and_vertices(p(0.0, 0.0), p(1.0, 1.0)), Ok(true));
        assert_eq!(g.add_edge(p(1.0, 1.0), p(0.0, 0.0)), Ok(false));
        assert_eq!(g.num_edges(), 1);
        assert!(g.remove_edge(p(1.0, 1.0), p(0.0, 0.0)));
        assert!(!g.remove_edge(p(1.0, 1.0), p(0.0, 0.0)));
        assert_eq!(g.num_edges(), 0);
    }

    #[test]
    fn rejects_bad_input() {
        let mut g = PlanarGraph::new();
        g.add_vertex(p(0.0, 0.0)).unwrap();
        assert_eq!(
            g.add_edge(p(0.0, 0.0), p(0.0, 0.0)),
            Err(MeshError::SelfLoop(p(0.0, 0.0)))
        );
        assert_eq!(
            g.add_edge(p(0.0, 0.0), p(5.0, 0.0)),
            Err(MeshError::MissingVertex(p(5.0, 0.0)))
        );
        assert!(matches!(
            g.add_vertex(p(f64::NAN, 0.0)),
            Err(MeshError::NonFinitePoint(_))
        ));
        assert_eq!(
            g.neighbours(p(9.0, 9.0)),
            Err(MeshError::MissingVertex(p(9.0, 9.0)))
        );
    }

    #[test]
    fn vertex_removal() {
        let mut g = PlanarGraph::new();
        g.add_edge_and_vertices(p(0.0, 0.0), p(1.0, 0.0)).unwrap();
        g.add_edge_and_vertices(p(0.0, 0.0), p(0.0, 1.0)).unwrap();
        assert_eq!(
            g.remove_vertex(p(0.0, 0.0)),
            Err(MeshError::VertexHasEdges(p(0.0, 0.0), 2))
        );
        g.safe_remove_vertex(p(0.0, 0.0)).unwrap();
        assert!(!g.contains_vertex(p(0.0, 0.0)));
        assert_eq!(g.num_edges(), 0);
        assert_eq!(g.neighbours(p(1.0, 0.0)), Ok(vec![]));
        g.remove_vertex(p(1.0, 0.0)).unwrap();
        assert_eq!(g.num_vertices(), 1);
    }

    #[quickcheck]
    fn adjacency_stays_symmetric(edges: Vec<(Point, Point)>, removals: Vec<usize>) -> bool {
        let mut g = PlanarGraph::new();
        for (a, b) in edges.iter() {
            let _ = g.add_edge_and_vertices(*a, *b);
        }
        for r in removals {
            if let Some((a, b)) = edges.get(r % (edges.len() + 1)) {
                g.remove_edge(*a, *b);
            }
        }
        let distinct: std::collections::HashSet<Edge> = g.edges().into_iter().collect();
        g.vertices().all(|v| {
            g.neighbours(v)
                .unwrap()
                .iter()
                .all(|n| *n != v && g.neighbours(*n).unwrap().contains(&v))
        }) && distinct.len() == g.num_edges()
    }
}
