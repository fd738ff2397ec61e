//! A constrained Delaunay triangulation that is patched in place as the map
//! changes, along with the polypoint dual graph that path planning searches.
use crate::config::MeshConfig;
use crate::error::{MeshError, Result};
use crate::graph::PlanarGraph;
use crate::point::*;
use crate::predicates::*;
use crate::triangle::{Location, Polypoint, Triangle, TriangleKey};
use log::debug;
use slab::Slab;
use std::collections::HashMap;

mod constraint;
mod insert;
mod polypoint;
mod remove;
#[cfg(feature = "serialize")]
mod snapshot;

pub use polypoint::*;
#[cfg(feature = "serialize")]
pub use snapshot::*;

/// An offset into the triangle slab. Stable while the triangle is live; may be
/// reused once it is removed.
pub type TriangleIndex = usize;

/// The navigation mesh: a planar graph of vertices and edges, the triangles
/// covering it, the subgraph of fixed (impassable) edges, and the dual graph
/// of polypoints.
///
/// After every completed mutation:
///  - every triangle has positive area and no vertex lies inside a triangle it
///    is not a corner of,
///  - every edge borders one or two triangles,
///  - every edge that is not fixed is Delaunay-legal,
///  - fixed edges are only removed by [`TriangleGraph::remove_fixed_edge`],
///  - there is one polypoint per triangle and one dual edge per pair of
///    triangles sharing a side that is not fixed.
#[derive(Clone, Debug)]
pub struct TriangleGraph {
    graph: PlanarGraph,
    triangles: Slab<Triangle>,
    lookup: HashMap<TriangleKey, TriangleIndex>,
    fixed: PlanarGraph,
    polypoints: PolypointGraph,
    config: MeshConfig,
}

impl Default for TriangleGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl TriangleGraph {
    pub fn new() -> Self {
        Self::with_config(MeshConfig::default())
    }

    pub fn with_config(config: MeshConfig) -> Self {
        Self {
            graph: PlanarGraph::new(),
            triangles: Slab::new(),
            lookup: HashMap::new(),
            fixed: PlanarGraph::new(),
            polypoints: PolypointGraph::new(),
            config,
        }
    }

    /// Build a mesh over a convex boundary and then insert the constraint
    /// edges (and their endpoints) into it.
    pub fn build(boundary: &[Point], constraints: &[Edge]) -> Result<Self> {
        Self::build_with_config(boundary, constraints, MeshConfig::default())
    }

    pub fn build_with_config(
        boundary: &[Point],
        constraints: &[Edge],
        config: MeshConfig,
    ) -> Result<Self> {
        let mut mesh = Self::with_config(config);
        let mut ring: Vec<Point> = Vec::with_capacity(boundary.len());
        for p in boundary.iter() {
            let p = mesh.prepare(*p);
            if !p.is_finite() {
                return Err(MeshError::NonFinitePoint(p));
            }
            if !ring.contains(&p) {
                ring.push(p);
            }
        }
        radial_sort(&mut ring, None);
        if !is_convex_ring(&ring) {
            return Err(MeshError::NonConvexBoundary);
        }
        for (i, p) in ring.iter().enumerate() {
            mesh.graph
                .add_edge_and_vertices(*p, ring[(i + 1) % ring.len()])?;
        }
        mesh.triangulate_region(&ring)?;
        for e in constraints.iter() {
            for p in [e.p1, e.p2].iter() {
                let p = mesh.prepare(*p);
                if !mesh.graph.contains_vertex(p) {
                    mesh.delaunay_add_vertex(p)?;
                }
            }
        }
        for e in constraints.iter() {
            mesh.delaunay_add_constraint_edge(*e)?;
        }
        debug!(
            "built mesh: {} vertices, {} triangles, {} fixed edges",
            mesh.num_vertices(),
            mesh.num_triangles(),
            mesh.num_fixed_edges()
        );
        Ok(mesh)
    }

    pub fn config(&self) -> &MeshConfig {
        &self.config
    }

    pub(crate) fn prepare(&self, mut p: Point) -> Point {
        if self.config.snap {
            p.snap();
        }
        p
    }

    pub(crate) fn prepare_edge(&self, e: Edge) -> Edge {
        Edge::new(self.prepare(e.p1), self.prepare(e.p2))
    }

    /// The primal graph of mesh vertices and edges.
    pub fn graph(&self) -> &PlanarGraph {
        &self.graph
    }

    /// The subgraph of fixed edges.
    pub fn fixed_graph(&self) -> &PlanarGraph {
        &self.fixed
    }

    pub fn polypoints(&self) -> &PolypointGraph {
        &self.polypoints
    }

    pub fn num_vertices(&self) -> usize {
        self.graph.num_vertices()
    }

    pub fn num_edges(&self) -> usize {
        self.graph.num_edges()
    }

    pub fn vertices(&self) -> impl Iterator<Item = Point> + '_ {
        self.graph.vertices()
    }

    pub fn edges(&self) -> Vec<Edge> {
        self.graph.edges()
    }

    pub fn is_connected(&self, p1: Point, p2: Point) -> bool {
        self.graph.is_connected(p1, p2)
    }

    pub fn neighbours(&self, p: Point) -> Result<Vec<Point>> {
        self.graph.neighbours(p)
    }

    pub fn add_vertex(&mut self, p: Point) -> Result<bool> {
        let p = self.prepare(p);
        self.graph.add_vertex(p)
    }

    pub fn add_edge_and_vertices(&mut self, e: Edge) -> Result<bool> {
        let e = self.prepare_edge(e);
        self.graph.add_edge_and_vertices(e.p1, e.p2)
    }

    pub fn triangles(&self) -> impl Iterator<Item = (TriangleIndex, &Triangle)> + '_ {
        self.triangles.iter()
    }

    pub fn triangle(&self, index: TriangleIndex) -> Option<&Triangle> {
        self.triangles.get(index)
    }

    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    pub fn triangle_index(&self, p1: Point, p2: Point, p3: Point) -> Option<TriangleIndex> {
        self.lookup.get(&TriangleKey::new(p1, p2, p3)).copied()
    }

    pub fn find_triangle(&self, p1: Point, p2: Point, p3: Point) -> Option<&Triangle> {
        self.triangle_index(p1, p2, p3)
            .and_then(|i| self.triangles.get(i))
    }

    /// The triangles that have `e` as a side.
    pub fn triangles_on_edge(&self, e: Edge) -> Vec<TriangleIndex> {
        let apexes = match self.graph.common_neighbours(e.p1, e.p2) {
            Ok(apexes) => apexes,
            Err(_) => return Vec::new(),
        };
        apexes
            .into_iter()
            .filter_map(|apex| self.triangle_index(e.p1, e.p2, apex))
            .collect()
    }

    /// Every triangle whose closed area holds `p`.
    pub fn find_containing_triangles(&self, p: Point) -> Vec<TriangleIndex> {
        self.triangles
            .iter()
            .filter(|(_, t)| t.contains_point(p))
            .map(|(i, _)| i)
            .collect()
    }

    /// The polypoint of a triangle holding `p`, which is where a planner
    /// starting or ending at `p` enters the dual graph.
    pub fn locate_polypoint(&self, p: Point) -> Option<(TriangleIndex, &Polypoint)> {
        let i = self
            .triangles
            .iter()
            .find(|(_, t)| t.contains_point(p))
            .map(|(i, _)| i)?;
        self.polypoints.get(i).map(|pp| (i, pp))
    }

    /// Add a face to the mesh, along with its edges, its polypoint and the
    /// dual edges to its neighbours. Adding a face that is already present
    /// returns the existing one.
    pub fn add_triangle(&mut self, t: Triangle) -> Result<TriangleIndex> {
        if let Some(i) = self.lookup.get(&t.key()) {
            return Ok(*i);
        }
        for e in t.edges().iter() {
            self.graph.add_edge_and_vertices(e.p1, e.p2)?;
        }
        let index = self.triangles.insert(t);
        self.lookup.insert(t.key(), index);
        self.polypoints.insert(index, t.center());
        for e in t.edges().iter() {
            if self.is_fixed(*e) {
                continue;
            }
            for other in self.triangles_on_edge(*e) {
                if other != index {
                    self.polypoints.connect(index, other);
                }
            }
        }
        Ok(index)
    }

    /// Remove a face. Its edges stay in the graph while another face or a
    /// constraint still needs them.
    pub fn remove_triangle(&mut self, p1: Point, p2: Point, p3: Point) -> Result<Triangle> {
        let key = TriangleKey::new(p1, p2, p3);
        let index = self
            .lookup
            .remove(&key)
            .ok_or(MeshError::MissingTriangle(p1, p2, p3))?;
        let t = self.triangles.remove(index);
        self.polypoints.remove(index);
        for e in t.edges().iter() {
            if !self.is_fixed(*e) && self.triangles_on_edge(*e).is_empty() {
                self.graph.remove_edge(e.p1, e.p2);
            }
        }
        Ok(t)
    }

    pub fn is_fixed(&self, e: Edge) -> bool {
        self.fixed.is_connected(e.p1, e.p2)
    }

    pub fn fixed_edges(&self) -> Vec<Edge> {
        self.fixed.edges()
    }

    pub fn num_fixed_edges(&self) -> usize {
        self.fixed.num_edges()
    }

    /// Mark an edge impassable without changing the geometry. The edge and its
    /// endpoints are added to the graph when missing. Returns true if the edge
    /// was not already fixed.
    pub fn add_fixed_edge(&mut self, e: Edge) -> Result<bool> {
        let e = self.prepare_edge(e);
        self.graph.add_edge_and_vertices(e.p1, e.p2)?;
        let added = self.fixed.add_edge_and_vertices(e.p1, e.p2)?;
        if added {
            let sides = self.triangles_on_edge(e);
            if let [a, b] = sides[..] {
                self.polypoints.disconnect(a, b);
            }
        }
        Ok(added)
    }

    /// Make a fixed edge passable again.
    pub fn remove_fixed_edge(&mut self, e: Edge) -> Result<()> {
        let e = self.prepare_edge(e);
        if !self.fixed.remove_edge(e.p1, e.p2) {
            return Err(MeshError::MissingEdge(e.p1, e.p2));
        }
        for p in [e.p1, e.p2].iter() {
            if self.fixed.degree(*p) == Ok(0) {
                self.fixed.remove_vertex(*p)?;
            }
        }
        let sides = self.triangles_on_edge(e);
        match sides[..] {
            [] => {
                self.graph.remove_edge(e.p1, e.p2);
            }
            [a, b] => {
                self.polypoints.connect(a, b);
            }
            _ => (),
        }
        Ok(())
    }

    /// Whether the two faces either side of `e` satisfy the Delaunay
    /// criterion when `inserted` is the apex of one and `opposite` of the
    /// other. Cocircular quads are decided by the perturbed in-circle test,
    /// so exactly one of the two diagonals is legal.
    pub fn is_legal(&self, inserted: Point, e: Edge, opposite: Point) -> bool {
        in_circle_perturbed(e.p1, e.p2, inserted, opposite) < 0.0
    }

    /// The point at `clearance` distance from an obstacle corner, out along
    /// the bisector of the two fixed edges that meet there.
    pub fn clearance_point(&self, corner: Point) -> Result<Point> {
        let corner = self.prepare(corner);
        let walls = self
            .fixed
            .neighbours(corner)
            .map_err(|_| MeshError::NotACorner(corner))?;
        let (a, b) = match walls[..] {
            [a, b] => (a, b),
            _ => return Err(MeshError::NotACorner(corner)),
        };
        let to_a = (a - corner).normalized();
        let to_b = (b - corner).normalized();
        let away = match (to_a, to_b) {
            (Some(to_a), Some(to_b)) => ((to_a + to_b) * -1.0).normalized(),
            _ => None,
        };
        let away = away.ok_or(MeshError::NotACorner(corner))?;
        Ok(corner + away * self.config.clearance)
    }

    /// True if every edge that is not fixed satisfies the Delaunay criterion.
    pub fn is_delaunay(&self) -> bool {
        self.check_delaunay().is_ok()
    }

    fn check_delaunay(&self) -> Result<()> {
        for e in self.graph.edges() {
            if self.is_fixed(e) {
                continue;
            }
            if let [a, b] = self.triangles_on_edge(e)[..] {
                let ta = self.triangles[a];
                let tb = self.triangles[b];
                let apex_b = tb.opposite_point(e);
                if let Some(apex_b) = apex_b {
                    if ta.circumcircle_contains(apex_b) {
                        return Err(MeshError::InvariantViolation(format!(
                            "edge {} is not Delaunay: {} lies in the circumcircle of {}",
                            e, apex_b, ta
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Check every mesh invariant, reporting the first one found broken.
    pub fn validate(&self) -> Result<()> {
        let violation = |msg: String| Err(MeshError::InvariantViolation(msg));
        let mut corners = std::collections::HashSet::new();
        let mut sides: HashMap<Edge, usize> = HashMap::new();
        for (_, t) in self.triangles.iter() {
            if t.is_degenerate() {
                return violation(format!("triangle {} has no area", t));
            }
            for e in t.edges().iter() {
                if !self.graph.is_connected(e.p1, e.p2) {
                    return violation(format!("side {} of {} is not in the graph", e, t));
                }
                *sides.entry(*e).or_insert(0) += 1;
            }
            corners.extend(t.points().iter().copied());
        }
        for (_, t) in self.triangles.iter() {
            for p in corners.iter() {
                match t.locate(*p) {
                    Location::Inside | Location::OnEdge(_) => {
                        return violation(format!("vertex {} lies within {}", p, t));
                    }
                    _ => (),
                }
            }
        }
        for (e, n) in sides.iter() {
            if *n > 2 {
                return violation(format!("edge {} borders {} triangles", e, n));
            }
        }
        for e in self.graph.edges() {
            if !self.is_fixed(e) && !sides.contains_key(&e) {
                return violation(format!("edge {} borders no triangle", e));
            }
        }
        for e in self.fixed.edges() {
            if !self.graph.is_connected(e.p1, e.p2) {
                return violation(format!("fixed edge {} is not in the graph", e));
            }
        }
        self.check_delaunay()?;
        if self.polypoints.num_polypoints() != self.triangles.len() {
            return violation(format!(
                "{} polypoints for {} triangles",
                self.polypoints.num_polypoints(),
                self.triangles.len()
            ));
        }
        let mut adjacent_pairs = 0;
        for (e, n) in sides.iter() {
            if *n != 2 {
                continue;
            }
            if let [a, b] = self.triangles_on_edge(*e)[..] {
                let fixed = self.is_fixed(*e);
                if !fixed {
                    adjacent_pairs += 1;
                }
                if self.polypoints.is_connected(a, b) == fixed {
                    return violation(format!(
                        "dual edge across {} does not match its fixed state",
                        e
                    ));
                }
            }
        }
        if self.polypoints.num_edges() != adjacent_pairs {
            return violation(format!(
                "{} dual edges for {} adjacent pairs",
                self.polypoints.num_edges(),
                adjacent_pairs
            ));
        }
        Ok(())
    }
}

/// True if the ring turns left, or runs straight, at every vertex, and turns
/// left at least once.
fn is_convex_ring(ring: &[Point]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut turns_left = false;
    for i in 0..n {
        match left_or_right(ring[i], ring[(i + 1) % n], ring[(i + 2) % n]) {
            Direction::Right => return false,
            Direction::Left => turns_left = true,
            Direction::Straight => (),
        }
    }
    turns_left
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    pub fn e(p1: Point, p2: Point) -> Edge {
        Edge::new(p1, p2)
    }

    pub fn square(size: f64) -> Vec<Point> {
        vec![p(0.0, 0.0), p(0.0, size), p(size, size), p(size, 0.0)]
    }

    pub fn triangle_set(mesh: &TriangleGraph) -> std::collections::BTreeSet<TriangleKey> {
        mesh.triangles().map(|(_, t)| t.key()).collect()
    }

    #[test]
    fn unit_square_with_fixed_diagonal() {
        let mesh = TriangleGraph::build(&square(1.0), &[e(p(0.0, 0.0), p(1.0, 1.0))]).unwrap();
        assert_eq!(mesh.num_triangles(), 2);
        assert_eq!(mesh.num_edges(), 5);
        assert_eq!(mesh.num_fixed_edges(), 1);
        assert_eq!(mesh.polypoints().num_polypoints(), 2);
        assert_eq!(mesh.polypoints().num_edges(), 0);
        assert!(mesh.is_fixed(e(p(1.0, 1.0), p(0.0, 0.0))));
        mesh.validate().unwrap();
    }

    #[test]
    fn unit_square_without_constraints() {
        let mesh = TriangleGraph::build(&square(1.0), &[]).unwrap();
        assert_eq!(mesh.num_triangles(), 2);
        assert_eq!(mesh.num_edges(), 5);
        assert_eq!(mesh.polypoints().num_edges(), 1);
        mesh.validate().unwrap();
    }

    #[test]
    fn build_rejects_concave_boundary() {
        let boundary = vec![p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0), p(2.0, 1.0), p(0.0, 4.0)];
        assert_eq!(
            TriangleGraph::build(&boundary, &[]).err(),
            Some(MeshError::NonConvexBoundary)
        );
        let line = vec![p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0)];
        assert_eq!(
            TriangleGraph::build(&line, &[]).err(),
            Some(MeshError::NonConvexBoundary)
        );
    }

    #[test]
    fn build_with_collinear_boundary_points() {
        let boundary = vec![
            p(0.0, 0.0),
            p(40.0, 0.0),
            p(80.0, 0.0),
            p(80.0, 40.0),
            p(80.0, 80.0),
            p(40.0, 80.0),
            p(0.0, 80.0),
            p(0.0, 40.0),
        ];
        let mesh = TriangleGraph::build(&boundary, &[]).unwrap();
        assert_eq!(mesh.num_vertices(), 8);
        // An n-gon with no interior vertices has n - 2 faces.
        assert_eq!(mesh.num_triangles(), 6);
        mesh.validate().unwrap();
    }

    #[test]
    fn fixed_edges_are_idempotent() {
        let mut mesh = TriangleGraph::build(&square(10.0), &[]).unwrap();
        let diagonal = mesh
            .edges()
            .into_iter()
            .find(|edge| mesh.triangles_on_edge(*edge).len() == 2)
            .unwrap();
        assert_eq!(mesh.add_fixed_edge(diagonal), Ok(true));
        let fixed = mesh.fixed_edges();
        assert_eq!(mesh.add_fixed_edge(diagonal), Ok(false));
        assert_eq!(mesh.fixed_edges(), fixed);
        assert_eq!(mesh.polypoints().num_edges(), 0);
        mesh.validate().unwrap();

        mesh.remove_fixed_edge(diagonal).unwrap();
        assert_eq!(mesh.num_fixed_edges(), 0);
        assert_eq!(mesh.polypoints().num_edges(), 1);
        assert_eq!(
            mesh.remove_fixed_edge(diagonal),
            Err(MeshError::MissingEdge(diagonal.p1, diagonal.p2))
        );
        mesh.validate().unwrap();
    }

    #[test]
    fn removing_a_triangle_keeps_shared_edges() {
        let mut mesh = TriangleGraph::build(&square(10.0), &[]).unwrap();
        let (_, first) = mesh.triangles().next().unwrap();
        let first = *first;
        mesh.remove_triangle(first.p3, first.p1, first.p2).unwrap();
        assert_eq!(mesh.num_triangles(), 1);
        // The two outer sides go, the diagonal stays with the other face.
        assert_eq!(mesh.num_edges(), 3);
        assert_eq!(mesh.polypoints().num_polypoints(), 1);
        assert_eq!(
            mesh.remove_triangle(first.p1, first.p2, first.p3),
            Err(MeshError::MissingTriangle(first.p1, first.p2, first.p3))
        );
    }

    #[test]
    fn find_triangle_ignores_order() {
        let mesh = TriangleGraph::build(&square(1.0), &[e(p(0.0, 0.0), p(1.0, 1.0))]).unwrap();
        assert!(mesh
            .find_triangle(p(1.0, 1.0), p(0.0, 0.0), p(0.0, 1.0))
            .is_some());
        assert!(mesh
            .find_triangle(p(1.0, 0.0), p(0.0, 1.0), p(0.0, 0.0))
            .is_none());
    }

    #[test]
    fn locate_polypoint() {
        let mesh = TriangleGraph::build(&square(30.0), &[e(p(0.0, 0.0), p(30.0, 30.0))]).unwrap();
        let (i, pp) = mesh.locate_polypoint(p(5.0, 20.0)).unwrap();
        assert_eq!(pp.point, p(10.0, 20.0));
        assert!(mesh.triangle(i).unwrap().has_point(p(0.0, 30.0)));
        assert!(mesh.locate_polypoint(p(-5.0, 20.0)).is_none());
    }

    fn corner_mesh(prev: Point, next: Point) -> TriangleGraph {
        let mut mesh = TriangleGraph::with_config(MeshConfig {
            clearance: 2f64.sqrt(),
            ..MeshConfig::default()
        });
        let corner = p(0.0, 0.0);
        mesh.add_vertex(corner).unwrap();
        mesh.add_vertex(prev).unwrap();
        mesh.add_vertex(next).unwrap();
        mesh.add_fixed_edge(e(corner, prev)).unwrap();
        mesh.add_fixed_edge(e(corner, next)).unwrap();
        mesh
    }

    fn is_roughly(a: Point, b: Point) -> bool {
        a.distance(b) < 1e-9
    }

    #[test]
    fn clearance_top_left() {
        let mesh = corner_mesh(p(0.0, -1.0), p(-1.0, 0.0));
        assert_eq!(mesh.config().clearance, 2f64.sqrt());
        let c = mesh.clearance_point(p(0.0, 0.0)).unwrap();
        assert!(is_roughly(c, p(1.0, 1.0)), "{}", c);
    }

    #[test]
    fn clearance_top_right() {
        let mesh = corner_mesh(p(0.0, -1.0), p(1.0, 0.0));
        let c = mesh.clearance_point(p(0.0, 0.0)).unwrap();
        assert!(is_roughly(c, p(-1.0, 1.0)), "{}", c);
    }

    #[test]
    fn clearance_bottom_left() {
        let mesh = corner_mesh(p(0.0, 1.0), p(1.0, 0.0));
        let c = mesh.clearance_point(p(0.0, 0.0)).unwrap();
        assert!(is_roughly(c, p(-1.0, -1.0)), "{}", c);
    }

    #[test]
    fn clearance_bottom_right() {
        let mesh = corner_mesh(p(0.0, 1.0), p(-1.0, 0.0));
        let c = mesh.clearance_point(p(0.0, 0.0)).unwrap();
        assert!(is_roughly(c, p(1.0, -1.0)), "{}", c);
    }

    #[test]
    fn clearance_needs_a_corner() {
        let mesh = corner_mesh(p(0.0, -1.0), p(0.0, 1.0));
        assert_eq!(
            mesh.clearance_point(p(0.0, 0.0)),
            Err(MeshError::NotACorner(p(0.0, 0.0)))
        );
        assert_eq!(
            mesh.clearance_point(p(0.0, 1.0)),
            Err(MeshError::NotACorner(p(0.0, 1.0)))
        );
        assert_eq!(
            mesh.clearance_point(p(7.0, 7.0)),
            Err(MeshError::NotACorner(p(7.0, 7.0)))
        );
    }
}
