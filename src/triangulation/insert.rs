use super::TriangleGraph;
use crate::error::{MeshError, Result};
use crate::point::*;
use crate::predicates::*;
use crate::triangle::{Location, Triangle};
use log::{debug, trace};

impl TriangleGraph {
    /// Insert a vertex into the mesh and restore the Delaunay property around
    /// it. The point must lie inside the triangulated area and must not
    /// already be a vertex. A point landing on a fixed edge splits that edge
    /// into two fixed halves. A point landing on the mesh outline becomes a
    /// boundary vertex, which [`TriangleGraph::delaunay_remove_vertex`]
    /// refuses with [`MeshError::OpenVertexRing`].
    pub fn delaunay_add_vertex(&mut self, p: Point) -> Result<()> {
        let p = self.prepare(p);
        if !p.is_finite() {
            return Err(MeshError::NonFinitePoint(p));
        }
        if self.graph.contains_vertex(p) {
            return Err(MeshError::DuplicateVertex(p));
        }
        let containing = self.find_containing_triangles(p);
        debug!("adding vertex {} ({} containing triangles)", p, containing.len());
        match containing[..] {
            [] => Err(MeshError::PointOutsideMesh(p)),
            [i] => {
                let t = self.triangles[i];
                match t.locate(p) {
                    Location::Inside => self.split_triangle(p, t),
                    Location::OnEdge(e) => self.split_boundary_edge(p, t, e),
                    Location::OnVertex(_) => Err(MeshError::DuplicateVertex(p)),
                    Location::Outside => Err(MeshError::PointOutsideMesh(p)),
                }
            }
            [i, j] => {
                let t1 = self.triangles[i];
                let t2 = self.triangles[j];
                self.split_shared_edge(p, t1, t2)
            }
            _ => Err(MeshError::AmbiguousLocation(p, containing.len())),
        }
    }

    fn split_triangle(&mut self, p: Point, t: Triangle) -> Result<()> {
        self.remove_triangle(t.p1, t.p2, t.p3)?;
        for e in t.edges().iter() {
            self.add_triangle(Triangle::new(p, e.p1, e.p2)?)?;
        }
        for e in t.edges().iter() {
            self.legalize_edge(p, *e)?;
        }
        Ok(())
    }

    /// `p` sits on `e`, which is a side of `t` and of no other triangle.
    fn split_boundary_edge(&mut self, p: Point, t: Triangle, e: Edge) -> Result<()> {
        let apex = t
            .opposite_point(e)
            .ok_or(MeshError::MissingEdge(e.p1, e.p2))?;
        let fixed = self.is_fixed(e);
        if fixed {
            self.remove_fixed_edge(e)?;
        }
        self.remove_triangle(t.p1, t.p2, t.p3)?;
        self.add_triangle(Triangle::new(p, e.p1, apex)?)?;
        self.add_triangle(Triangle::new(p, e.p2, apex)?)?;
        if fixed {
            self.add_fixed_edge(Edge::new(e.p1, p))?;
            self.add_fixed_edge(Edge::new(p, e.p2))?;
        }
        self.legalize_edge(p, Edge::new(e.p1, apex))?;
        self.legalize_edge(p, Edge::new(e.p2, apex))
    }

    /// `p` sits on the side shared by `t1` and `t2`.
    fn split_shared_edge(&mut self, p: Point, t1: Triangle, t2: Triangle) -> Result<()> {
        let categorized = t1.categorize_points(&t2);
        let (shared, unique) = match (&categorized.shared[..], &categorized.unique[..]) {
            ([s1, s2], [u1, u2]) => ([*s1, *s2], [*u1, *u2]),
            _ => return Err(MeshError::AmbiguousLocation(p, 2)),
        };
        let e = Edge::new(shared[0], shared[1]);
        let fixed = self.is_fixed(e);
        if fixed {
            self.remove_fixed_edge(e)?;
        }
        self.remove_triangle(t1.p1, t1.p2, t1.p3)?;
        self.remove_triangle(t2.p1, t2.p2, t2.p3)?;
        for s in shared.iter() {
            for u in unique.iter() {
                self.add_triangle(Triangle::new(p, *s, *u)?)?;
            }
        }
        if fixed {
            self.add_fixed_edge(Edge::new(shared[0], p))?;
            self.add_fixed_edge(Edge::new(p, shared[1]))?;
        }
        for s in shared.iter() {
            for u in unique.iter() {
                self.legalize_edge(p, Edge::new(*s, *u))?;
            }
        }
        Ok(())
    }

    /// The apex of the triangle on the far side of `e` from `p`, where `p`
    /// and `e` already form a triangle. `None` when `e` is on the outside of
    /// the mesh.
    pub fn find_opposite_point(&self, p: Point, e: Edge) -> Result<Option<Point>> {
        if !self.graph.is_connected(p, e.p1) {
            return Err(MeshError::MissingEdge(p, e.p1));
        }
        if !self.graph.is_connected(p, e.p2) {
            return Err(MeshError::MissingEdge(p, e.p2));
        }
        if self.triangle_index(e.p1, e.p2, p).is_none() {
            return Err(MeshError::MissingTriangle(e.p1, e.p2, p));
        }
        let candidates: Vec<Point> = self
            .graph
            .common_neighbours(e.p1, e.p2)?
            .into_iter()
            .filter(|q| *q != p && self.triangle_index(e.p1, e.p2, *q).is_some())
            .collect();
        match candidates[..] {
            [] => Ok(None),
            [q] => Ok(Some(q)),
            _ => Err(MeshError::AmbiguousOppositePoint(
                e.p1,
                e.p2,
                candidates.len(),
            )),
        }
    }

    /// Flip `e` and its successors until every edge facing `p` is legal.
    pub fn legalize_edge(&mut self, p: Point, e: Edge) -> Result<()> {
        let mut stack = vec![e];
        while let Some(e) = stack.pop() {
            if self.is_fixed(e) {
                continue;
            }
            // The triangle may have been flipped away since this edge was
            // queued.
            if self.triangle_index(e.p1, e.p2, p).is_none() {
                continue;
            }
            let q = match self.find_opposite_point(p, e)? {
                Some(q) => q,
                None => continue,
            };
            if self.is_legal(p, e, q) {
                continue;
            }
            trace!("flipping {} to {}-{}", e, p, q);
            self.remove_triangle(p, e.p1, e.p2)?;
            self.remove_triangle(q, e.p1, e.p2)?;
            self.add_triangle(Triangle::new(p, q, e.p1)?)?;
            self.add_triangle(Triangle::new(p, q, e.p2)?)?;
            stack.push(Edge::new(e.p1, q));
            stack.push(Edge::new(e.p2, q));
        }
        Ok(())
    }
}
