use super::TriangleGraph;
use crate::error::{MeshError, Result};
use crate::point::*;
use crate::predicates::*;
use crate::triangle::Triangle;
use log::{debug, trace};

impl TriangleGraph {
    /// The neighbours of `p`, counter-clockwise around it.
    fn vertex_ring(&self, p: Point) -> Result<Vec<Point>> {
        let mut ring = self.graph.neighbours(p)?;
        radial_sort(&mut ring, Some(p));
        Ok(ring)
    }

    /// Remove an interior vertex and fill the hole it leaves with Delaunay
    /// triangles, clipping one ear at a time. Vertices with fixed edges must
    /// have them unfixed first.
    pub fn delaunay_remove_vertex(&mut self, p: Point) -> Result<()> {
        let p = self.prepare(p);
        if !self.graph.contains_vertex(p) {
            return Err(MeshError::MissingVertex(p));
        }
        if let Ok(walls) = self.fixed.neighbours(p) {
            if let Some(wall) = walls.first() {
                return Err(MeshError::FixedEdgeBlocksRemoval(p, *wall));
            }
        }
        let ring = self.vertex_ring(p)?;
        let n = ring.len();
        if n < 3 {
            return Err(MeshError::OpenVertexRing(p));
        }
        for (i, v) in ring.iter().enumerate() {
            if self.triangle_index(p, *v, ring[(i + 1) % n]).is_none() {
                return Err(MeshError::OpenVertexRing(p));
            }
        }
        debug!("removing vertex {} with {} neighbours", p, n);

        let mut ring = ring;
        while ring.len() > 3 {
            let (v1, v2, v3) = self
                .find_ear(p, &ring)
                .ok_or(MeshError::NoLegalEar(p))?;
            trace!("clipping ear {} {} {} around {}", v1, v2, v3, p);
            self.remove_triangle(p, v1, v2)?;
            self.remove_triangle(p, v2, v3)?;
            self.add_triangle(Triangle::new(v1, v2, v3)?)?;
            // May be flat when p sits on the chord; it goes again before the
            // removal finishes.
            self.add_triangle(Triangle::new_unchecked(v1, v3, p))?;
            ring = self.vertex_ring(p)?;
        }

        let (a, b, c) = match ring[..] {
            [a, b, c] => (a, b, c),
            _ => return Err(MeshError::OpenVertexRing(p)),
        };
        self.remove_triangle(p, a, b)?;
        self.remove_triangle(p, b, c)?;
        self.remove_triangle(p, c, a)?;
        self.graph.safe_remove_vertex(p)?;
        if self.fixed.contains_vertex(p) {
            self.fixed.safe_remove_vertex(p)?;
        }
        self.add_triangle(Triangle::new(a, b, c)?)?;
        Ok(())
    }

    /// A consecutive triple of the ring that turns away from `p` and whose
    /// circumcircle holds no other ring vertex.
    fn find_ear(&self, p: Point, ring: &[Point]) -> Option<(Point, Point, Point)> {
        let n = ring.len();
        (0..n)
            .map(|i| (ring[i], ring[(i + 1) % n], ring[(i + 2) % n]))
            .find(|&(v1, v2, v3)| {
                left_or_right(v1, v2, v3) == Direction::Left
                    && left_or_right(v1, v3, p) != Direction::Right
                    && ring
                        .iter()
                        .filter(|w| **w != v1 && **w != v2 && **w != v3)
                        .all(|w| in_circle_perturbed(v1, v2, v3, *w) < 0.0)
            })
    }

    /// Patch the mesh after a change to the map: unfix edges, then remove
    /// vertices, then add vertices, then add constraints. The phases are not
    /// transactional; a failure leaves the mesh part way through and it
    /// should be rebuilt.
    pub fn dynamic_update(
        &mut self,
        unfix: &[Edge],
        add_constraints: &[Edge],
        remove_vertices: &[Point],
        add_vertices: &[Point],
    ) -> Result<()> {
        debug!(
            "dynamic update: unfix {}, remove {}, add {}, constrain {}",
            unfix.len(),
            remove_vertices.len(),
            add_vertices.len(),
            add_constraints.len()
        );
        for e in unfix.iter() {
            self.remove_fixed_edge(*e)?;
        }
        for p in remove_vertices.iter() {
            self.delaunay_remove_vertex(*p)?;
        }
        for p in add_vertices.iter() {
            self.delaunay_add_vertex(*p)?;
        }
        for e in add_constraints.iter() {
            self.delaunay_add_constraint_edge(*e)?;
        }
        if self.config.validate_after_update {
            self.validate()?;
        }
        Ok(())
    }
}
