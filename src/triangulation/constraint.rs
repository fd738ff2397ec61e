use super::TriangleGraph;
use crate::error::{MeshError, Result};
use crate::point::*;
use crate::predicates::*;
use crate::triangle::Triangle;
use log::{debug, trace, warn};
use std::collections::HashMap;

impl TriangleGraph {
    /// Fill the polygon `region` with Delaunay triangles. The first and last
    /// points must already be joined by an edge; the rest run around the
    /// polygon between them.
    pub fn triangulate_region(&mut self, region: &[Point]) -> Result<()> {
        let (first, last) = match (region.first(), region.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Ok(()),
        };
        if region.len() >= 3 && !self.graph.is_connected(first, last) {
            return Err(MeshError::MissingEdge(first, last));
        }
        let mut stack = vec![region.to_vec()];
        while let Some(region) = stack.pop() {
            let n = region.len();
            if n < 3 {
                continue;
            }
            let a = region[0];
            let b = region[n - 1];
            if n == 3 {
                if !collinear(a, region[1], b) {
                    self.add_triangle(Triangle::new(a, region[1], b)?)?;
                }
                continue;
            }
            let interior = &region[1..n - 1];
            let split = interior.iter().position(|c| {
                !collinear(a, *c, b)
                    && interior
                        .iter()
                        .all(|d| d == c || in_circle_perturbed(a, *c, b, *d) < 0.0)
            });
            let i = match split {
                Some(i) => i + 1,
                None => return Err(MeshError::NoLegalRegionSplit(a, b)),
            };
            trace!("region {}..{} split at {}", a, b, region[i]);
            self.add_triangle(Triangle::new(a, region[i], b)?)?;
            stack.push(region[..=i].to_vec());
            stack.push(region[i..].to_vec());
        }
        Ok(())
    }

    /// Force `e` into the mesh as a fixed edge, retriangulating whatever it
    /// cuts through. Both endpoints must already be vertices.
    pub fn delaunay_add_constraint_edge(&mut self, e: Edge) -> Result<()> {
        let e = self.prepare_edge(e);
        if e.p1 == e.p2 {
            return Err(MeshError::SelfLoop(e.p1));
        }
        for p in [e.p1, e.p2].iter() {
            if !self.graph.contains_vertex(*p) {
                return Err(MeshError::MissingVertex(*p));
            }
        }
        if self.graph.is_connected(e.p1, e.p2) {
            self.add_fixed_edge(e)?;
            return Ok(());
        }

        let mut on_segment: Vec<Point> = self
            .graph
            .vertices()
            .filter(|v| e.contains_point_strict(*v))
            .collect();
        if !on_segment.is_empty() {
            warn!(
                "constraint {} passes through {} vertices, splitting it",
                e,
                on_segment.len()
            );
            on_segment.sort_by(|a, b| {
                e.p1.distance_squared(*a)
                    .partial_cmp(&e.p1.distance_squared(*b))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            let mut chain = vec![e.p1];
            chain.extend(on_segment);
            chain.push(e.p2);
            for pair in chain.windows(2) {
                self.delaunay_add_constraint_edge(Edge::new(pair[0], pair[1]))?;
            }
            return Ok(());
        }

        for f in self.fixed.edges() {
            if f.crosses(&e) {
                return Err(MeshError::ConstraintCrossesFixedEdge(
                    e.p1, e.p2, f.p1, f.p2,
                ));
            }
        }
        let crossed: Vec<Triangle> = self
            .triangles
            .iter()
            .filter(|(_, t)| t.is_crossed_by(e))
            .map(|(_, t)| *t)
            .collect();
        debug!(
            "adding constraint {} across {} triangles",
            e,
            crossed.len()
        );
        let (upper, lower) = find_upper_and_lower_points(e, &crossed)?;
        for t in crossed.iter() {
            self.remove_triangle(t.p1, t.p2, t.p3)?;
        }
        self.add_fixed_edge(e)?;
        self.triangulate_region(&upper)?;
        self.triangulate_region(&lower)
    }
}

/// Walk the outline of the triangles crossed by `e` from one end of `e` to
/// the other, once on each side. The chains come back as
/// `[e.p1, .., e.p2]`, upper (left of `e`) first.
fn find_upper_and_lower_points(e: Edge, crossed: &[Triangle]) -> Result<(Vec<Point>, Vec<Point>)> {
    let malformed = || MeshError::MalformedConstraint(e.p1, e.p2);
    if crossed.is_empty() {
        return Err(malformed());
    }
    let mut sides: HashMap<Edge, usize> = HashMap::new();
    for t in crossed.iter() {
        for side in t.edges().iter() {
            *sides.entry(*side).or_insert(0) += 1;
        }
    }
    let outline: Vec<Edge> = sides
        .into_iter()
        .filter(|(_, n)| *n == 1)
        .map(|(side, _)| side)
        .collect();
    for side in outline.iter() {
        for p in [side.p1, side.p2].iter() {
            if !e.has_point(*p) && e.side(*p) == Direction::Straight {
                return Err(malformed());
            }
        }
    }
    let walk = |want: Direction| -> Result<Vec<Point>> {
        let mut chain = vec![e.p1];
        let mut previous: Option<Point> = None;
        let mut current = e.p1;
        while current != e.p2 {
            let next: Vec<Point> = outline
                .iter()
                .filter(|side| side.has_point(current))
                .map(|side| if side.p1 == current { side.p2 } else { side.p1 })
                .filter(|q| Some(*q) != previous)
                .filter(|q| *q == e.p2 || e.side(*q) == want)
                .collect();
            let next = match next[..] {
                [next] => next,
                _ => return Err(malformed()),
            };
            if chain.len() > outline.len() {
                return Err(malformed());
            }
            chain.push(next);
            previous = Some(current);
            current = next;
        }
        Ok(chain)
    };
    let upper = walk(Direction::Left)?;
    let lower = walk(Direction::Right)?;
    if upper.len() + lower.len() != outline.len() + 2 {
        return Err(malformed());
    }
    Ok((upper, lower))
}
