use crate::error::{MeshError, Result};
use crate::point::*;
use crate::predicates::*;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// The corners of a triangle in sorted order. Two triangles over the same
/// three points have the same key, whatever order they were built in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriangleKey([Point; 3]);

impl TriangleKey {
    pub fn new(p1: Point, p2: Point, p3: Point) -> Self {
        let mut points = [p1, p2, p3];
        points.sort();
        TriangleKey(points)
    }

    pub fn points(&self) -> [Point; 3] {
        self.0
    }
}

/// A face of the mesh. Immutable, and compared by its set of corners.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Triangle {
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

/// The dual-graph vertex of a triangle: its centroid, rounded to the pixel
/// grid, along with the triangle it stands for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Polypoint {
    pub point: Point,
    pub triangle: Triangle,
}

/// Where a point sits relative to a closed triangle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Location {
    Outside,
    Inside,
    OnEdge(Edge),
    OnVertex(Point),
}

/// The six corners of two triangles, split into those the triangles have in
/// common and those belonging to only one of them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategorizedPoints {
    pub shared: Vec<Point>,
    pub unique: Vec<Point>,
}

impl Triangle {
    /// Build a triangle, refusing three points that span no area.
    pub fn new(p1: Point, p2: Point, p3: Point) -> Result<Self> {
        if collinear(p1, p2, p3) {
            return Err(MeshError::DegenerateTriangle(p1, p2, p3));
        }
        Ok(Self::new_unchecked(p1, p2, p3))
    }

    /// Build a triangle without checking its area. Only for the transient
    /// helper faces of vertex removal.
    pub fn new_unchecked(p1: Point, p2: Point, p3: Point) -> Self {
        Self { p1, p2, p3 }
    }

    pub fn key(&self) -> TriangleKey {
        TriangleKey::new(self.p1, self.p2, self.p3)
    }

    pub fn points(&self) -> [Point; 3] {
        [self.p1, self.p2, self.p3]
    }

    /// The corners in counter-clockwise order.
    pub fn ccw_points(&self) -> [Point; 3] {
        if orientation(self.p1, self.p2, self.p3) < 0.0 {
            [self.p1, self.p3, self.p2]
        } else {
            [self.p1, self.p2, self.p3]
        }
    }

    pub fn edges(&self) -> [Edge; 3] {
        [
            Edge::new(self.p1, self.p2),
            Edge::new(self.p2, self.p3),
            Edge::new(self.p3, self.p1),
        ]
    }

    pub fn is_degenerate(&self) -> bool {
        collinear(self.p1, self.p2, self.p3)
    }

    pub fn area(&self) -> f64 {
        orientation(self.p1, self.p2, self.p3).abs() / 2.0
    }

    pub fn centroid(&self) -> Point {
        Point::new(
            (self.p1.x + self.p2.x + self.p3.x) / 3.0,
            (self.p1.y + self.p2.y + self.p3.y) / 3.0,
        )
    }

    pub fn center(&self) -> Polypoint {
        Polypoint {
            point: self.centroid().round(),
            triangle: *self,
        }
    }

    pub fn edge_centers(&self) -> [Point; 3] {
        [
            self.p1.midpoint(self.p2),
            self.p2.midpoint(self.p3),
            self.p1.midpoint(self.p3),
        ]
    }

    pub fn categorize_points(&self, other: &Triangle) -> CategorizedPoints {
        let mut categorized = CategorizedPoints::default();
        for p in self.points().iter() {
            if other.has_point(*p) {
                categorized.shared.push(*p);
            } else {
                categorized.unique.push(*p);
            }
        }
        for p in other.points().iter() {
            if !self.has_point(*p) {
                categorized.unique.push(*p);
            }
        }
        categorized
    }

    pub fn has_point(&self, p: Point) -> bool {
        p == self.p1 || p == self.p2 || p == self.p3
    }

    pub fn has_edge(&self, e: Edge) -> bool {
        e.p1 != e.p2 && self.has_point(e.p1) && self.has_point(e.p2)
    }

    /// The corner not on `e`, if `e` is an edge of this triangle.
    pub fn opposite_point(&self, e: Edge) -> Option<Point> {
        if !self.has_edge(e) {
            return None;
        }
        self.points().iter().copied().find(|p| !e.has_point(*p))
    }

    pub fn locate(&self, p: Point) -> Location {
        if self.has_point(p) {
            return Location::OnVertex(p);
        }
        let [a, b, c] = self.ccw_points();
        let sides = [
            (Edge::new(a, b), left_or_right(a, b, p)),
            (Edge::new(b, c), left_or_right(b, c, p)),
            (Edge::new(c, a), left_or_right(c, a, p)),
        ];
        if sides.iter().any(|(_, d)| *d == Direction::Right) {
            return Location::Outside;
        }
        match sides.iter().find(|(_, d)| *d == Direction::Straight) {
            Some((e, _)) => Location::OnEdge(*e),
            None => Location::Inside,
        }
    }

    /// True if `p` lies in the closed triangle.
    pub fn contains_point(&self, p: Point) -> bool {
        self.locate(p) != Location::Outside
    }

    /// True if `p` lies strictly inside the circumcircle.
    pub fn circumcircle_contains(&self, p: Point) -> bool {
        in_circle(self.p1, self.p2, self.p3, p) > 0.0
    }

    /// True if the segment passes through the interior of the triangle.
    /// Touching a corner or running along a side does not count.
    pub fn is_crossed_by(&self, e: Edge) -> bool {
        let [a, b, c] = self.ccw_points();
        // The line through the segment separates the corners.
        let sides = [e.side(a), e.side(b), e.side(c)];
        if sides.iter().all(|d| *d != Direction::Left)
            || sides.iter().all(|d| *d != Direction::Right)
        {
            return false;
        }
        // A side of the triangle separates the segment.
        for (s, t) in [(a, b), (b, c), (c, a)].iter() {
            if left_or_right(*s, *t, e.p1) != Direction::Left
                && left_or_right(*s, *t, e.p2) != Direction::Left
            {
                return false;
            }
        }
        true
    }
}

impl PartialEq for Triangle {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Triangle {}

impl Hash for Triangle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl Display for Triangle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        write!(f, "[{}, {}, {}]", self.p1, self.p2, self.p3)
    }
}
