//! Geometric predicates over [`Point`]s. Orientation and in-circle tests use
//! the exact adaptive predicates from [`robust`], so the sign of every test is
//! correct regardless of how close to degenerate the input is.
use crate::point::*;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq)]
pub enum Direction {
    Left,
    Straight,
    Right,
}

/// Twice the signed area of the triangle `a`, `b`, `p`. Positive iff `p` lies
/// to the left of the directed line `a`→`b`.
pub fn orientation(a: Point, b: Point, p: Point) -> f64 {
    robust::orient2d(a.into(), b.into(), p.into())
}

/// Does `pc` lie to the left or the right (or is collinear) of the line formed
/// by `pa` and `pb`.
pub fn left_or_right(pa: Point, pb: Point, pc: Point) -> Direction {
    let r = orientation(pa, pb, pc);
    if r > 0.0 {
        Direction::Left
    } else if r == 0.0 {
        Direction::Straight
    } else {
        Direction::Right
    }
}

/// Positive iff `d` lies strictly inside the circumcircle of `a`, `b`, `c`.
/// The first three points may be given in either winding.
pub fn in_circle(a: Point, b: Point, c: Point, d: Point) -> f64 {
    if orientation(a, b, c) < 0.0 {
        robust::incircle(a.into(), c.into(), b.into(), d.into())
    } else {
        robust::incircle(a.into(), b.into(), c.into(), d.into())
    }
}

/// [`in_circle`] with exact ties broken by simulation of simplicity. Each
/// point's height on the lifting paraboloid is raised by an infinitesimal
/// that shrinks with the point's rank, so the smallest point moves most.
/// Never zero while `a`, `b`, `c` span a triangle, which gives every set of
/// cocircular points exactly one Delaunay triangulation.
pub fn in_circle_perturbed(a: Point, b: Point, c: Point, d: Point) -> f64 {
    let (b, c) = if orientation(a, b, c) < 0.0 { (c, b) } else { (b, c) };
    let det = robust::incircle(a.into(), b.into(), c.into(), d.into());
    if det != 0.0 {
        return det;
    }
    // Derivative of the lifted determinant with respect to each height.
    let mut terms = [
        (a, orientation(b, c, d)),
        (b, -orientation(a, c, d)),
        (c, orientation(a, b, d)),
        (d, -orientation(a, b, c)),
    ];
    terms.sort_by(|x, y| x.0.cmp(&y.0));
    terms
        .iter()
        .map(|(_, t)| *t)
        .find(|t| *t != 0.0)
        .unwrap_or(0.0)
}

/// True if the three points do not span a triangle, including whenever two of
/// them coincide.
pub fn collinear(p1: Point, p2: Point, p3: Point) -> bool {
    if p1 == p2 || p1 == p3 || p2 == p3 {
        return true;
    }
    orientation(p1, p2, p3) == 0.0
}

pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let sum = points
        .iter()
        .fold(Point::new(0.0, 0.0), |acc, p| acc + *p);
    Some(sum * (1.0 / n))
}

/// Sort points counter-clockwise around `center` (or their centroid), starting
/// at 12 o'clock. Points at the same angle are ordered nearest first. The sort
/// is stable.
pub fn radial_sort(points: &mut [Point], center: Option<Point>) {
    let center = match center.or_else(|| centroid(points)) {
        Some(c) => c,
        None => return,
    };
    points.sort_by(|a, b| radial_cmp(center, *a, *b));
}

/// Which half-turn, measured counter-clockwise from 12 o'clock, `p` falls in.
fn half_turn(center: Point, p: Point) -> u8 {
    let d = p - center;
    if d.x < 0.0 || (d.x == 0.0 && d.y >= 0.0) {
        0
    } else {
        1
    }
}

fn radial_cmp(center: Point, a: Point, b: Point) -> Ordering {
    half_turn(center, a)
        .cmp(&half_turn(center, b))
        .then_with(|| match left_or_right(center, a, b) {
            Direction::Left => Ordering::Less,
            Direction::Right => Ordering::Greater,
            Direction::Straight => Ordering::Equal,
        })
        .then_with(|| {
            center
                .distance_squared(a)
                .partial_cmp(&center.distance_squared(b))
                .unwrap_or(Ordering::Equal)
        })
}

/// An unordered pair of points. Edges are not stored by the graphs; this is
/// the currency used to name them and to test them against other geometry.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Edge {
    pub p1: Point,
    pub p2: Point,
}

impl Edge {
    pub fn new(p1: Point, p2: Point) -> Self {
        Self { p1, p2 }
    }

    /// The endpoints in a canonical order, independent of direction.
    pub fn key(&self) -> (Point, Point) {
        if self.p1 <= self.p2 {
            (self.p1, self.p2)
        } else {
            (self.p2, self.p1)
        }
    }

    pub fn has_point(&self, p: Point) -> bool {
        self.p1 == p || self.p2 == p
    }

    pub fn midpoint(&self) -> Point {
        self.p1.midpoint(self.p2)
    }

    pub fn side(&self, p: Point) -> Direction {
        left_or_right(self.p1, self.p2, p)
    }

    /// True if both points lie strictly on the same side of the line through
    /// this edge.
    pub fn on_same_side(&self, a: Point, b: Point) -> bool {
        let sa = self.side(a);
        sa != Direction::Straight && sa == self.side(b)
    }

    /// True if the line through this edge separates `a` from `b`. When not
    /// `strict`, a point on the line counts as being on either side.
    pub fn is_between_points(&self, a: Point, b: Point, strict: bool) -> bool {
        let sa = self.side(a);
        let sb = self.side(b);
        if sa == Direction::Straight || sb == Direction::Straight {
            !strict
        } else {
            sa != sb
        }
    }

    /// True if `p` lies on the closed segment.
    pub fn contains_point(&self, p: Point) -> bool {
        self.side(p) == Direction::Straight && self.within_bounds(p)
    }

    /// True if `p` lies on the segment but is neither endpoint.
    pub fn contains_point_strict(&self, p: Point) -> bool {
        !self.has_point(p) && self.contains_point(p)
    }

    fn within_bounds(&self, p: Point) -> bool {
        p.x >= self.p1.x.min(self.p2.x)
            && p.x <= self.p1.x.max(self.p2.x)
            && p.y >= self.p1.y.min(self.p2.y)
            && p.y <= self.p1.y.max(self.p2.y)
    }

    /// True if the closed segments share at least one point.
    pub fn intersects(&self, other: &Edge) -> bool {
        let o1 = self.side(other.p1);
        let o2 = self.side(other.p2);
        let o3 = other.side(self.p1);
        let o4 = other.side(self.p2);
        if o1 != o2
            && o3 != o4
            && o1 != Direction::Straight
            && o2 != Direction::Straight
            && o3 != Direction::Straight
            && o4 != Direction::Straight
        {
            return true;
        }
        self.contains_point(other.p1)
            || self.contains_point(other.p2)
            || other.contains_point(self.p1)
            || other.contains_point(self.p2)
    }

    /// True if the segments cross at a single point interior to both.
    pub fn crosses(&self, other: &Edge) -> bool {
        self.is_between_points(other.p1, other.p2, true)
            && other.is_between_points(self.p1, self.p2, true)
    }

    /// True if the edges are collinear and share at least one point.
    pub fn overlaps(&self, other: &Edge) -> bool {
        self.side(other.p1) == Direction::Straight
            && self.side(other.p2) == Direction::Straight
            && (self.contains_point(other.p1)
                || self.contains_point(other.p2)
                || other.contains_point(self.p1)
                || other.contains_point(self.p2))
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl Display for Edge {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}-{}", self.p1, self.p2)
    }
}

impl From<(Point, Point)> for Edge {
    fn from((p1, p2): (Point, Point)) -> Self {
        Edge::new(p1, p2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn orientation_sign() {
        assert!(orientation(p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0)) > 0.0);
        assert!(orientation(p(0.0, 0.0), p(1.0, 0.0), p(0.0, -1.0)) < 0.0);
        assert_eq!(
            left_or_right(p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0)),
            Direction::Straight
        );
    }

    #[test]
    fn bad_collinear() {
        // Near-collinear points that a naive determinant gets wrong.
        let b = p(-10000.0, -1.0);
        let c = p(-9000.0, -1.0);
        let d = p(0.5, -1.0 - f64::EPSILON);
        assert_eq!(left_or_right(b, c, p(10000.0, -1.0)), Direction::Straight);
        assert_eq!(left_or_right(b, c, d), Direction::Right);
    }

    #[test]
    fn in_circle_ignores_winding() {
        let a = p(0.0, 0.0);
        let b = p(4.0, 0.0);
        let c = p(0.0, 4.0);
        let inside = p(1.0, 1.0);
        let outside = p(5.0, 5.0);
        assert!(in_circle(a, b, c, inside) > 0.0);
        assert!(in_circle(a, c, b, inside) > 0.0);
        assert!(in_circle(a, b, c, outside) < 0.0);
        // Cocircular.
        assert_eq!(in_circle(a, b, c, p(4.0, 4.0)), 0.0);
    }

    #[test]
    fn cocircular_square_has_one_legal_diagonal() {
        let s0 = p(0.0, 0.0);
        let s1 = p(1.0, 0.0);
        let s2 = p(1.0, 1.0);
        let s3 = p(0.0, 1.0);
        assert_eq!(in_circle(s0, s2, s1, s3), 0.0);
        let keep_02 = in_circle_perturbed(s0, s2, s1, s3) < 0.0;
        let keep_13 = in_circle_perturbed(s1, s3, s0, s2) < 0.0;
        assert!(keep_13);
        assert!(!keep_02);
        // Either triangle on a diagonal reaches the same verdict.
        assert_eq!(
            in_circle_perturbed(s0, s2, s1, s3) < 0.0,
            in_circle_perturbed(s0, s2, s3, s1) < 0.0
        );
        // Off the circle nothing changes.
        assert!(in_circle_perturbed(s0, s1, s2, p(0.5, 0.5)) > 0.0);
        assert!(in_circle_perturbed(s0, s1, s2, p(3.0, 3.0)) < 0.0);
    }

    #[quickcheck]
    fn perturbed_in_circle_is_decisive(a: Point, b: Point, c: Point, d: Point) -> TestResult {
        let ab = Edge::new(a, b);
        if collinear(a, b, c) || !ab.is_between_points(c, d, true) {
            return TestResult::discard();
        }
        let from_c = in_circle_perturbed(a, b, c, d);
        let from_d = in_circle_perturbed(a, b, d, c);
        TestResult::from_bool(from_c != 0.0 && (from_c > 0.0) == (from_d > 0.0))
    }

    #[test]
    fn collinear_cases() {
        assert!(collinear(p(0.0, 0.0), p(0.0, 0.0), p(3.0, 1.0)));
        assert!(collinear(p(1200.0, 680.0), p(1200.0, 720.0), p(1200.0, 760.0)));
        assert!(collinear(p(0.0, 0.0), p(1.0, 2.0), p(2.0, 4.0)));
        assert!(!collinear(p(1080.0, 640.0), p(1200.0, 680.0), p(1200.0, 720.0)));
    }

    #[test]
    fn radial_sort_from_twelve() {
        let mut points = vec![p(1.0, 0.0), p(0.0, -1.0), p(-1.0, 0.0), p(0.0, 1.0)];
        radial_sort(&mut points, Some(p(0.0, 0.0)));
        assert_eq!(
            points,
            vec![p(0.0, 1.0), p(-1.0, 0.0), p(0.0, -1.0), p(1.0, 0.0)]
        );
    }

    #[test]
    fn radial_sort_ties_nearest_first() {
        let mut points = vec![p(-4.0, 4.0), p(3.0, 3.0), p(-2.0, 2.0), p(1.0, 1.0)];
        radial_sort(&mut points, Some(p(0.0, 0.0)));
        assert_eq!(
            points,
            vec![p(-2.0, 2.0), p(-4.0, 4.0), p(1.0, 1.0), p(3.0, 3.0)]
        );
    }

    #[test]
    fn radial_sort_about_centroid() {
        let mut points = vec![p(0.0, 0.0), p(10.0, 10.0), p(0.0, 10.0), p(10.0, 0.0)];
        radial_sort(&mut points, None);
        assert_eq!(
            points,
            vec![p(0.0, 10.0), p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0)]
        );
    }

    #[quickcheck]
    fn radial_sort_is_ccw(points: Vec<Point>) -> bool {
        let mut points = points;
        let center = p(0.5, 0.5);
        radial_sort(&mut points, Some(center));
        points.windows(2).all(|w| {
            half_turn(center, w[0]) < half_turn(center, w[1])
                || left_or_right(center, w[0], w[1]) != Direction::Right
        })
    }

    #[test]
    fn edge_is_unordered() {
        let e1 = Edge::new(p(0.0, 0.0), p(1.0, 1.0));
        let e2 = Edge::new(p(1.0, 1.0), p(0.0, 0.0));
        assert_eq!(e1, e2);
        let set: std::collections::HashSet<Edge> = vec![e1, e2].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn is_between_points() {
        let edge = Edge::new(p(3.0, 0.0), p(3.0, 1.0));
        assert!(!edge.is_between_points(p(0.0, 0.0), p(0.0, 1.0), true));
        assert!(!edge.is_between_points(p(4.0, 0.0), p(4.0, 1.0), true));
        assert!(edge.is_between_points(p(0.0, 0.0), p(4.0, 1.0), true));

        let edge = Edge::new(p(3.0, 3.0), p(5.0, 5.0));
        // Coincident with the edge.
        assert!(!edge.is_between_points(p(4.0, 4.0), p(5.0, 4.0), true));
        assert!(edge.is_between_points(p(4.0, 4.0), p(5.0, 4.0), false));
        // Collinear with the edge.
        assert!(!edge.is_between_points(p(2.0, 2.0), p(2.0, 3.0), true));
        assert!(edge.is_between_points(p(2.0, 2.0), p(2.0, 3.0), false));
        // An edge endpoint.
        assert!(!edge.is_between_points(p(3.0, 3.0), p(3.0, 5.0), true));
        assert!(edge.is_between_points(p(3.0, 3.0), p(3.0, 5.0), false));
    }

    #[test]
    fn overlaps() {
        let e1 = Edge::new(p(3.0, 0.0), p(6.0, 3.0));
        assert!(e1.overlaps(&Edge::new(p(4.0, 1.0), p(5.0, 2.0))));
        assert!(e1.overlaps(&Edge::new(p(4.0, 1.0), p(6.0, 3.0))));
        assert!(e1.overlaps(&Edge::new(p(4.0, 1.0), p(7.0, 4.0))));
        assert!(e1.overlaps(&Edge::new(p(6.0, 3.0), p(7.0, 4.0))));
        assert!(!e1.overlaps(&Edge::new(p(4.0, 1.0), p(5.0, 1.0))));
        assert!(!e1.overlaps(&Edge::new(p(4.0, 1.0), p(6.0, 2.0))));
        assert!(!e1.overlaps(&Edge::new(p(7.0, 4.0), p(8.0, 5.0))));
    }

    #[test]
    fn intersects_and_crosses() {
        let e1 = Edge::new(p(0.0, 0.0), p(4.0, 4.0));
        let e2 = Edge::new(p(0.0, 4.0), p(4.0, 0.0));
        let touching = Edge::new(p(4.0, 4.0), p(8.0, 0.0));
        let apart = Edge::new(p(5.0, 0.0), p(9.0, 1.0));
        assert!(e1.intersects(&e2) && e1.crosses(&e2));
        assert!(e1.intersects(&touching) && !e1.crosses(&touching));
        assert!(!e1.intersects(&apart) && !e1.crosses(&apart));
    }
}
