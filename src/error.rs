use crate::point::Point;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MeshError>;

/// Contract violations raised by the mesh. None of these are transient: the
/// remedy is to rebuild the mesh from the authoritative map data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    #[error("point {0} has a non-finite coordinate")]
    NonFinitePoint(Point),
    #[error("{0} is already a vertex of the mesh")]
    DuplicateVertex(Point),
    #[error("{0} is not a vertex of the graph")]
    MissingVertex(Point),
    #[error("{0}-{1} is not an edge of the graph")]
    MissingEdge(Point, Point),
    #[error("cannot connect {0} to itself")]
    SelfLoop(Point),
    #[error("{0} still has {1} attached edges")]
    VertexHasEdges(Point, usize),
    #[error("triangle {0}, {1}, {2} has no area")]
    DegenerateTriangle(Point, Point, Point),
    #[error("no triangle {0}, {1}, {2} in the mesh")]
    MissingTriangle(Point, Point, Point),
    #[error("{0} does not lie within the triangulated region")]
    PointOutsideMesh(Point),
    #[error("{0} lies in {1} triangles")]
    AmbiguousLocation(Point, usize),
    #[error("found {2} points opposite {0}-{1}")]
    AmbiguousOppositePoint(Point, Point, usize),
    #[error("the region crossed by constraint {0}-{1} does not split into two chains")]
    MalformedConstraint(Point, Point),
    #[error("constraint {0}-{1} crosses fixed edge {2}-{3}")]
    ConstraintCrossesFixedEdge(Point, Point, Point, Point),
    #[error("no legal triangle closes the region based on {0}-{1}")]
    NoLegalRegionSplit(Point, Point),
    #[error("the neighbours of {0} do not form a closed ring")]
    OpenVertexRing(Point),
    #[error("no legal ear around {0}")]
    NoLegalEar(Point),
    #[error("fixed edge {1}-{0} prevents removing {0}")]
    FixedEdgeBlocksRemoval(Point, Point),
    #[error("{0} does not have exactly two fixed neighbours")]
    NotACorner(Point),
    #[error("the boundary is not a convex polygon")]
    NonConvexBoundary,
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}
