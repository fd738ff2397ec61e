//! Navigation meshes for tile maps: a constrained Delaunay triangulation that
//! is patched in place as obstacles appear and disappear, and the polypoint
//! dual graph a path planner searches over it.
//!
//! ```
//! use navtri::{Edge, Point, TriangleGraph};
//!
//! let boundary = [
//!     Point::new(0.0, 0.0),
//!     Point::new(0.0, 100.0),
//!     Point::new(100.0, 100.0),
//!     Point::new(100.0, 0.0),
//! ];
//! let wall = Edge::new(Point::new(20.0, 50.0), Point::new(80.0, 50.0));
//! let mesh = TriangleGraph::build(&boundary, &[wall]).unwrap();
//! assert!(mesh.is_fixed(wall));
//! mesh.validate().unwrap();
//! ```
pub mod config;
pub mod error;
pub mod graph;
pub mod point;
pub mod predicates;
pub mod triangle;
pub mod triangulation;

pub use config::MeshConfig;
pub use error::{MeshError, Result};
pub use graph::PlanarGraph;
pub use point::Point;
pub use predicates::{Direction, Edge};
pub use triangle::{Polypoint, Triangle};
pub use triangulation::{PolypointGraph, TriangleGraph, TriangleIndex};
