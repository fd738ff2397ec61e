//! A plain-data copy of a mesh, for caching a built mesh and for debugging.
use super::TriangleGraph;
use crate::config::MeshConfig;
use crate::error::Result;
use crate::point::*;
use crate::predicates::Edge;
use crate::triangle::Triangle;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshSnapshot {
    pub vertices: Vec<Point>,
    pub edges: Vec<Edge>,
    pub fixed_edges: Vec<Edge>,
    pub triangles: Vec<Triangle>,
}

impl TriangleGraph {
    pub fn snapshot(&self) -> MeshSnapshot {
        MeshSnapshot {
            vertices: self.graph.vertices().collect(),
            edges: self.graph.edges(),
            fixed_edges: self.fixed.edges(),
            triangles: self.triangles.iter().map(|(_, t)| *t).collect(),
        }
    }

    /// Rebuild a mesh from a snapshot. The dual graph is derived again from
    /// the triangles and fixed edges.
    pub fn from_snapshot(snapshot: &MeshSnapshot, config: MeshConfig) -> Result<Self> {
        let mut mesh = Self::with_config(config);
        for p in snapshot.vertices.iter() {
            mesh.graph.add_vertex(*p)?;
        }
        for e in snapshot.edges.iter() {
            mesh.graph.add_edge_and_vertices(e.p1, e.p2)?;
        }
        for t in snapshot.triangles.iter() {
            mesh.add_triangle(Triangle::new(t.p1, t.p2, t.p3)?)?;
        }
        for e in snapshot.fixed_edges.iter() {
            mesh.add_fixed_edge(*e)?;
        }
        Ok(mesh)
    }

    pub fn debug_table(&self) -> String {
        use prettytable::{Cell, Row, Table};
        let mut table = Table::new();
        let mut headers = Row::empty();
        headers.add_cell(Cell::new("Triangle"));
        headers.add_cell(Cell::new("Points"));
        headers.add_cell(Cell::new("Polypoint"));
        headers.add_cell(Cell::new("Neighbours"));
        table.add_row(headers);
        for (i, t) in self.triangles.iter() {
            let mut row = Row::empty();
            row.add_cell(Cell::new(&format!("T{}", i)));
            row.add_cell(Cell::new(&format!("{}", t)));
            let polypoint = self
                .polypoints
                .get(i)
                .map(|pp| pp.point.to_string())
                .unwrap_or_else(|| String::from("-"));
            row.add_cell(Cell::new(&polypoint));
            let neighbours: Vec<String> = self
                .polypoints
                .neighbours(i)
                .unwrap_or(&[])
                .iter()
                .map(|n| format!("T{}", n))
                .collect();
            row.add_cell(Cell::new(&neighbours.join(" ")));
            table.add_row(row);
        }
        table.to_string()
    }
}
