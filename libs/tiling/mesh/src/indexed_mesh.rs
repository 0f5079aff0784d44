// This file is part of Nitrogen.
//
// Nitrogen is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// Nitrogen is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with Nitrogen.  If not, see <http://www.gnu.org/licenses/>.
use crate::{bounds::bounding_box_of_points, BoundingBox, MeshError, Vertex};

/// The unit of work for every stage of the tiling core. Exclusively owned by
/// whichever pipeline stage currently holds it; a mesh produced by splitting
/// a parent owns disjoint, freshly allocated vertex/index buffers (no
/// sharing back to the parent).
#[derive(Clone, Debug, Default)]
pub struct IndexedMesh {
    /// 3 floats per vertex.
    pub positions: Vec<f32>,
    /// 3 floats per vertex, when present.
    pub normals: Option<Vec<f32>>,
    /// 2 floats per vertex, when present.
    pub uvs: Option<Vec<f32>>,
    /// 4 floats (RGBA) per vertex, when present.
    pub colors: Option<Vec<f32>>,
    /// 3 indices per triangle.
    pub indices: Vec<u32>,
    pub material: Option<usize>,
}

impl IndexedMesh {
    pub fn new(positions: Vec<f32>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            normals: None,
            uvs: None,
            colors: None,
            indices,
            material: None,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Checks the structural invariants from the data model: attribute
    /// arrays agree on vertex count with positions, and every index is in
    /// range. Does not check geometric validity (degenerate triangles are a
    /// clipper/simplifier concern, not a structural one).
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.positions.len() % 3 != 0 {
            return Err(MeshError::MisalignedPositions(self.positions.len()));
        }
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::MisalignedIndices(self.indices.len()));
        }
        let vertex_count = self.vertex_count();
        if let Some(normals) = &self.normals {
            check_attribute("normals", normals.len() / 3, vertex_count)?;
        }
        if let Some(uvs) = &self.uvs {
            check_attribute("uvs", uvs.len() / 2, vertex_count)?;
        }
        if let Some(colors) = &self.colors {
            check_attribute("colors", colors.len() / 4, vertex_count)?;
        }
        for &index in &self.indices {
            if index as usize >= vertex_count {
                return Err(MeshError::IndexOutOfBounds {
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    pub fn position(&self, vertex: usize) -> [f32; 3] {
        let o = vertex * 3;
        [self.positions[o], self.positions[o + 1], self.positions[o + 2]]
    }

    pub fn normal(&self, vertex: usize) -> Option<[f32; 3]> {
        self.normals.as_ref().map(|n| {
            let o = vertex * 3;
            [n[o], n[o + 1], n[o + 2]]
        })
    }

    pub fn uv(&self, vertex: usize) -> Option<[f32; 2]> {
        self.uvs.as_ref().map(|u| {
            let o = vertex * 2;
            [u[o], u[o + 1]]
        })
    }

    pub fn color(&self, vertex: usize) -> Option<[f32; 4]> {
        self.colors.as_ref().map(|c| {
            let o = vertex * 4;
            [c[o], c[o + 1], c[o + 2], c[o + 3]]
        })
    }

    /// The 3 vertex indices of triangle `t`.
    pub fn triangle(&self, t: usize) -> [u32; 3] {
        let o = t * 3;
        [self.indices[o], self.indices[o + 1], self.indices[o + 2]]
    }

    /// Build a full attribute [`Vertex`] record for one corner of a
    /// triangle, for handoff to the clipper or atlas packer.
    pub fn vertex_record(&self, vertex: usize) -> Vertex {
        let p = self.position(vertex);
        Vertex {
            position: [p[0] as f64, p[1] as f64, p[2] as f64],
            normal: self
                .normal(vertex)
                .map(|n| [n[0] as f64, n[1] as f64, n[2] as f64]),
            uv: self.uv(vertex).map(|uv| [uv[0] as f64, uv[1] as f64]),
            color: self.color(vertex),
        }
    }

    pub fn triangle_vertices(&self, t: usize) -> [Vertex; 3] {
        let tri = self.triangle(t);
        [
            self.vertex_record(tri[0] as usize),
            self.vertex_record(tri[1] as usize),
            self.vertex_record(tri[2] as usize),
        ]
    }

    pub fn triangle_aabb(&self, t: usize) -> BoundingBox {
        let tri = self.triangle(t);
        let positions: Vec<[f32; 3]> = tri.iter().map(|&i| self.position(i as usize)).collect();
        bounding_box_of_points(positions.iter()).expect("triangle has 3 vertices")
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        if self.vertex_count() == 0 {
            return None;
        }
        let positions: Vec<[f32; 3]> = (0..self.vertex_count()).map(|i| self.position(i)).collect();
        bounding_box_of_points(positions.iter())
    }

    /// Total triangle area, used by the triangle-conservation test across a
    /// split (area(parent) == sum(area(children)) within tolerance).
    pub fn total_area(&self) -> f64 {
        (0..self.triangle_count())
            .map(|t| triangle_area(self.triangle_aabb_positions(t)))
            .sum()
    }

    fn triangle_aabb_positions(&self, t: usize) -> [[f64; 3]; 3] {
        let tri = self.triangle(t);
        let mut out = [[0.0; 3]; 3];
        for (slot, &i) in tri.iter().enumerate() {
            let p = self.position(i as usize);
            out[slot] = [p[0] as f64, p[1] as f64, p[2] as f64];
        }
        out
    }
}

fn triangle_area(v: [[f64; 3]; 3]) -> f64 {
    let e1 = sub(v[1], v[0]);
    let e2 = sub(v[2], v[0]);
    let c = cross(e1, e2);
    0.5 * (c[0] * c[0] + c[1] * c[1] + c[2] * c[2]).sqrt()
}

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn check_attribute(name: &'static str, got: usize, expected: usize) -> Result<(), MeshError> {
    if got != expected {
        return Err(MeshError::AttributeVertexMismatch {
            attribute: name,
            expected,
            got,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> IndexedMesh {
        IndexedMesh::new(
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            vec![0, 1, 2],
        )
    }

    #[test]
    fn validates_clean_mesh() {
        assert!(unit_triangle().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_index() {
        let mut mesh = unit_triangle();
        mesh.indices[2] = 99;
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn area_of_unit_right_triangle_is_half() {
        let mesh = unit_triangle();
        assert!((mesh.total_area() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn bounding_box_matches_extents() {
        let mesh = unit_triangle();
        let bb = mesh.bounding_box().unwrap();
        assert_eq!(bb.low(0), 0.0);
        assert_eq!(bb.high(0), 1.0);
    }
}
