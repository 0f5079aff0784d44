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
use mesh::{DedupTable, IndexedMesh, Vertex};

/// Accumulates one octant's output mesh. Scoped to a single [`crate::split_mesh`]
/// call (the "parent invocation" in the spec's boundary-sharing note) — never
/// reused across nodes, so it carries no cross-thread state.
pub(crate) struct OctantBuilder {
    has_normals: bool,
    has_uvs: bool,
    has_colors: bool,
    positions: Vec<f32>,
    normals: Vec<f32>,
    uvs: Vec<f32>,
    colors: Vec<f32>,
    indices: Vec<u32>,
    table: DedupTable,
}

impl OctantBuilder {
    pub(crate) fn new(has_normals: bool, has_uvs: bool, has_colors: bool) -> Self {
        Self {
            has_normals,
            has_uvs,
            has_colors,
            positions: Vec::new(),
            normals: Vec::new(),
            uvs: Vec::new(),
            colors: Vec::new(),
            indices: Vec::new(),
            table: DedupTable::new(),
        }
    }

    /// Interns one vertex, returning its index in this octant's buffers.
    /// Vertices with the same [`mesh::DedupKey`] collapse to one entry —
    /// this is what lets adjacent triangles along a shared edge reuse the
    /// same output vertex instead of each minting a fresh one.
    fn intern(&mut self, v: &Vertex) -> u32 {
        let key = v.dedup_key();
        let positions = &mut self.positions;
        let normals = &mut self.normals;
        let uvs = &mut self.uvs;
        let colors = &mut self.colors;
        let has_normals = self.has_normals;
        let has_uvs = self.has_uvs;
        let has_colors = self.has_colors;
        self.table.get_or_insert(key, || {
            let index = (positions.len() / 3) as u32;
            positions.push(v.position[0] as f32);
            positions.push(v.position[1] as f32);
            positions.push(v.position[2] as f32);
            if has_normals {
                let n = v.normal.unwrap_or([0.0, 0.0, 1.0]);
                normals.push(n[0] as f32);
                normals.push(n[1] as f32);
                normals.push(n[2] as f32);
            }
            if has_uvs {
                let uv = v.uv.unwrap_or([0.0, 0.0]);
                uvs.push(uv[0] as f32);
                uvs.push(uv[1] as f32);
            }
            if has_colors {
                let c = v.color.unwrap_or([1.0, 1.0, 1.0, 1.0]);
                colors.extend_from_slice(&c);
            }
            index
        })
    }

    pub(crate) fn push_triangle(&mut self, tri: [Vertex; 3]) {
        let indices = [self.intern(&tri[0]), self.intern(&tri[1]), self.intern(&tri[2])];
        self.indices.extend_from_slice(&indices);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub(crate) fn into_mesh(self, material: Option<usize>) -> IndexedMesh {
        IndexedMesh {
            positions: self.positions,
            normals: self.has_normals.then_some(self.normals),
            uvs: self.has_uvs.then_some(self.uvs),
            colors: self.has_colors.then_some(self.colors),
            indices: self.indices,
            material,
        }
    }
}
