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
use mesh::IndexedMesh;
use std::collections::HashMap;

/// Returns one lock flag per vertex: `true` for every vertex that is an
/// endpoint of a border edge (an edge adjacent to exactly one triangle).
/// These are the tile's open edges that `split_mesh` will later clip along,
/// so collapsing or moving them here would reopen the cracks the octree
/// splitter's dedup closes.
pub(crate) fn border_vertex_locks(mesh: &IndexedMesh) -> Vec<bool> {
    let mut edge_face_count: HashMap<(u32, u32), u32> = HashMap::new();
    for t in 0..mesh.triangle_count() {
        let tri = mesh.triangle(t);
        for i in 0..3 {
            let a = tri[i];
            let b = tri[(i + 1) % 3];
            let key = if a < b { (a, b) } else { (b, a) };
            *edge_face_count.entry(key).or_insert(0) += 1;
        }
    }
    let mut locked = vec![false; mesh.vertex_count()];
    for (&(a, b), &count) in &edge_face_count {
        if count == 1 {
            locked[a as usize] = true;
            locked[b as usize] = true;
        }
    }
    locked
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh::IndexedMesh;

    #[test]
    fn single_triangle_has_all_vertices_on_the_border() {
        let mesh = IndexedMesh::new(
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            vec![0, 1, 2],
        );
        let locks = border_vertex_locks(&mesh);
        assert_eq!(locks, vec![true, true, true]);
    }

    #[test]
    fn shared_interior_edge_is_not_a_border() {
        // Two triangles sharing edge (1,2) form a quad; the shared edge's
        // endpoints still touch two other border edges each, so they stay
        // locked, but the edge itself has face count 2.
        let mesh = IndexedMesh::new(
            vec![
                0.0, 0.0, 0.0, // 0
                1.0, 0.0, 0.0, // 1
                1.0, 1.0, 0.0, // 2
                0.0, 1.0, 0.0, // 3
            ],
            vec![0, 1, 2, 0, 2, 3],
        );
        let locks = border_vertex_locks(&mesh);
        assert!(locks.iter().all(|&l| l), "quad boundary is all border");
    }
}
