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

/// Below this many input vertices, skipping compaction saves more allocator
/// churn than it would reclaim — spec.md §4.1's "savings are smaller than
/// the allocation overhead" threshold for deep tile levels.
pub const DEFAULT_SKIP_COMPACTION_BELOW: usize = 256;

/// Renumbers `mesh` so only vertices reachable from `mesh.indices` survive,
/// in first-appearance order. Mirrors the simplifier's own output: after an
/// edge-collapse pass the index buffer typically references a strict subset
/// of the input vertex buffer.
pub(crate) fn compact_vertices(mesh: &IndexedMesh) -> IndexedMesh {
    let mut remap = vec![u32::MAX; mesh.vertex_count()];
    let mut next = 0u32;
    for &old in &mesh.indices {
        if remap[old as usize] == u32::MAX {
            remap[old as usize] = next;
            next += 1;
        }
    }

    let new_count = next as usize;
    let mut positions = Vec::with_capacity(new_count * 3);
    let mut normals = mesh.normals.as_ref().map(|_| Vec::with_capacity(new_count * 3));
    let mut uvs = mesh.uvs.as_ref().map(|_| Vec::with_capacity(new_count * 2));
    let mut colors = mesh.colors.as_ref().map(|_| Vec::with_capacity(new_count * 4));

    // Walk old indices in order so `positions[new]` lands at the index the
    // remap table assigned it, without a second reverse-lookup pass.
    let mut placed = vec![false; new_count];
    for &old in &mesh.indices {
        let new = remap[old as usize] as usize;
        if placed[new] {
            continue;
        }
        placed[new] = true;
        positions.extend_from_slice(&mesh.position(old as usize));
        if let (Some(dst), Some(n)) = (normals.as_mut(), mesh.normal(old as usize)) {
            dst.extend_from_slice(&n);
        }
        if let (Some(dst), Some(uv)) = (uvs.as_mut(), mesh.uv(old as usize)) {
            dst.extend_from_slice(&uv);
        }
        if let (Some(dst), Some(c)) = (colors.as_mut(), mesh.color(old as usize)) {
            dst.extend_from_slice(&c);
        }
    }

    let indices = mesh.indices.iter().map(|&old| remap[old as usize]).collect();

    IndexedMesh {
        positions,
        normals: normals.take(),
        uvs: uvs.take(),
        colors: colors.take(),
        indices,
        material: mesh.material,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_unreferenced_vertices() {
        let mesh = IndexedMesh::new(
            vec![
                0.0, 0.0, 0.0, // 0 used
                9.0, 9.0, 9.0, // 1 unused
                1.0, 0.0, 0.0, // 2 used
                0.0, 1.0, 0.0, // 3 used
            ],
            vec![0, 2, 3],
        );
        let compacted = compact_vertices(&mesh);
        assert_eq!(compacted.vertex_count(), 3);
        assert_eq!(compacted.triangle_count(), 1);
    }

    #[test]
    fn preserves_attribute_presence() {
        let mut mesh = IndexedMesh::new(
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            vec![0, 1, 2],
        );
        mesh.uvs = Some(vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
        let compacted = compact_vertices(&mesh);
        assert!(compacted.uvs.is_some());
        assert!(compacted.normals.is_none());
    }
}
