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
use mesh::{DedupKey, IndexedMesh};
use std::collections::{HashMap, VecDeque};

/// A connected component of triangles under UV-aware edge adjacency
/// (spec.md §4.4). Two triangles that touch in 3D but diverge in UV never
/// land in the same island, because the adjacency key below folds UV into
/// vertex identity.
#[derive(Clone, Debug)]
pub struct UvIsland {
    pub triangles: Vec<usize>,
    /// UV bounds after wrapping any coordinate outside `[0,1]` back into its
    /// tile by subtracting `floor(min)`.
    pub uv_min: [f64; 2],
    pub uv_max: [f64; 2],
    /// The `floor(min)` offset subtracted to produce `uv_min`/`uv_max`; a
    /// per-vertex UV must be wrapped by this same offset before comparing
    /// against them, since the vertex's raw UV was never itself wrapped.
    pub wrap: [f64; 2],
}

/// Partitions every triangle of `mesh` into UV islands via BFS over the
/// edge-adjacency relation keyed by `{DedupKey(a), DedupKey(b)}`.
pub fn detect_islands(mesh: &IndexedMesh) -> Vec<UvIsland> {
    let triangle_count = mesh.triangle_count();
    if triangle_count == 0 {
        return Vec::new();
    }

    let keys: Vec<[DedupKey; 3]> = (0..triangle_count)
        .map(|t| {
            let tri = mesh.triangle(t);
            [
                mesh.vertex_record(tri[0] as usize).dedup_key(),
                mesh.vertex_record(tri[1] as usize).dedup_key(),
                mesh.vertex_record(tri[2] as usize).dedup_key(),
            ]
        })
        .collect();

    let mut adjacency: HashMap<(DedupKey, DedupKey), Vec<usize>> = HashMap::new();
    for (t, k) in keys.iter().enumerate() {
        for i in 0..3 {
            let edge = DedupKey::edge_key(k[i], k[(i + 1) % 3]);
            adjacency.entry(edge).or_default().push(t);
        }
    }

    let mut visited = vec![false; triangle_count];
    let mut islands = Vec::new();
    for start in 0..triangle_count {
        if visited[start] {
            continue;
        }
        let mut members = Vec::new();
        let mut queue = VecDeque::from([start]);
        visited[start] = true;
        while let Some(t) = queue.pop_front() {
            members.push(t);
            let k = &keys[t];
            for i in 0..3 {
                let edge = DedupKey::edge_key(k[i], k[(i + 1) % 3]);
                for &neighbor in &adjacency[&edge] {
                    if !visited[neighbor] {
                        visited[neighbor] = true;
                        queue.push_back(neighbor);
                    }
                }
            }
        }
        islands.push(bounds_of(mesh, &members));
    }
    islands
}

fn bounds_of(mesh: &IndexedMesh, triangles: &[usize]) -> UvIsland {
    let mut lo = [f64::INFINITY; 2];
    let mut hi = [f64::NEG_INFINITY; 2];
    for &t in triangles {
        for &vi in &mesh.triangle(t) {
            let uv = mesh.uv(vi as usize).unwrap_or([0.0, 0.0]);
            for i in 0..2 {
                lo[i] = lo[i].min(uv[i] as f64);
                hi[i] = hi[i].max(uv[i] as f64);
            }
        }
    }
    // Wrap UVs living outside [0,1] back into their tile before measuring,
    // per spec.md §4.4.
    let wrap = [lo[0].floor(), lo[1].floor()];
    UvIsland {
        triangles: triangles.to_vec(),
        uv_min: [lo[0] - wrap[0], lo[1] - wrap[1]],
        uv_max: [hi[0] - wrap[0], hi[1] - wrap[1]],
        wrap,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_two_islands() -> IndexedMesh {
        // Two triangles share an edge in 3D (vertices 1,2) but their UVs at
        // that edge disagree, so they must land in separate islands.
        let mut mesh = IndexedMesh::new(
            vec![
                0.0, 0.0, 0.0, // 0
                1.0, 0.0, 0.0, // 1
                1.0, 1.0, 0.0, // 2
                0.0, 1.0, 0.0, // 3 (duplicate position group reused below)
                1.0, 0.0, 0.0, // 4, shares position with 1 but different UV
                1.0, 1.0, 0.0, // 5, shares position with 2 but different UV
            ],
            vec![0, 1, 2, 0, 5, 4],
        );
        mesh.uvs = Some(vec![
            0.0, 0.0, // 0
            1.0, 0.0, // 1
            1.0, 1.0, // 2
            0.0, 1.0, // 3
            2.0, 0.0, // 4 (disjoint UV region)
            2.0, 1.0, // 5
        ]);
        mesh
    }

    #[test]
    fn triangles_with_diverging_uv_at_a_shared_edge_split_into_separate_islands() {
        let mesh = quad_two_islands();
        let islands = detect_islands(&mesh);
        assert_eq!(islands.len(), 2);
    }

    #[test]
    fn single_connected_uv_region_is_one_island() {
        let mut mesh = IndexedMesh::new(
            vec![
                0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0,
            ],
            vec![0, 1, 2, 0, 2, 3],
        );
        mesh.uvs = Some(vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0]);
        let islands = detect_islands(&mesh);
        assert_eq!(islands.len(), 1);
        assert_eq!(islands[0].triangles.len(), 2);
    }

    #[test]
    fn empty_mesh_has_no_islands() {
        assert!(detect_islands(&IndexedMesh::default()).is_empty());
    }

    #[test]
    fn uvs_outside_unit_range_are_wrapped_before_measuring() {
        let mut mesh = IndexedMesh::new(
            vec![
                0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0,
            ],
            vec![0, 1, 2, 0, 2, 3],
        );
        // Every UV sits one tile over; the island's measured bounds should
        // still come out as [0,1] once wrapped, with `wrap` recording the
        // offset that was subtracted.
        mesh.uvs = Some(vec![2.0, 3.0, 3.0, 3.0, 3.0, 4.0, 2.0, 4.0]);
        let islands = detect_islands(&mesh);
        assert_eq!(islands.len(), 1);
        assert_eq!(islands[0].wrap, [2.0, 3.0]);
        assert!((islands[0].uv_min[0] - 0.0).abs() < 1e-9);
        assert!((islands[0].uv_max[0] - 1.0).abs() < 1e-9);
    }
}
