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

//! Quadric-error-metric edge-collapse simplification (C1). Delegates the
//! actual collapse search to `meshopt`, the same native simplifier the
//! ecosystem reaches for everywhere else; this crate is responsible for
//! getting the mesh into and out of meshopt's buffer shape, honoring border
//! locks, and the vertex-compaction post-step spec.md §4.1 calls for.

mod border;
mod compact;
mod options;

pub use options::SimplifyOptions;

use border::border_vertex_locks;
use compact::compact_vertices;
use mesh::IndexedMesh;
use meshopt::{SimplifyOptions as MoptFlags, VertexDataAdapter};

/// Below this many input triangles, simplifying isn't worth the call —
/// spec.md §4.1's "mesh too small to simplify -> return a copy unchanged".
const MIN_TRIANGLES_TO_SIMPLIFY: usize = 4;

/// Outcome of one [`simplify`] call. `reached_target` is `false` when
/// meshopt stopped short of `target_ratio` because continuing would have
/// exceeded `target_error` — spec.md §4.1's "best-effort result with a
/// fidelity warning" case. The caller (the tileset builder) decides whether
/// and how loudly to log that.
#[derive(Debug)]
pub struct SimplifyOutcome {
    pub mesh: IndexedMesh,
    pub reached_target: bool,
}

/// Produces a simplified copy of `mesh` at `opts.target_ratio`. Never fails:
/// every failure mode in spec.md §4.1 is recovered locally and folded into
/// `SimplifyOutcome::reached_target`.
#[tracing::instrument(skip_all, fields(triangles = mesh.triangle_count(), ratio = opts.target_ratio))]
pub fn simplify(mesh: &IndexedMesh, opts: &SimplifyOptions) -> SimplifyOutcome {
    let triangle_count = mesh.triangle_count();
    if triangle_count < MIN_TRIANGLES_TO_SIMPLIFY || mesh.vertex_count() == 0 {
        return SimplifyOutcome {
            mesh: mesh.clone(),
            reached_target: true,
        };
    }

    let target_index_count = target_index_count(triangle_count, opts.target_ratio);
    if target_index_count >= mesh.indices.len() {
        return SimplifyOutcome {
            mesh: mesh.clone(),
            reached_target: true,
        };
    }

    let position_bytes = positions_as_bytes(&mesh.positions);
    let vertices = match VertexDataAdapter::new(&position_bytes, 12, 0) {
        Some(v) => v,
        None => {
            tracing::warn!("vertex buffer unsuitable for meshopt, skipping simplification");
            return SimplifyOutcome {
                mesh: mesh.clone(),
                reached_target: false,
            };
        }
    };

    let mut flags = MoptFlags::empty();
    if opts.lock_border {
        flags |= MoptFlags::LOCK_BORDER;
    }

    let mut result_error = 0f32;
    let simplified_indices = if has_attributes(mesh) {
        let attribute_bytes = attributes_as_bytes(mesh);
        let stride = attribute_stride(mesh);
        let attributes = VertexDataAdapter::new(&attribute_bytes, stride, 0);
        match attributes {
            Some(attributes) => meshopt::simplify_with_attributes_and_locks(
                &mesh.indices,
                &vertices,
                &attributes,
                &attribute_weights(mesh, opts),
                Some(&border_locks_u8(mesh, opts)),
                target_index_count,
                opts.target_error,
                flags,
                Some(&mut result_error),
            ),
            None => meshopt::simplify_with_locks(
                &mesh.indices,
                &vertices,
                &border_locks_u8(mesh, opts),
                target_index_count,
                opts.target_error,
                flags,
                Some(&mut result_error),
            ),
        }
    } else {
        meshopt::simplify_with_locks(
            &mesh.indices,
            &vertices,
            &border_locks_u8(mesh, opts),
            target_index_count,
            opts.target_error,
            flags,
            Some(&mut result_error),
        )
    };

    let reached_target = simplified_indices.len() <= target_index_count + 2;
    if !reached_target {
        tracing::warn!(
            result_error,
            achieved = simplified_indices.len() / 3,
            target = target_index_count / 3,
            "simplifier could not reach target ratio without exceeding error budget"
        );
    }

    let simplified = rebuild_mesh(mesh, simplified_indices);
    let should_compact = opts
        .skip_compaction_below
        .map(|threshold| simplified.vertex_count() >= threshold)
        .unwrap_or(true);
    let out = if should_compact {
        compact_vertices(&simplified)
    } else {
        simplified
    };

    SimplifyOutcome {
        mesh: out,
        reached_target,
    }
}

/// `round(triangle_count * ratio) * 3`, rounded down to a multiple of 3 as
/// spec.md §4.1 requires.
fn target_index_count(triangle_count: usize, ratio: f32) -> usize {
    let target_triangles = (triangle_count as f64 * ratio as f64).round() as usize;
    target_triangles.max(1) * 3
}

fn has_attributes(mesh: &IndexedMesh) -> bool {
    mesh.normals.is_some() || mesh.uvs.is_some()
}

fn attribute_stride(mesh: &IndexedMesh) -> usize {
    let mut floats = 0;
    if mesh.normals.is_some() {
        floats += 3;
    }
    if mesh.uvs.is_some() {
        floats += 2;
    }
    floats * 4
}

fn attribute_weights(mesh: &IndexedMesh, opts: &SimplifyOptions) -> Vec<f32> {
    let mut weights = Vec::new();
    if mesh.normals.is_some() {
        weights.extend([opts.normal_weight; 3]);
    }
    if mesh.uvs.is_some() {
        weights.extend([opts.uv_weight; 2]);
    }
    weights
}

fn attributes_as_bytes(mesh: &IndexedMesh) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(mesh.vertex_count() * attribute_stride(mesh));
    for v in 0..mesh.vertex_count() {
        if let Some(n) = mesh.normal(v) {
            for c in n {
                bytes.extend_from_slice(&c.to_le_bytes());
            }
        }
        if let Some(uv) = mesh.uv(v) {
            for c in uv {
                bytes.extend_from_slice(&c.to_le_bytes());
            }
        }
    }
    bytes
}

fn positions_as_bytes(positions: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(positions.len() * 4);
    for c in positions {
        bytes.extend_from_slice(&c.to_le_bytes());
    }
    bytes
}

fn border_locks_u8(mesh: &IndexedMesh, opts: &SimplifyOptions) -> Vec<u8> {
    if !opts.lock_border {
        return vec![0; mesh.vertex_count()];
    }
    border_vertex_locks(mesh)
        .into_iter()
        .map(|locked| locked as u8)
        .collect()
}

/// Rebuilds a full [`IndexedMesh`] from meshopt's simplified index buffer,
/// copying attributes straight through since meshopt only renumbers which
/// vertices are referenced, never their contents.
fn rebuild_mesh(mesh: &IndexedMesh, indices: Vec<u32>) -> IndexedMesh {
    IndexedMesh {
        positions: mesh.positions.clone(),
        normals: mesh.normals.clone(),
        uvs: mesh.uvs.clone(),
        colors: mesh.colors.clone(),
        indices,
        material: mesh.material,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn octahedron() -> IndexedMesh {
        // 6 vertices, 8 triangles: enough for meshopt to have something to do.
        let positions = vec![
            1.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0,
            -1.0,
        ];
        let indices = vec![
            0, 2, 4, 2, 1, 4, 1, 3, 4, 3, 0, 4, 0, 5, 2, 2, 5, 1, 1, 5, 3, 3, 5, 0,
        ];
        IndexedMesh::new(positions, indices)
    }

    #[test]
    fn tiny_mesh_is_returned_unchanged() {
        let mesh = IndexedMesh::new(
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            vec![0, 1, 2],
        );
        let out = simplify(&mesh, &SimplifyOptions::default());
        assert_eq!(out.mesh.triangle_count(), 1);
        assert!(out.reached_target);
    }

    #[test]
    fn ratio_one_is_a_no_op_shortcut() {
        let mesh = octahedron();
        let opts = SimplifyOptions {
            target_ratio: 1.0,
            ..SimplifyOptions::default()
        };
        let out = simplify(&mesh, &opts);
        assert_eq!(out.mesh.triangle_count(), mesh.triangle_count());
    }

    #[test]
    fn empty_mesh_round_trips() {
        let mesh = IndexedMesh::default();
        let out = simplify(&mesh, &SimplifyOptions::default());
        assert!(out.mesh.is_empty());
        assert!(out.reached_target);
    }
}
