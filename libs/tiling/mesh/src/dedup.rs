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
use std::collections::HashMap;

/// Quantization step for positions; matched to the f32 precision the source
/// vertex data is stored at, so two vertices produced by two different clip
/// operations land on the same key whenever they describe the same point.
const POSITION_EPSILON: f64 = 1e-5;
const UV_EPSILON: f64 = 1e-6;
const NORMAL_EPSILON: f64 = 1e-4;

fn quantize(v: f64, epsilon: f64) -> i64 {
    (v / epsilon).round() as i64
}

/// Boundary-vertex identity: two vertices with the same key are the same
/// point for the purpose of stitching tile/clip boundaries back together.
/// Including UV (not just position) in the key is what keeps a UV seam from
/// being accidentally welded shut (see [`crate::DedupKey`] docs at module
/// level for the failure this avoids).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct DedupKey {
    position: [i64; 3],
    uv: Option<[i64; 2]>,
    normal: Option<[i64; 3]>,
}

impl DedupKey {
    pub fn quantize(position: [f64; 3], uv: Option<[f64; 2]>, normal: Option<[f64; 3]>) -> Self {
        Self {
            position: [
                quantize(position[0], POSITION_EPSILON),
                quantize(position[1], POSITION_EPSILON),
                quantize(position[2], POSITION_EPSILON),
            ],
            uv: uv.map(|uv| [quantize(uv[0], UV_EPSILON), quantize(uv[1], UV_EPSILON)]),
            normal: normal.map(|n| {
                [
                    quantize(n[0], NORMAL_EPSILON),
                    quantize(n[1], NORMAL_EPSILON),
                    quantize(n[2], NORMAL_EPSILON),
                ]
            }),
        }
    }

    /// Unordered key for an edge between two vertex identities, used by the
    /// atlas packer's UV-aware adjacency map. `{a, b}` and `{b, a}` collide.
    pub fn edge_key(a: DedupKey, b: DedupKey) -> (DedupKey, DedupKey) {
        if a.position <= b.position && a.uv <= b.uv {
            (a, b)
        } else {
            (b, a)
        }
    }
}

/// Scoped to one clip/split/pack invocation; never shared across nodes, or
/// independent subtrees would serialize on a lock for no benefit (see
/// design note: "resist the temptation to share across nodes").
#[derive(Default)]
pub struct DedupTable {
    index_of: HashMap<DedupKey, u32>,
}

impl DedupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the existing index for `key` if seen before in this table,
    /// otherwise calls `insert` to create a new vertex and remembers its index.
    pub fn get_or_insert(&mut self, key: DedupKey, insert: impl FnOnce() -> u32) -> u32 {
        if let Some(&index) = self.index_of.get(&key) {
            return index;
        }
        let index = insert();
        self.index_of.insert(key, index);
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_points_share_a_key() {
        let a = DedupKey::quantize([1.0, 2.0, 3.0], Some([0.5, 0.5]), None);
        let b = DedupKey::quantize([1.0, 2.0, 3.0], Some([0.5, 0.5]), None);
        assert_eq!(a, b);
    }

    #[test]
    fn same_position_different_uv_is_a_different_key() {
        let a = DedupKey::quantize([1.0, 2.0, 3.0], Some([0.0, 0.0]), None);
        let b = DedupKey::quantize([1.0, 2.0, 3.0], Some([1.0, 0.0]), None);
        assert_ne!(a, b);
    }

    #[test]
    fn dedup_table_reuses_indices() {
        let mut table = DedupTable::new();
        let key = DedupKey::quantize([0.0, 0.0, 0.0], None, None);
        let mut next = 0u32;
        let i0 = table.get_or_insert(key, || {
            let i = next;
            next += 1;
            i
        });
        let i1 = table.get_or_insert(key, || {
            let i = next;
            next += 1;
            i
        });
        assert_eq!(i0, i1);
        assert_eq!(next, 1);
    }
}
