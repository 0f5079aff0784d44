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

//! Splits a mesh into up to 8 spatial children, one per octant of its
//! bounding box. The ~80-95% of triangles that don't straddle a midplane
//! take a fast path that skips clipping entirely; the rest are clipped
//! against the 3 midplanes via the `clip` crate.

mod builder;

use builder::OctantBuilder;
use clip::{clip_polygon, triangulate_fan, Axis, KeepSide};
use mesh::{BoundingBox, BoundingBoxExt, IndexedMesh, Octant, Vertex};

/// Splits `mesh` into 8 child meshes, one per octant of `bounds`. Empty
/// octants come back as empty meshes (0 triangles), not absent — callers
/// decide whether to recurse into them.
#[tracing::instrument(skip_all, fields(triangles = mesh.triangle_count()))]
pub fn split_mesh(mesh: &IndexedMesh, bounds: &BoundingBox) -> [IndexedMesh; 8] {
    let has_normals = mesh.normals.is_some();
    let has_uvs = mesh.uvs.is_some();
    let has_colors = mesh.colors.is_some();
    let mut builders: Vec<OctantBuilder> = (0..8)
        .map(|_| OctantBuilder::new(has_normals, has_uvs, has_colors))
        .collect();

    let mid = bounds.midpoint();
    let mut fast_pathed = 0usize;
    for t in 0..mesh.triangle_count() {
        let tri = mesh.triangle_vertices(t);
        match fast_octant(&tri, mid) {
            Some(octant) => {
                fast_pathed += 1;
                builders[octant.index()].push_triangle(tri);
            }
            None => {
                for (octant, polygon) in split_triangle_into_octants(tri, mid) {
                    for out_tri in triangulate_fan(&polygon) {
                        builders[octant.index()].push_triangle(out_tri);
                    }
                }
            }
        }
    }
    tracing::debug!(
        fast_pathed,
        slow_pathed = mesh.triangle_count() - fast_pathed,
        "split triangles into octants"
    );

    let material = mesh.material;
    let mut out = builders.into_iter().map(|b| b.into_mesh(material));
    // `[T; 8]` has no safe from-iterator constructor pre-array_try_from, but
    // we know the iterator yields exactly 8 items.
    std::array::from_fn(|_| out.next().expect("8 octant builders"))
}

/// If every vertex of `tri` lies in one octant (the triangle's AABB doesn't
/// straddle the midplane on any axis), returns that octant. This is the
/// mandatory-for-throughput fast path: it skips clipping for the triangles
/// that don't need it.
fn fast_octant(tri: &[Vertex; 3], mid: [f64; 3]) -> Option<Octant> {
    let mut bits = [false; 3];
    for axis in 0..3 {
        let coords = [tri[0].axis(axis), tri[1].axis(axis), tri[2].axis(axis)];
        let lo = coords[0].min(coords[1]).min(coords[2]);
        let hi = coords[0].max(coords[1]).max(coords[2]);
        if hi <= mid[axis] {
            bits[axis] = false;
        } else if lo >= mid[axis] {
            bits[axis] = true;
        } else {
            return None;
        }
    }
    Some(Octant::from_bits(bits[0], bits[1], bits[2]))
}

/// Clips `tri` against all 3 midplanes by recursive bisection (X, then Y,
/// then Z), reusing each intermediate half against the next axis instead of
/// reclipping from scratch per octant.
fn split_triangle_into_octants(tri: [Vertex; 3], mid: [f64; 3]) -> Vec<(Octant, Vec<Vertex>)> {
    let polygon = vec![tri[0], tri[1], tri[2]];
    let by_x = [
        (false, clip_polygon(&polygon, Axis::X, mid[0], KeepSide::LessOrEqual)),
        (true, clip_polygon(&polygon, Axis::X, mid[0], KeepSide::GreaterOrEqual)),
    ];
    let mut by_xy = Vec::with_capacity(4);
    for (x_pos, poly) in &by_x {
        by_xy.push((*x_pos, false, clip_polygon(poly, Axis::Y, mid[1], KeepSide::LessOrEqual)));
        by_xy.push((*x_pos, true, clip_polygon(poly, Axis::Y, mid[1], KeepSide::GreaterOrEqual)));
    }
    let mut out = Vec::with_capacity(8);
    for (x_pos, y_pos, poly) in &by_xy {
        let neg_z = clip_polygon(poly, Axis::Z, mid[2], KeepSide::LessOrEqual);
        let pos_z = clip_polygon(poly, Axis::Z, mid[2], KeepSide::GreaterOrEqual);
        out.push((Octant::from_bits(*x_pos, *y_pos, false), neg_z));
        out.push((Octant::from_bits(*x_pos, *y_pos, true), pos_z));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_mesh(positions: Vec<f32>, indices: Vec<u32>) -> IndexedMesh {
        IndexedMesh::new(positions, indices)
    }

    #[test]
    fn straddling_triangle_conserves_area() {
        // Spec scenario 3: one triangle straddling x = 0.5.
        let mesh = triangle_mesh(
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5, 1.0, 0.0],
            vec![0, 1, 2],
        );
        let bounds = BoundingBox::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let children = split_mesh(&mesh, &bounds);
        let total: f64 = children.iter().map(|c| c.total_area()).sum();
        let parent_area = mesh.total_area();
        assert!((total - parent_area).abs() < 1e-4 * parent_area);
    }

    #[test]
    fn straddling_triangle_splits_into_expected_shapes() {
        let mesh = triangle_mesh(
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5, 1.0, 0.0],
            vec![0, 1, 2],
        );
        let bounds = BoundingBox::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let children = split_mesh(&mesh, &bounds);
        // -x side (octant 0, y and z both negative too since mesh lies in z=0, y<=1 spans both).
        let neg_x_count: usize = children
            .iter()
            .enumerate()
            .filter(|(i, c)| !octree_octant_is_positive(*i, 0) && !c.is_empty())
            .map(|(_, c)| c.triangle_count())
            .sum();
        assert!(neg_x_count >= 1);
    }

    fn octree_octant_is_positive(index: usize, axis: usize) -> bool {
        (index >> axis) & 1 == 1
    }

    #[test]
    fn fully_contained_triangle_is_fast_pathed_into_one_child() {
        let mesh = triangle_mesh(
            vec![0.1, 0.1, 0.1, 0.2, 0.1, 0.1, 0.1, 0.2, 0.1],
            vec![0, 1, 2],
        );
        let bounds = BoundingBox::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let children = split_mesh(&mesh, &bounds);
        let non_empty = children.iter().filter(|c| !c.is_empty()).count();
        assert_eq!(non_empty, 1);
        assert_eq!(children[0].triangle_count(), 1);
    }

    #[test]
    fn no_child_pair_has_overlapping_triangles_outside_its_octant() {
        let mesh = triangle_mesh(
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5, 1.0, 0.0],
            vec![0, 1, 2],
        );
        let bounds = BoundingBox::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let children = split_mesh(&mesh, &bounds);
        for (i, child) in children.iter().enumerate() {
            let octant = Octant(i as u8);
            let octant_box = bounds.octant_box(octant);
            for t in 0..child.triangle_count() {
                let aabb = child.triangle_aabb(t);
                for axis in 0..3 {
                    assert!(aabb.low(axis) >= octant_box.low(axis) - 1e-9);
                    assert!(aabb.high(axis) <= octant_box.high(axis) + 1e-9);
                }
            }
        }
    }
}
