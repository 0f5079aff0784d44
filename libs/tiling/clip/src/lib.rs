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

//! Sutherland-Hodgman clipping of one triangle (with interpolated vertex
//! attributes) against an axis-aligned half-space. This is the primitive
//! the octree splitter (crate `octree`) composes three times per triangle
//! to produce up to 8 octant sub-polygons.

use mesh::Vertex;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KeepSide {
    /// Keep the half-space where `coord <= value`.
    LessOrEqual,
    /// Keep the half-space where `coord >= value`.
    GreaterOrEqual,
}

fn is_inside(v: &Vertex, axis: Axis, value: f64, keep_side: KeepSide) -> bool {
    let coord = v.axis(axis.index());
    match keep_side {
        // A vertex exactly on the plane satisfies both `<=` and `>=`, so it
        // is "inside" for whichever side is being clipped — the bit-exact
        // tie-break the spec calls for falls out of the comparison itself,
        // no epsilon needed.
        KeepSide::LessOrEqual => coord <= value,
        KeepSide::GreaterOrEqual => coord >= value,
    }
}

fn intersect(a: &Vertex, b: &Vertex, axis: Axis, value: f64) -> Vertex {
    let a_coord = a.axis(axis.index());
    let b_coord = b.axis(axis.index());
    let t = (value - a_coord) / (b_coord - a_coord);
    a.lerp(b, t)
}

/// Clip an ordered polygon against the half-space `{ v : v[axis] keep_side value }`.
/// Returns the clipped polygon, still in winding order; empty if the whole
/// polygon is outside. The result may have more or fewer vertices than the
/// input (a triangle clipped by one plane becomes a 3- or 4-gon).
pub fn clip_polygon(polygon: &[Vertex], axis: Axis, value: f64, keep_side: KeepSide) -> Vec<Vertex> {
    if polygon.len() < 2 {
        return polygon.to_vec();
    }
    let mut out = Vec::with_capacity(polygon.len() + 1);
    for i in 0..polygon.len() {
        let a = &polygon[i];
        let b = &polygon[(i + 1) % polygon.len()];
        let a_in = is_inside(a, axis, value, keep_side);
        let b_in = is_inside(b, axis, value, keep_side);
        match (a_in, b_in) {
            (true, true) => out.push(*b),
            (true, false) => out.push(intersect(a, b, axis, value)),
            (false, true) => {
                out.push(intersect(a, b, axis, value));
                out.push(*b);
            }
            (false, false) => {}
        }
    }
    out
}

/// Epsilon on the doubled cross-product magnitude (i.e. 2x triangle area)
/// below which a triangle is considered degenerate and dropped.
const ZERO_AREA_EPSILON: f64 = 1e-12;

/// Fan-triangulate a convex polygon from its first vertex, dropping any
/// triangle whose area is within [`ZERO_AREA_EPSILON`] of zero (collinear
/// clip artifacts at a shared edge).
pub fn triangulate_fan(polygon: &[Vertex]) -> Vec<[Vertex; 3]> {
    if polygon.len() < 3 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(polygon.len() - 2);
    for i in 1..polygon.len() - 1 {
        let tri = [polygon[0], polygon[i], polygon[i + 1]];
        if !is_degenerate(&tri) {
            out.push(tri);
        }
    }
    out
}

fn is_degenerate(tri: &[Vertex; 3]) -> bool {
    let e1 = sub(tri[1].position, tri[0].position);
    let e2 = sub(tri[2].position, tri[0].position);
    let c = cross(e1, e2);
    let double_area_sq = c[0] * c[0] + c[1] * c[1] + c[2] * c[2];
    double_area_sq < ZERO_AREA_EPSILON * ZERO_AREA_EPSILON
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

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64, z: f64) -> Vertex {
        Vertex::new([x, y, z])
    }

    #[test]
    fn clip_triangle_straddling_midplane_keeps_it_convex() {
        // Triangle from scenario 3 in the spec: (0,0,0),(1,0,0),(0.5,1,0) clipped at x=0.5.
        let tri = [v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(0.5, 1.0, 0.0)];
        let neg = clip_polygon(&tri, Axis::X, 0.5, KeepSide::LessOrEqual);
        assert_eq!(neg.len(), 3);
        assert_eq!(neg[0].position, [0.0, 0.0, 0.0]);
        assert_eq!(neg[1].position, [0.5, 0.0, 0.0]);
        assert_eq!(neg[2].position, [0.5, 1.0, 0.0]);

        let pos = clip_polygon(&tri, Axis::X, 0.5, KeepSide::GreaterOrEqual);
        assert_eq!(pos.len(), 4);
        let tris = triangulate_fan(&pos);
        assert_eq!(tris.len(), 2);
    }

    #[test]
    fn clip_against_non_intersecting_plane_returns_triangle_unchanged() {
        let tri = [v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(0.0, 1.0, 0.0)];
        let kept = clip_polygon(&tri, Axis::X, 10.0, KeepSide::LessOrEqual);
        assert_eq!(kept.len(), 3);
        for (a, b) in kept.iter().zip(tri.iter()) {
            assert_eq!(a.position, b.position);
        }
    }

    #[test]
    fn clip_twice_is_idempotent() {
        let tri = [v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(0.5, 1.0, 0.0)];
        let once = clip_polygon(&tri, Axis::X, 0.5, KeepSide::LessOrEqual);
        let twice = clip_polygon(&once, Axis::X, 0.5, KeepSide::LessOrEqual);
        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a.position, b.position);
        }
    }

    #[test]
    fn vertex_exactly_on_plane_is_assigned_to_exactly_one_side_of_a_degenerate_check() {
        // A triangle tangent to the plane (one vertex on it, rest on one side)
        // should not produce a sliver on the far side.
        let tri = [v(0.5, 0.0, 0.0), v(1.0, 0.0, 0.0), v(1.0, 1.0, 0.0)];
        let neg = clip_polygon(&tri, Axis::X, 0.5, KeepSide::LessOrEqual);
        assert!(triangulate_fan(&neg).is_empty());
        let pos = clip_polygon(&tri, Axis::X, 0.5, KeepSide::GreaterOrEqual);
        assert_eq!(triangulate_fan(&pos).len(), 1);
    }

    #[test]
    fn zero_area_triangle_is_dropped() {
        let tri = [v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(2.0, 0.0, 0.0)];
        assert!(triangulate_fan(&tri).is_empty());
    }
}
