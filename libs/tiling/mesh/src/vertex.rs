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

/// One vertex carrying the union of attributes a mesh may present. Used by
/// the clipper and the atlas packer, where a single polygon can mix vertices
/// that do or don't carry a given attribute depending on what the source
/// mesh had. A tagged variant per-attribute (rather than a trait hierarchy
/// of "clippable things") keeps interpolation a flat match on `Option`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub position: [f64; 3],
    pub normal: Option<[f64; 3]>,
    pub uv: Option<[f64; 2]>,
    pub color: Option<[f32; 4]>,
}

impl Vertex {
    pub fn new(position: [f64; 3]) -> Self {
        Self {
            position,
            normal: None,
            uv: None,
            color: None,
        }
    }

    /// Position component along one axis (0=X, 1=Y, 2=Z).
    pub fn axis(&self, axis: usize) -> f64 {
        self.position[axis]
    }

    /// Linearly interpolate every present attribute at parameter `t` between
    /// `self` and `other`. Normals are re-normalized after interpolation so a
    /// clipped edge doesn't shrink shading toward the clip plane.
    pub fn lerp(&self, other: &Vertex, t: f64) -> Vertex {
        let position = lerp3(self.position, other.position, t);
        let normal = match (self.normal, other.normal) {
            (Some(a), Some(b)) => Some(normalize3(lerp3(a, b, t))),
            _ => None,
        };
        let uv = match (self.uv, other.uv) {
            (Some(a), Some(b)) => Some(lerp2(a, b, t)),
            _ => None,
        };
        let color = match (self.color, other.color) {
            (Some(a), Some(b)) => Some(lerp4(a, b, t)),
            _ => None,
        };
        Vertex {
            position,
            normal,
            uv,
            color,
        }
    }

    /// Quantize this vertex into the identity key used to dedup boundary
    /// vertices across independent clip operations (see [`crate::DedupKey`]).
    pub fn dedup_key(&self) -> crate::DedupKey {
        crate::DedupKey::quantize(self.position, self.uv, self.normal)
    }
}

fn lerp3(a: [f64; 3], b: [f64; 3], t: f64) -> [f64; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

fn lerp2(a: [f64; 2], b: [f64; 2], t: f64) -> [f64; 2] {
    [a[0] + (b[0] - a[0]) * t, a[1] + (b[1] - a[1]) * t]
}

fn lerp4(a: [f32; 4], b: [f32; 4], t: f64) -> [f32; 4] {
    let t = t as f32;
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}

fn normalize3(v: [f64; 3]) -> [f64; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len > 1e-12 {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_midpoint() {
        let a = Vertex::new([0.0, 0.0, 0.0]);
        let b = Vertex::new([2.0, 0.0, 0.0]);
        let m = a.lerp(&b, 0.5);
        assert_eq!(m.position, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn lerp_renormalizes_normal() {
        let mut a = Vertex::new([0.0, 0.0, 0.0]);
        a.normal = Some([1.0, 0.0, 0.0]);
        let mut b = Vertex::new([1.0, 0.0, 0.0]);
        b.normal = Some([0.0, 1.0, 0.0]);
        let m = a.lerp(&b, 0.5);
        let n = m.normal.unwrap();
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        assert!((len - 1.0).abs() < 1e-9);
    }
}
