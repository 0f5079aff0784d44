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
use geometry::Aabb;

/// Axis-aligned bounding box for one tile region. Splits and plane tests are
/// done in f64 to avoid the drift that would otherwise creep into deep octree
/// recursions; vertex data itself stays f32.
pub type BoundingBox = Aabb<f64, 3>;

/// One of the 8 children produced by splitting a box at its midpoint.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Octant(pub u8);

impl Octant {
    pub const ALL: [Octant; 8] = [
        Octant(0),
        Octant(1),
        Octant(2),
        Octant(3),
        Octant(4),
        Octant(5),
        Octant(6),
        Octant(7),
    ];

    /// Bit 0 -> +x, bit 1 -> +y, bit 2 -> +z, mirroring the fast-path octant
    /// test used by the splitter (sign of each axis relative to the midpoint).
    pub fn from_bits(x_pos: bool, y_pos: bool, z_pos: bool) -> Self {
        Octant((x_pos as u8) | ((y_pos as u8) << 1) | ((z_pos as u8) << 2))
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }

    pub fn is_positive(&self, axis: usize) -> bool {
        (self.0 >> axis) & 1 == 1
    }
}

/// Extension of the bare generic [`Aabb`] with the operations the octree
/// splitter and tileset builder need: midpoint, diagonal, and per-octant
/// sub-boxes. Kept as a trait so the generic box primitive stays reusable.
pub trait BoundingBoxExt {
    fn midpoint(&self) -> [f64; 3];
    fn diagonal(&self) -> f64;
    fn octant_box(&self, octant: Octant) -> BoundingBox;
    fn octant_of_point(&self, p: [f64; 3]) -> Octant;
    fn contains_point(&self, p: [f32; 3]) -> bool;
    fn union(&self, other: &BoundingBox) -> BoundingBox;
}

/// Smallest box enclosing every point given; `None` for an empty iterator.
pub fn bounding_box_of_points<'a, I: IntoIterator<Item = &'a [f32; 3]>>(
    points: I,
) -> Option<BoundingBox> {
    let mut it = points.into_iter();
    let first = it.next()?;
    let mut lo = [first[0] as f64, first[1] as f64, first[2] as f64];
    let mut hi = lo;
    for p in it {
        for i in 0..3 {
            let v = p[i] as f64;
            lo[i] = lo[i].min(v);
            hi[i] = hi[i].max(v);
        }
    }
    Some(BoundingBox::new(lo, hi))
}

impl BoundingBoxExt for BoundingBox {
    fn midpoint(&self) -> [f64; 3] {
        [
            (self.low(0) + self.high(0)) * 0.5,
            (self.low(1) + self.high(1)) * 0.5,
            (self.low(2) + self.high(2)) * 0.5,
        ]
    }

    fn diagonal(&self) -> f64 {
        (self.span(0).powi(2) + self.span(1).powi(2) + self.span(2).powi(2)).sqrt()
    }

    fn octant_box(&self, octant: Octant) -> BoundingBox {
        let mid = self.midpoint();
        let mut lo = [0f64; 3];
        let mut hi = [0f64; 3];
        for axis in 0..3 {
            if octant.is_positive(axis) {
                lo[axis] = mid[axis];
                hi[axis] = self.high(axis);
            } else {
                lo[axis] = self.low(axis);
                hi[axis] = mid[axis];
            }
        }
        BoundingBox::new(lo, hi)
    }

    fn octant_of_point(&self, p: [f64; 3]) -> Octant {
        let mid = self.midpoint();
        Octant::from_bits(p[0] >= mid[0], p[1] >= mid[1], p[2] >= mid[2])
    }

    fn contains_point(&self, p: [f32; 3]) -> bool {
        (0..3).all(|i| {
            let v = p[i] as f64;
            v >= self.low(i) && v <= self.high(i)
        })
    }

    fn union(&self, other: &BoundingBox) -> BoundingBox {
        let mut lo = [0f64; 3];
        let mut hi = [0f64; 3];
        for i in 0..3 {
            lo[i] = self.low(i).min(other.low(i));
            hi[i] = self.high(i).max(other.high(i));
        }
        BoundingBox::new(lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octant_box_partitions_the_parent() {
        let parent = BoundingBox::new([0.0; 3], [2.0; 3]);
        let children: Vec<_> = Octant::ALL.iter().map(|o| parent.octant_box(*o)).collect();
        assert_eq!(children.len(), 8);
        // The (-x,-y,-z) octant is exactly the lower-left-back cube.
        let c0 = parent.octant_box(Octant(0));
        assert_eq!(c0.low(0), 0.0);
        assert_eq!(c0.high(0), 1.0);
        // The (+x,+y,+z) octant is the opposite corner.
        let c7 = parent.octant_box(Octant(7));
        assert_eq!(c7.low(0), 1.0);
        assert_eq!(c7.high(0), 2.0);
    }

    #[test]
    fn diagonal_matches_pythagoras() {
        let b = BoundingBox::new([0.0; 3], [1.0, 1.0, 1.0]);
        assert!((b.diagonal() - 3f64.sqrt()).abs() < 1e-12);
    }
}
