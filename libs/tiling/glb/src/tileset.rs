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

//! The `tileset.json` document: an OGC 3D Tiles 1.1 asset descriptor plus a
//! `Tile` tree. The tileset builder (C5) assembles one of these per run; this
//! module only owns the schema and its serialization.

use serde::Serialize;

#[derive(Serialize)]
pub struct TilesetDocument {
    pub asset: Asset,
    #[serde(rename = "geometricError")]
    pub geometric_error: f64,
    pub root: Tile,
}

#[derive(Serialize)]
pub struct Asset {
    pub version: &'static str,
}

impl Default for Asset {
    fn default() -> Self {
        Self { version: "1.1" }
    }
}

/// An oriented bounding box: center (3) + half-axis x,y,z (9), exactly as
/// the `box` bounding volume's 12-element array is defined.
#[derive(Clone, Copy, Debug)]
pub struct BoundingVolume {
    pub center: [f64; 3],
    pub half_axes: [[f64; 3]; 3],
}

impl Serialize for BoundingVolume {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut values = Vec::with_capacity(12);
        values.extend_from_slice(&self.center);
        for axis in &self.half_axes {
            values.extend_from_slice(axis);
        }
        BoxWrapper { r#box: values }.serialize(serializer)
    }
}

#[derive(Serialize)]
struct BoxWrapper {
    r#box: Vec<f64>,
}

impl BoundingVolume {
    /// An axis-aligned box from an AABB's low/high corners; every tile in
    /// this core is axis-aligned, so `half_axes` is always a diagonal
    /// matrix scaled by the box's half-extents.
    pub fn axis_aligned(low: [f64; 3], high: [f64; 3]) -> Self {
        let center = [
            (low[0] + high[0]) / 2.0,
            (low[1] + high[1]) / 2.0,
            (low[2] + high[2]) / 2.0,
        ];
        let half = [
            (high[0] - low[0]) / 2.0,
            (high[1] - low[1]) / 2.0,
            (high[2] - low[2]) / 2.0,
        ];
        Self {
            center,
            half_axes: [[half[0], 0.0, 0.0], [0.0, half[1], 0.0], [0.0, 0.0, half[2]]],
        }
    }

    /// The length of the box's space diagonal, used for the geometric-error
    /// heuristic `diagonal * (1 - ratio) / 2`.
    pub fn diagonal(&self) -> f64 {
        let x = self.half_axes[0][0] * 2.0;
        let y = self.half_axes[1][1] * 2.0;
        let z = self.half_axes[2][2] * 2.0;
        (x * x + y * y + z * z).sqrt()
    }
}

#[derive(Serialize)]
pub struct Content {
    pub uri: String,
}

#[derive(Serialize)]
pub struct Tile {
    #[serde(rename = "boundingVolume")]
    pub bounding_volume: BoundingVolume,
    #[serde(rename = "geometricError")]
    pub geometric_error: f64,
    pub refine: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Tile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<[f64; 16]>,
}

impl Tile {
    pub fn leaf(bounding_volume: BoundingVolume, geometric_error: f64, uri: String) -> Self {
        Self {
            bounding_volume,
            geometric_error,
            refine: "REPLACE",
            content: Some(Content { uri }),
            children: Vec::new(),
            transform: None,
        }
    }
}

pub fn identity_transform() -> [f64; 16] {
    [
        1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_aligned_box_serializes_to_twelve_numbers() {
        let bv = BoundingVolume::axis_aligned([0.0, 0.0, 0.0], [2.0, 4.0, 6.0]);
        let json = serde_json::to_value(&bv).unwrap();
        assert_eq!(json["box"].as_array().unwrap().len(), 12);
        assert_eq!(json["box"][0].as_f64().unwrap(), 1.0);
    }

    #[test]
    fn diagonal_matches_pythagorean_extent() {
        let bv = BoundingVolume::axis_aligned([0.0, 0.0, 0.0], [3.0, 4.0, 0.0]);
        assert!((bv.diagonal() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn leaf_tile_has_no_children() {
        let bv = BoundingVolume::axis_aligned([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let tile = Tile::leaf(bv, 0.5, "tiles/0.glb".to_string());
        assert!(tile.children.is_empty());
        assert!(tile.content.is_some());
    }
}
