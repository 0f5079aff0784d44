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

use crate::address::TileAddress;
use glb::tileset::{BoundingVolume, Content, Tile};
use mesh::BoundingBox;

/// One node of the tile tree, built bottom-up by `build_tile` before the
/// whole thing is flattened into a `glb::tileset::Tile` for serialization.
/// Owned outright, no back-pointers to the parent (spec.md §9: "build the
/// tree as an owned structure rooted at the caller's stack").
#[derive(Debug)]
pub struct TileNode {
    pub address: TileAddress,
    pub bounds: BoundingBox,
    pub geometric_error: f64,
    pub content_uri: Option<String>,
    pub children: Vec<TileNode>,
}

impl TileNode {
    /// Consumes this node and its subtree into the glTF-facing `Tile`
    /// schema. Only the caller of the root conversion should pass a
    /// `transform` (spec.md §4.5: "only the root carries a transform").
    pub fn into_tile(self, transform: Option<[f64; 16]>) -> Tile {
        let bounding_volume = BoundingVolume::axis_aligned(
            [self.bounds.low(0), self.bounds.low(1), self.bounds.low(2)],
            [self.bounds.high(0), self.bounds.high(1), self.bounds.high(2)],
        );
        Tile {
            bounding_volume,
            geometric_error: self.geometric_error,
            refine: "REPLACE",
            content: self.content_uri.map(|uri| Content { uri }),
            children: self.children.into_iter().map(|c| c.into_tile(None)).collect(),
            transform,
        }
    }
}
