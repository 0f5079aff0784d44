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

use std::fmt;
use std::path::{Path, PathBuf};

/// A tile's position in the tree as a sequence of octant indices from the
/// root, e.g. `[2, 1, 3]` displays as `"2_1_3"`. The root is the empty path.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct TileAddress(Vec<u8>);

impl TileAddress {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, octant: u8) -> Self {
        let mut path = self.0.clone();
        path.push(octant);
        Self(path)
    }

    pub fn depth(&self) -> u32 {
        self.0.len() as u32
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Disk path for this tile's content, relative to the output root:
    /// `tiles/root.glb` for the root, `tiles/<o0>/<o1>/.../tile.glb`
    /// otherwise, per spec.md §6's output layout.
    pub fn content_path(&self, out_dir: &Path) -> PathBuf {
        if self.is_root() {
            out_dir.join("tiles").join("root.glb")
        } else {
            let mut path = out_dir.join("tiles");
            for octant in &self.0 {
                path.push(octant.to_string());
            }
            path.push("tile.glb");
            path
        }
    }

    /// The `content.uri` written into `tileset.json`, relative to the file
    /// itself (which lives at the output root alongside `tiles/`).
    pub fn content_uri(&self) -> String {
        if self.is_root() {
            "tiles/root.glb".to_string()
        } else {
            let segments: Vec<String> = self.0.iter().map(|o| o.to_string()).collect();
            format!("tiles/{}/tile.glb", segments.join("/"))
        }
    }
}

impl fmt::Display for TileAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "root")
        } else {
            let segments: Vec<String> = self.0.iter().map(|o| o.to_string()).collect();
            write!(f, "{}", segments.join("_"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_displays_as_root() {
        assert_eq!(TileAddress::root().to_string(), "root");
    }

    #[test]
    fn nested_child_displays_with_underscores() {
        let addr = TileAddress::root().child(2).child(1).child(3);
        assert_eq!(addr.to_string(), "2_1_3");
        assert_eq!(addr.depth(), 3);
    }

    #[test]
    fn content_uri_matches_spec_layout() {
        assert_eq!(TileAddress::root().content_uri(), "tiles/root.glb");
        assert_eq!(TileAddress::root().child(4).content_uri(), "tiles/4/tile.glb");
        assert_eq!(
            TileAddress::root().child(4).child(0).content_uri(),
            "tiles/4/0/tile.glb"
        );
    }
}
