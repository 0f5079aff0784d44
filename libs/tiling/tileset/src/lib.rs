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

//! The tileset builder (C5): the orchestrator that walks an octree,
//! simplifying, splitting, and atlas-repacking one node at a time, and
//! emits a GLB per tile plus the `tileset.json` that stitches them together.

mod address;
mod builder;
mod config;
mod error;
mod node;
mod report;
pub mod validate;

pub use address::TileAddress;
pub use builder::build_tileset;
pub use config::{default_simplify_schedule, LevelConfig, TilingConfig};
pub use error::TilingError;
pub use node::TileNode;
pub use report::{RunReport, TileFailure};
pub use validate::validate_tileset;
