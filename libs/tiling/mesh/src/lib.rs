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

//! The data model shared by every stage of the tiling core: [`IndexedMesh`],
//! [`BoundingBox`], [`MaterialLibrary`], and the [`DedupKey`] used to stitch
//! clip and split boundaries back together without seams.

pub mod bounds;
mod dedup;
mod error;
mod indexed_mesh;
mod material;
mod vertex;

pub use bounds::{BoundingBox, BoundingBoxExt, Octant};
pub use dedup::{DedupKey, DedupTable};
pub use error::MeshError;
pub use indexed_mesh::IndexedMesh;
pub use material::{AlphaMode, FilterMode, Material, MaterialLibrary, SamplerSettings, TextureImage, WrapMode};
pub use vertex::Vertex;
