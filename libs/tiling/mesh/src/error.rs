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
use thiserror::Error;

/// Structural problems with an [`crate::IndexedMesh`]; always fatal before a
/// tiling run starts.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("positions length {0} is not a multiple of 3")]
    MisalignedPositions(usize),

    #[error("index buffer length {0} is not a multiple of 3")]
    MisalignedIndices(usize),

    #[error("{attribute} has {got} vertices, but positions has {expected}")]
    AttributeVertexMismatch {
        attribute: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("triangle index {index} is out of bounds for {vertex_count} vertices")]
    IndexOutOfBounds { index: u32, vertex_count: usize },
}
