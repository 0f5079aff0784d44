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

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("mesh has UVs but no source texture was supplied for atlas repacking")]
    MissingSourceTexture,

    #[error("failed to decode source texture: {0}")]
    Decode(#[from] image::ImageError),

    #[error("failed to encode packed atlas as {format}: {reason}")]
    Encode { format: &'static str, reason: String },
}
