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

/// The four kinds spec.md §7 calls out. Every variant names the failing
/// tile address, the failing operation, and the underlying error, so a
/// caller never has to go spelunking in logs to triage a failed run.
#[derive(Debug, Error)]
pub enum TilingError {
    #[error("input rejected: {reason}")]
    Input { reason: String },

    #[error("tile {address}: {operation} failed: {reason}")]
    Output {
        address: String,
        operation: &'static str,
        reason: String,
    },

    #[error("tileset.json invalid: {reason}")]
    Validation { reason: String },
}
