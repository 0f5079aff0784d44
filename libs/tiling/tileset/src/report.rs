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

/// One subtree abort: the write failed, so the whole subtree rooted at
/// `address` was dropped from the tree rather than leaving a content-less
/// internal node behind.
#[derive(Clone, Debug)]
pub struct TileFailure {
    pub address: String,
    pub operation: &'static str,
    pub message: String,
}

/// The result of one `build_tileset` run: how many tiles actually landed on
/// disk, and which subtrees were dropped along the way. Spec.md §7's Output
/// row calls for "failure list surfaced in result" rather than silently
/// swallowed subtree aborts.
#[derive(Clone, Debug, Default)]
pub struct RunReport {
    pub tiles_written: usize,
    pub failures: Vec<TileFailure>,
}
