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
use crate::compact::DEFAULT_SKIP_COMPACTION_BELOW;

/// Inputs to one [`crate::simplify`] call (spec.md §4.1).
#[derive(Clone, Copy, Debug)]
pub struct SimplifyOptions {
    /// Target fraction of the input triangle count, in `(0, 1]`.
    pub target_ratio: f32,
    /// Forbid collapsing or moving vertices on the mesh's open (single-face)
    /// edges. Set `false` at deep tile levels where border fidelity doesn't
    /// matter as much as throughput (spec.md §4.5's depth >= 3 rule).
    pub lock_border: bool,
    /// Relative weight penalizing UV distortion during a collapse.
    pub uv_weight: f32,
    /// Relative weight penalizing normal distortion during a collapse.
    pub normal_weight: f32,
    /// Absolute error budget; the simplifier stops collapsing once
    /// reducing further would exceed it, even short of `target_ratio`.
    pub target_error: f32,
    /// Skip the post-simplify vertex-compaction pass when the input mesh
    /// has fewer vertices than this. `None` never skips.
    pub skip_compaction_below: Option<usize>,
}

impl Default for SimplifyOptions {
    fn default() -> Self {
        Self {
            target_ratio: 1.0,
            lock_border: true,
            uv_weight: 1.0,
            normal_weight: 1.0,
            target_error: 1e-2,
            skip_compaction_below: Some(DEFAULT_SKIP_COMPACTION_BELOW),
        }
    }
}

/// The relaxed configuration spec.md §4.5 calls for at tile depth >= 3:
/// coarse LODs are viewed from a distance, so border fidelity isn't worth
/// the extra CPU.
impl SimplifyOptions {
    pub fn relaxed(target_error: f32) -> Self {
        Self {
            target_ratio: 0.5,
            lock_border: false,
            uv_weight: 1.0,
            normal_weight: 1.0,
            target_error,
            skip_compaction_below: Some(DEFAULT_SKIP_COMPACTION_BELOW),
        }
    }
}
