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

use atlas::TextureFormat;

/// Per-level simplification settings (`(ratio, lock_border)` in spec terms).
#[derive(Clone, Copy, Debug)]
pub struct LevelConfig {
    pub ratio: f32,
    pub lock_border: bool,
}

/// Process-wide settings for one tiling run, built once by the caller and
/// read by every worker thread for the lifetime of the run. Mirrors the
/// options table 1:1; nothing here is mutated once `build_tileset` starts.
#[derive(Clone, Debug)]
pub struct TilingConfig {
    pub max_depth: u32,
    pub max_triangles_per_tile: usize,
    pub min_tile_size_m: f64,
    pub simplify_schedule: Vec<LevelConfig>,
    pub texture_format: TextureFormat,
    pub texture_quality: u8,
    pub texture_max_size: u32,
    pub threads: usize,
}

impl Default for TilingConfig {
    fn default() -> Self {
        let max_depth = 6;
        Self {
            max_depth,
            max_triangles_per_tile: 100_000,
            min_tile_size_m: 1.0,
            simplify_schedule: default_simplify_schedule(max_depth),
            texture_format: TextureFormat::Png,
            texture_quality: 90,
            texture_max_size: 4096,
            threads: num_cpus(),
        }
    }
}

/// At each descent level the ratio halves toward the leaves, bounded below
/// by a leaf ratio of 0.05, with border locking on by default (the depth >=
/// 3 relaxation in [`crate::builder::level_for`] overrides this per-node,
/// not per-schedule-entry).
pub fn default_simplify_schedule(max_depth: u32) -> Vec<LevelConfig> {
    (0..=max_depth)
        .map(|depth| LevelConfig {
            ratio: (1.0 / 2f32.powi(depth as i32)).max(0.05),
            lock_border: true,
        })
        .collect()
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule_has_one_entry_per_level() {
        let schedule = default_simplify_schedule(4);
        assert_eq!(schedule.len(), 5);
        assert_eq!(schedule[0].ratio, 1.0);
        assert!(schedule[4].ratio <= schedule[0].ratio);
    }
}
