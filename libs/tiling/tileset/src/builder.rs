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

//! The orchestrator (C5): recursively simplify, split, atlas-repack, and
//! encode one subtree per octree node, fanning the 8 children of every
//! internal node out across a work-stealing pool.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use rayon::prelude::*;

use atlas::AtlasOptions;
use glb::tileset::{Asset, TilesetDocument};
use mesh::{BoundingBox, BoundingBoxExt, IndexedMesh, MaterialLibrary, Octant};
use simplify::SimplifyOptions;

use crate::address::TileAddress;
use crate::config::{LevelConfig, TilingConfig};
use crate::error::TilingError;
use crate::node::TileNode;
use crate::report::{RunReport, TileFailure};

struct BuildContext<'a> {
    config: &'a TilingConfig,
    materials: &'a MaterialLibrary,
    out_dir: &'a Path,
    cancelled: &'a AtomicBool,
    tiles_written: AtomicUsize,
    failures: Mutex<Vec<TileFailure>>,
}

impl BuildContext<'_> {
    fn record_failure(&self, address: &TileAddress, operation: &'static str, message: String) {
        tracing::warn!(address = %address, operation, message, "tile subtree aborted");
        self.failures.lock().unwrap().push(TileFailure {
            address: address.to_string(),
            operation,
            message,
        });
    }
}

/// Builds the full tile tree for `mesh` and writes every tile's GLB plus
/// `tileset.json` under `out_dir`. Fails only when the root's GLB can't be
/// written or `tileset.json` can't be serialized (spec.md §4.5); any other
/// failure aborts just its own subtree and is reported in the returned
/// [`RunReport`].
#[tracing::instrument(skip_all, fields(triangles = mesh.triangle_count()))]
pub fn build_tileset(
    mesh: &IndexedMesh,
    materials: &MaterialLibrary,
    root_transform: [f64; 16],
    config: &TilingConfig,
    out_dir: &Path,
    cancelled: &AtomicBool,
) -> Result<RunReport, TilingError> {
    let bounds = mesh
        .bounding_box()
        .unwrap_or_else(|| BoundingBox::new([0.0; 3], [0.0; 3]));

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
        .map_err(|e| TilingError::Input {
            reason: e.to_string(),
        })?;

    let ctx = BuildContext {
        config,
        materials,
        out_dir,
        cancelled,
        tiles_written: AtomicUsize::new(0),
        failures: Mutex::new(Vec::new()),
    };

    let root_node = pool.install(|| build_tile(mesh, &bounds, TileAddress::root(), 0, &ctx));

    let root_node = match root_node {
        Some(node) => node,
        None => {
            let reason = ctx
                .failures
                .into_inner()
                .unwrap()
                .pop()
                .map(|f| f.message)
                .unwrap_or_else(|| "root tile failed with no recorded reason".to_string());
            return Err(TilingError::Output {
                address: "root".to_string(),
                operation: "build root tile",
                reason,
            });
        }
    };

    let tile = root_node.into_tile(Some(root_transform));
    let document = TilesetDocument {
        asset: Asset::default(),
        geometric_error: tile.geometric_error,
        root: tile,
    };
    write_tileset_json(out_dir, &document)?;

    Ok(RunReport {
        tiles_written: ctx.tiles_written.load(Ordering::Relaxed),
        failures: ctx.failures.into_inner().unwrap(),
    })
}

fn write_tileset_json(out_dir: &Path, document: &TilesetDocument) -> Result<(), TilingError> {
    std::fs::create_dir_all(out_dir).map_err(|e| TilingError::Output {
        address: "root".to_string(),
        operation: "create output directory",
        reason: e.to_string(),
    })?;
    let bytes = serde_json::to_vec_pretty(document).map_err(|e| TilingError::Output {
        address: "root".to_string(),
        operation: "serialize tileset.json",
        reason: e.to_string(),
    })?;
    std::fs::write(out_dir.join("tileset.json"), bytes).map_err(|e| TilingError::Output {
        address: "root".to_string(),
        operation: "write tileset.json",
        reason: e.to_string(),
    })
}

/// The level config in effect at `depth`: the schedule entry at that depth,
/// padded by repeating the last entry past the schedule's length (this
/// crate's resolution of spec.md §9's pad/truncate/error open question —
/// see `DESIGN.md`), with the mandatory depth >= 3 relaxation (ratio 0.5,
/// border unlocked) overriding whatever the schedule says at that depth.
fn level_for(depth: u32, schedule: &[LevelConfig]) -> LevelConfig {
    let mut level = schedule
        .get(depth as usize)
        .copied()
        .or_else(|| schedule.last().copied())
        .unwrap_or(LevelConfig {
            ratio: 1.0,
            lock_border: true,
        });
    if depth >= 3 {
        level.ratio = 0.5;
        level.lock_border = false;
    }
    level
}

#[tracing::instrument(skip_all, fields(address = %address, depth, triangles = mesh.triangle_count()))]
fn build_tile(
    mesh: &IndexedMesh,
    bounds: &BoundingBox,
    address: TileAddress,
    depth: u32,
    ctx: &BuildContext,
) -> Option<TileNode> {
    if ctx.cancelled.load(Ordering::Relaxed) {
        return None;
    }

    if mesh.is_empty() {
        // spec.md §8: "A mesh of 0 triangles yields a single empty leaf node
        // with geometricError = 0 and no content." No GLB is written at all
        // for this node, so no octant gets this far with 0 triangles unless
        // the octree split genuinely left it empty.
        return Some(TileNode {
            address,
            bounds: bounds.clone(),
            geometric_error: 0.0,
            content_uri: None,
            children: Vec::new(),
        });
    }

    let level = level_for(depth, &ctx.config.simplify_schedule);
    let simplify_opts = SimplifyOptions {
        target_ratio: level.ratio,
        lock_border: level.lock_border,
        ..SimplifyOptions::default()
    };
    let outcome = simplify::simplify(mesh, &simplify_opts);
    if !outcome.reached_target {
        tracing::warn!(
            address = %address,
            "simplifier could not reach its target ratio; using the best-effort mesh"
        );
    }
    let simplified = outcome.mesh;

    let material = simplified.material.and_then(|i| ctx.materials.material(i));
    let source_texture = simplified
        .material
        .and_then(|i| ctx.materials.base_color_texture_of(i));

    let atlas_opts = AtlasOptions {
        texture_format: ctx.config.texture_format,
        texture_quality: ctx.config.texture_quality,
        texture_max_size: ctx.config.texture_max_size,
    };
    let (tile_mesh, tile_texture) = match atlas::repack(&simplified, source_texture, &atlas_opts) {
        Ok(result) => result,
        Err(err) => {
            ctx.record_failure(&address, "atlas repack", err.to_string());
            (simplified, source_texture.cloned())
        }
    };

    let glb_bytes = match glb::write_glb(&tile_mesh, material, tile_texture.as_ref()) {
        Ok(bytes) => bytes,
        Err(err) => {
            ctx.record_failure(&address, "glb encode", err.to_string());
            return None;
        }
    };

    let content_path = address.content_path(ctx.out_dir);
    if let Some(parent) = content_path.parent() {
        if let Err(err) = std::fs::create_dir_all(parent) {
            ctx.record_failure(&address, "create tile directory", err.to_string());
            return None;
        }
    }
    if let Err(err) = std::fs::write(&content_path, &glb_bytes) {
        ctx.record_failure(&address, "glb write", err.to_string());
        return None;
    }
    ctx.tiles_written.fetch_add(1, Ordering::Relaxed);

    let is_leaf = depth >= ctx.config.max_depth
        || mesh.triangle_count() < ctx.config.max_triangles_per_tile
        || bounds.diagonal() < ctx.config.min_tile_size_m;

    let (children, geometric_error) = if is_leaf {
        (Vec::new(), 0.0)
    } else {
        let child_meshes = octree::split_mesh(mesh, bounds);
        let children: Vec<TileNode> = (0u8..8)
            .into_par_iter()
            .filter_map(|octant| {
                let child_mesh = &child_meshes[octant as usize];
                if child_mesh.is_empty() {
                    return None;
                }
                let child_bounds = bounds.octant_box(Octant(octant));
                let child_address = address.child(octant);
                build_tile(child_mesh, &child_bounds, child_address, depth + 1, ctx)
            })
            .collect();
        let geometric_error = bounds.diagonal() * (1.0 - level.ratio as f64) / 2.0;
        (children, geometric_error)
    };

    let content_uri = Some(address.content_uri());
    Some(TileNode {
        address,
        bounds: bounds.clone(),
        geometric_error,
        content_uri,
        children,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_for_pads_past_schedule_length_by_repeating_last_entry() {
        let schedule = vec![
            LevelConfig {
                ratio: 1.0,
                lock_border: true,
            },
            LevelConfig {
                ratio: 0.5,
                lock_border: true,
            },
        ];
        let level = level_for(1, &schedule);
        assert_eq!(level.ratio, 0.5);
        // depth 5 is past the schedule and also >= 3, so the relaxed
        // override applies on top of the padded entry.
        let level = level_for(5, &schedule);
        assert_eq!(level.ratio, 0.5);
        assert!(!level.lock_border);
    }

    #[test]
    fn level_for_below_three_keeps_schedule_values() {
        let schedule = vec![LevelConfig {
            ratio: 1.0,
            lock_border: true,
        }];
        let level = level_for(0, &schedule);
        assert_eq!(level.ratio, 1.0);
        assert!(level.lock_border);
    }
}
