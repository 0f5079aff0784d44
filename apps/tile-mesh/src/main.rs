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

//! CLI driver for the tiling core. Mesh ingestion (OBJ/glTF/PLY, textures
//! read from disk) is a Non-goal of the core this app wraps, so this binary
//! builds a synthetic demo mesh and runs it through the full pipeline end
//! to end: simplify, clip/split, atlas repack, encode, write `tileset.json`.

mod demo;

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use anyhow::{bail, Result};
use structopt::StructOpt;

use atlas::TextureFormat;
use tileset::{default_simplify_schedule, validate_tileset, LevelConfig, TilingConfig};
use tracelog::TraceLogOpts;

#[derive(Debug, StructOpt)]
#[structopt(name = "tile-mesh", about = "Tile a mesh into an OGC 3D Tiles 1.1 tileset.")]
struct Opt {
    #[structopt(flatten)]
    trace_log: TraceLogOpts,

    /// Directory to write tileset.json and the tile GLBs into.
    #[structopt(long, parse(from_os_str), default_value = "out")]
    out_dir: PathBuf,

    /// Which synthetic demo mesh to tile: "cube" or "sphere".
    #[structopt(long, default_value = "cube")]
    shape: demo::Shape,

    /// Latitude/longitude ring count for the "sphere" shape; ignored for "cube".
    #[structopt(long, default_value = "8")]
    subdivisions: u32,

    /// Number of checker squares per texture axis.
    #[structopt(long, default_value = "4")]
    checker_size: u32,

    /// Maximum octree recursion depth.
    #[structopt(long, default_value = "6")]
    max_depth: u32,

    /// A node with fewer triangles than this is a leaf, depth permitting.
    #[structopt(long, default_value = "100000")]
    max_triangles_per_tile: usize,

    /// A node whose bounding box diagonal is below this (in mesh units) is a leaf.
    #[structopt(long, default_value = "1.0")]
    min_tile_size_m: f64,

    /// Texture format for repacked atlases: "webp", "ktx2", "png", or "none".
    #[structopt(long, default_value = "png")]
    texture_format: String,

    /// Lossy encoder quality, 0-100 (webp only).
    #[structopt(long, default_value = "90")]
    texture_quality: u8,

    /// Longest atlas edge is downscaled to this many pixels if it would exceed it.
    #[structopt(long, default_value = "4096")]
    texture_max_size: u32,

    /// Worker thread count for the tiling pool. Defaults to available parallelism.
    #[structopt(long)]
    threads: Option<usize>,

    /// After tiling, walk tileset.json and confirm every tile's GLB resolves and parses.
    #[structopt(long)]
    validate: bool,
}

fn parse_texture_format(s: &str) -> Result<TextureFormat> {
    Ok(match s {
        "webp" => TextureFormat::Webp,
        "ktx2" => TextureFormat::Ktx2,
        "png" => TextureFormat::Png,
        "none" => TextureFormat::None,
        other => bail!("unknown texture format '{other}', expected webp/ktx2/png/none"),
    })
}

fn main() -> Result<()> {
    let opt = Opt::from_args();
    let _guard = tracelog::init(&opt.trace_log)?;

    let (mesh, materials) = demo::build(opt.shape, opt.subdivisions, opt.checker_size);
    mesh.validate()?;

    let threads = opt
        .threads
        .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1));

    let schedule = schedule_for(opt.max_depth);
    let config = TilingConfig {
        max_depth: opt.max_depth,
        max_triangles_per_tile: opt.max_triangles_per_tile,
        min_tile_size_m: opt.min_tile_size_m,
        simplify_schedule: schedule,
        texture_format: parse_texture_format(&opt.texture_format)?,
        texture_quality: opt.texture_quality,
        texture_max_size: opt.texture_max_size,
        threads,
    };

    // The coordinate transform from mesh space into the tileset's reference
    // frame (e.g. an ECEF placement) is produced by a georeferencing
    // collaborator this core doesn't implement (spec.md §1); an identity
    // transform leaves the demo mesh in its own local space.
    let root_transform = glb::tileset::identity_transform();

    let cancelled = AtomicBool::new(false);
    let report = tileset::build_tileset(&mesh, &materials, root_transform, &config, &opt.out_dir, &cancelled)?;

    tracing::info!(
        tiles_written = report.tiles_written,
        failures = report.failures.len(),
        "tiling run complete"
    );
    for failure in &report.failures {
        tracing::warn!(
            address = %failure.address,
            operation = failure.operation,
            message = %failure.message,
            "subtree dropped"
        );
    }

    if opt.validate {
        validate_tileset(&opt.out_dir)?;
        tracing::info!("tileset.json and every referenced GLB validated clean");
    }

    Ok(())
}

/// A depth-scaled default schedule, with the first level left un-simplified
/// so the root tile always has geometric-error 0 relative to the source.
fn schedule_for(max_depth: u32) -> Vec<LevelConfig> {
    default_simplify_schedule(max_depth)
}
