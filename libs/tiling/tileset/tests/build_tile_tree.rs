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

//! Cross-crate exercise of the full `build_tileset` recursion: octree split,
//! simplify, atlas repack, and GLB/`tileset.json` encode all wired together
//! against a small, hand-built mesh.

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use atlas::TextureFormat;
use mesh::{AlphaMode, IndexedMesh, Material, MaterialLibrary, SamplerSettings, TextureImage};
use tileset::{build_tileset, default_simplify_schedule, validate_tileset, TilingConfig};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tileset_integration_{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn tetrahedron() -> IndexedMesh {
    let positions = vec![
        0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0,
    ];
    let indices = vec![0, 2, 1, 0, 1, 3, 0, 3, 2, 1, 2, 3];
    IndexedMesh::new(positions, indices)
}

#[test]
fn single_tetrahedron_produces_a_one_tile_tree() {
    let out_dir = scratch_dir("tetrahedron");
    let mesh = tetrahedron();
    let materials = MaterialLibrary::default();
    let config = TilingConfig {
        max_depth: 4,
        max_triangles_per_tile: 1,
        min_tile_size_m: 1.0,
        simplify_schedule: default_simplify_schedule(4),
        texture_format: TextureFormat::None,
        texture_quality: 90,
        texture_max_size: 256,
        threads: 1,
    };
    let cancelled = AtomicBool::new(false);

    let report = build_tileset(
        &mesh,
        &materials,
        glb::tileset::identity_transform(),
        &config,
        &out_dir,
        &cancelled,
    )
    .unwrap();

    assert!(report.tiles_written >= 1);
    assert!(report.failures.is_empty());
    assert!(out_dir.join("tileset.json").exists());
    assert!(out_dir.join("tiles").join("root.glb").exists());

    validate_tileset(&out_dir).unwrap();

    std::fs::remove_dir_all(&out_dir).ok();
}

fn checker_texture() -> TextureImage {
    use image::{ImageOutputFormat, Rgba, RgbaImage};

    let size = 64;
    let mut image = RgbaImage::new(size, size);
    for (x, y, px) in image.enumerate_pixels_mut() {
        let on = ((x / (size / 4)) + (y / (size / 4))) % 2 == 0;
        *px = if on {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([20, 20, 20, 255])
        };
    }
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut std::io::Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .unwrap();
    TextureImage {
        bytes,
        mime_type: "image/png".to_string(),
        width: size,
        height: size,
        sampler: SamplerSettings::default(),
    }
}

fn textured_unit_cube() -> (IndexedMesh, MaterialLibrary) {
    // Two triangles per face, each face its own 0..1 UV square, matching
    // spec.md scenario 2.
    let faces: [([f32; 3], [f32; 3], [f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 0.0, 0.0]),
        ([-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, 0.0, 0.0]),
        ([-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, -1.0, 1.0], [-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [0.0, -1.0, 0.0]),
        ([-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0], [0.0, 0.0, 1.0]),
        ([1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0], [0.0, 0.0, -1.0]),
    ];

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut uvs = Vec::new();
    let mut indices = Vec::new();
    for (face_index, (a, b, c, d, n)) in faces.iter().enumerate() {
        let base = (face_index * 4) as u32;
        for corner in [a, b, c, d] {
            positions.extend_from_slice(corner);
            normals.extend_from_slice(n);
        }
        uvs.extend_from_slice(&[0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0]);
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    let mesh = IndexedMesh {
        positions,
        normals: Some(normals),
        uvs: Some(uvs),
        colors: None,
        indices,
        material: Some(0),
    };
    let material = Material {
        base_color_texture: Some(0),
        alpha_mode: AlphaMode::Opaque,
        ..Material::default()
    };
    let materials = MaterialLibrary::new(vec![material], vec![checker_texture()]);
    (mesh, materials)
}

#[test]
fn empty_mesh_yields_a_single_content_less_leaf() {
    let out_dir = scratch_dir("empty_mesh");
    let mesh = IndexedMesh::default();
    let materials = MaterialLibrary::default();
    let config = TilingConfig {
        max_depth: 4,
        max_triangles_per_tile: 1,
        min_tile_size_m: 1.0,
        simplify_schedule: default_simplify_schedule(4),
        texture_format: TextureFormat::None,
        texture_quality: 90,
        texture_max_size: 256,
        threads: 1,
    };
    let cancelled = AtomicBool::new(false);

    let report = build_tileset(
        &mesh,
        &materials,
        glb::tileset::identity_transform(),
        &config,
        &out_dir,
        &cancelled,
    )
    .unwrap();

    // No GLB is ever written for the empty root, so nothing lands on disk
    // under tiles/ even though tileset.json itself is still produced.
    assert_eq!(report.tiles_written, 0);
    assert!(report.failures.is_empty());
    assert!(out_dir.join("tileset.json").exists());
    assert!(!out_dir.join("tiles").join("root.glb").exists());

    let bytes = std::fs::read(out_dir.join("tileset.json")).unwrap();
    let document: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(document["root"]["geometricError"].as_f64(), Some(0.0));
    assert!(document["root"].get("content").is_none());
    assert!(document["root"].get("children").is_none());

    std::fs::remove_dir_all(&out_dir).ok();
}

#[test]
fn textured_cube_splits_and_every_leaf_glb_validates() {
    let out_dir = scratch_dir("textured_cube");
    let (mesh, materials) = textured_unit_cube();
    let config = TilingConfig {
        max_depth: 2,
        max_triangles_per_tile: 4,
        min_tile_size_m: 0.01,
        simplify_schedule: default_simplify_schedule(2),
        texture_format: TextureFormat::Png,
        texture_quality: 90,
        texture_max_size: 256,
        threads: 2,
    };
    let cancelled = AtomicBool::new(false);

    let report = build_tileset(
        &mesh,
        &materials,
        glb::tileset::identity_transform(),
        &config,
        &out_dir,
        &cancelled,
    )
    .unwrap();

    assert!(report.tiles_written > 1, "a cube split at depth 2 should write more than just the root");
    validate_tileset(&out_dir).unwrap();

    std::fs::remove_dir_all(&out_dir).ok();
}
