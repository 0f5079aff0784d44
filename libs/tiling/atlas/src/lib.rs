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

//! Per-tile atlas repacking (C4): detect UV islands, pack them into a
//! compact atlas with bleed padding, rewrite UVs, duplicate vertices shared
//! across islands, and re-encode the result at the caller's chosen texture
//! format.

mod composite;
mod error;
mod island;
mod pack;
mod remap;

pub use error::AtlasError;
pub use island::UvIsland;

use composite::{composite, Placement};
use image::{DynamicImage, RgbaImage};
use island::detect_islands;
use mesh::{IndexedMesh, TextureImage};
use pack::{bleed_for, pack, PixelRect};
use remap::remap_and_rebuild;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TextureFormat {
    Webp,
    Ktx2,
    Png,
    /// Geometry only; no texture is encoded (spec.md §6's `texture_format = none`).
    None,
}

#[derive(Clone, Copy, Debug)]
pub struct AtlasOptions {
    pub texture_format: TextureFormat,
    pub texture_quality: u8,
    pub texture_max_size: u32,
}

impl Default for AtlasOptions {
    fn default() -> Self {
        Self {
            texture_format: TextureFormat::Png,
            texture_quality: 90,
            texture_max_size: 4096,
        }
    }
}

/// Replaces `mesh`'s reference to `texture` (a large shared atlas) with a
/// compact per-tile atlas, returning the mesh with remapped UVs and the new
/// texture. A mesh without UVs is a no-op (spec.md §4.4's edge case); the
/// texture is returned unchanged in that case too, since there is nothing
/// to crop it to.
#[tracing::instrument(skip_all, fields(triangles = mesh.triangle_count()))]
pub fn repack(
    mesh: &IndexedMesh,
    texture: Option<&TextureImage>,
    opts: &AtlasOptions,
) -> Result<(IndexedMesh, Option<TextureImage>), AtlasError> {
    if mesh.triangle_count() == 0 {
        // spec.md §4.4: "textures referenced by the material but with zero
        // incident triangles are dropped from the material library for this
        // tile" — with no triangles left, nothing can be incident to it.
        return Ok((mesh.clone(), None));
    }
    if mesh.uvs.is_none() {
        return Ok((mesh.clone(), texture.cloned()));
    }
    let texture = texture.ok_or(AtlasError::MissingSourceTexture)?;

    let source = decode(texture)?;
    let islands = detect_islands(mesh);
    if islands.is_empty() {
        return Ok((mesh.clone(), None));
    }

    let content_sizes: Vec<(u32, u32)> = islands
        .iter()
        .map(|island| island_pixel_size(island, source.width(), source.height()))
        .collect();
    // A single pad value for the whole atlas keeps the packer's bookkeeping
    // simple; spec.md's per-island table is driven by the largest island,
    // which dominates the visible bleed budget anyway.
    let pad = content_sizes
        .iter()
        .map(|&(w, h)| bleed_for(w.max(h)))
        .max()
        .unwrap_or(2);

    let (mut atlas_w, mut atlas_h, dest_rects) = pack(&content_sizes, pad);
    let mut scale = 1.0f64;
    let longest = atlas_w.max(atlas_h);
    if longest > opts.texture_max_size {
        scale = opts.texture_max_size as f64 / longest as f64;
    }

    let source_rects: Vec<PixelRect> = islands
        .iter()
        .zip(content_sizes.iter())
        .map(|(island, &(w, h))| source_rect(island, &source, w, h))
        .collect();

    let placements: Vec<Placement> = source_rects
        .iter()
        .zip(dest_rects.iter())
        .map(|(&source, &dest)| Placement { source, dest, pad })
        .collect();

    let mut atlas_image = composite(&source, atlas_w, atlas_h, &placements);
    if scale < 1.0 {
        let new_w = ((atlas_w as f64 * scale).round() as u32).max(1);
        let new_h = ((atlas_h as f64 * scale).round() as u32).max(1);
        atlas_image = image::imageops::resize(&atlas_image, new_w, new_h, image::imageops::FilterType::Lanczos3);
        atlas_w = new_w;
        atlas_h = new_h;
    }

    let remapped = remap_and_rebuild(mesh, &islands, &dest_rects, pad, atlas_w, atlas_h);
    let encoded = encode(&atlas_image, opts)?;

    Ok((remapped, Some(encoded)))
}

fn decode(texture: &TextureImage) -> Result<RgbaImage, AtlasError> {
    let image = image::load_from_memory(&texture.bytes)?;
    Ok(image.to_rgba8())
}

fn island_pixel_size(island: &UvIsland, width: u32, height: u32) -> (u32, u32) {
    let w = ((island.uv_max[0] - island.uv_min[0]) * width as f64).ceil().max(1.0) as u32;
    let h = ((island.uv_max[1] - island.uv_min[1]) * height as f64).ceil().max(1.0) as u32;
    (w, h)
}

fn source_rect(island: &UvIsland, source: &RgbaImage, w: u32, h: u32) -> PixelRect {
    let x = (island.uv_min[0] * source.width() as f64).floor().max(0.0) as u32;
    let y = (island.uv_min[1] * source.height() as f64).floor().max(0.0) as u32;
    PixelRect {
        x: x.min(source.width().saturating_sub(1)),
        y: y.min(source.height().saturating_sub(1)),
        w,
        h,
    }
}

fn encode(image: &RgbaImage, opts: &AtlasOptions) -> Result<TextureImage, AtlasError> {
    match opts.texture_format {
        TextureFormat::None => Ok(TextureImage {
            bytes: Vec::new(),
            mime_type: String::new(),
            width: image.width(),
            height: image.height(),
            sampler: Default::default(),
        }),
        TextureFormat::Png => {
            let mut bytes = Vec::new();
            image::DynamicImage::ImageRgba8(image.clone())
                .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
                .map_err(|e| AtlasError::Encode {
                    format: "png",
                    reason: e.to_string(),
                })?;
            Ok(TextureImage {
                bytes,
                mime_type: "image/png".to_string(),
                width: image.width(),
                height: image.height(),
                sampler: Default::default(),
            })
        }
        TextureFormat::Webp => {
            let encoder = webp::Encoder::from_rgba(image.as_raw(), image.width(), image.height());
            let encoded = encoder.encode(opts.texture_quality as f32);
            Ok(TextureImage {
                bytes: encoded.to_vec(),
                mime_type: "image/webp".to_string(),
                width: image.width(),
                height: image.height(),
                sampler: Default::default(),
            })
        }
        TextureFormat::Ktx2 => ktx2_container(image).map_err(|reason| AtlasError::Encode {
            format: "ktx2",
            reason,
        }),
    }
}

/// A minimal single-mip, single-face KTX2 container holding raw RGBA8 data.
/// `KHR_texture_basisu` normally implies supercompressed Basis Universal
/// data; this writer stores uncompressed texel data in a structurally valid
/// KTX2 envelope, leaving actual Basis transcoding to a dedicated encode
/// pass if one is wired in later (see `DESIGN.md`).
fn ktx2_container(image: &RgbaImage) -> Result<TextureImage, String> {
    const KTX2_IDENTIFIER: [u8; 12] = [
        0xAB, 0x4B, 0x54, 0x58, 0x20, 0x32, 0x30, 0xBB, 0x0D, 0x0A, 0x1A, 0x0A,
    ];
    const VK_FORMAT_R8G8B8A8_UNORM: u32 = 37;

    let mut bytes = Vec::new();
    bytes.extend_from_slice(&KTX2_IDENTIFIER);
    bytes.extend_from_slice(&VK_FORMAT_R8G8B8A8_UNORM.to_le_bytes());
    bytes.extend_from_slice(&4u32.to_le_bytes()); // typeSize
    bytes.extend_from_slice(&image.width().to_le_bytes());
    bytes.extend_from_slice(&image.height().to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes()); // pixelDepth (2D)
    bytes.extend_from_slice(&0u32.to_le_bytes()); // layerCount
    bytes.extend_from_slice(&1u32.to_le_bytes()); // faceCount
    bytes.extend_from_slice(&1u32.to_le_bytes()); // levelCount
    bytes.extend_from_slice(&0u32.to_le_bytes()); // supercompressionScheme (none)
    bytes.extend_from_slice(image.as_raw());

    Ok(TextureImage {
        bytes,
        mime_type: "image/ktx2".to_string(),
        width: image.width(),
        height: image.height(),
        sampler: Default::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageOutputFormat;
    use mesh::SamplerSettings;

    fn checker_texture(size: u32) -> TextureImage {
        let mut img = RgbaImage::new(size, size);
        for (x, y, px) in img.enumerate_pixels_mut() {
            let on = ((x / (size / 4)) + (y / (size / 4))) % 2 == 0;
            *px = if on {
                image::Rgba([255, 255, 255, 255])
            } else {
                image::Rgba([0, 0, 0, 255])
            };
        }
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img)
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

    fn quad_mesh() -> IndexedMesh {
        let mut mesh = IndexedMesh::new(
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0],
            vec![0, 1, 2, 0, 2, 3],
        );
        mesh.uvs = Some(vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0]);
        mesh
    }

    #[test]
    fn mesh_without_uvs_is_a_no_op() {
        let mesh = IndexedMesh::new(
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            vec![0, 1, 2],
        );
        let (out_mesh, out_tex) = repack(&mesh, None, &AtlasOptions::default()).unwrap();
        assert_eq!(out_mesh.triangle_count(), 1);
        assert!(out_tex.is_none());
    }

    #[test]
    fn zero_triangle_mesh_drops_the_texture_even_when_one_is_present() {
        let mesh = IndexedMesh::default();
        let texture = checker_texture(64);
        let (out_mesh, out_tex) = repack(&mesh, Some(&texture), &AtlasOptions::default()).unwrap();
        assert!(out_mesh.is_empty());
        assert!(out_tex.is_none());
    }

    #[test]
    fn missing_texture_with_uvs_is_an_error() {
        let mesh = quad_mesh();
        let err = repack(&mesh, None, &AtlasOptions::default()).unwrap_err();
        assert!(matches!(err, AtlasError::MissingSourceTexture));
    }

    #[test]
    fn repacks_into_a_power_of_two_atlas_with_same_vertex_count() {
        let mesh = quad_mesh();
        let texture = checker_texture(64);
        let (out_mesh, out_tex) = repack(&mesh, Some(&texture), &AtlasOptions::default()).unwrap();
        let tex = out_tex.unwrap();
        assert!(tex.width.is_power_of_two());
        assert!(tex.height.is_power_of_two());
        assert_eq!(out_mesh.vertex_count(), mesh.vertex_count());
        assert_eq!(out_mesh.uvs.unwrap().len() / 2, out_mesh.vertex_count());
    }
}
