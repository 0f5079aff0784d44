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
use crate::pack::PixelRect;
use image::RgbaImage;

/// One island's placement: where its content came from in the source
/// texture, and the padded rectangle it landed at in the atlas (including
/// the `pad`-wide bleed border on every side).
pub(crate) struct Placement {
    pub source: PixelRect,
    pub dest: PixelRect,
    pub pad: u32,
}

/// Copies every island's source sub-rectangle into its packed location, row
/// by row (`memcpy`-able since a row is contiguous in X), then fills the
/// bleed border by replicating edge pixels and the four corners by
/// extending the corner pixel — this is what keeps a GPU's bilinear sampler
/// from picking up the next island's pixels at a tile boundary.
pub(crate) fn composite(source: &RgbaImage, atlas_w: u32, atlas_h: u32, placements: &[Placement]) -> RgbaImage {
    let mut atlas = RgbaImage::new(atlas_w, atlas_h);
    for p in placements {
        copy_content(source, &mut atlas, p);
        fill_bleed(&mut atlas, p);
    }
    atlas
}

fn content_rect(p: &Placement) -> PixelRect {
    PixelRect {
        x: p.dest.x + p.pad,
        y: p.dest.y + p.pad,
        w: p.dest.w - 2 * p.pad,
        h: p.dest.h - 2 * p.pad,
    }
}

fn copy_content(source: &RgbaImage, atlas: &mut RgbaImage, p: &Placement) {
    let content = content_rect(p);
    for row in 0..content.h {
        let src_y = (p.source.y + row).min(source.height().saturating_sub(1));
        let dst_y = content.y + row;
        for col in 0..content.w {
            let src_x = (p.source.x + col).min(source.width().saturating_sub(1));
            let px = *source.get_pixel(src_x, src_y);
            atlas.put_pixel(content.x + col, dst_y, px);
        }
    }
}

/// Replicates the content rectangle's edge pixels outward by `pad` on each
/// side, then extends the corner pixel into the four `pad x pad` corners.
fn fill_bleed(atlas: &mut RgbaImage, p: &Placement) {
    let content = content_rect(p);
    let pad = p.pad;
    if pad == 0 || content.w == 0 || content.h == 0 {
        return;
    }

    // Left / right edges.
    for row in 0..content.h {
        let y = content.y + row;
        let left_px = *atlas.get_pixel(content.x, y);
        let right_px = *atlas.get_pixel(content.x + content.w - 1, y);
        for d in 1..=pad {
            atlas.put_pixel(content.x - d, y, left_px);
            atlas.put_pixel(content.x + content.w - 1 + d, y, right_px);
        }
    }

    // Top / bottom edges, spanning the full padded width so the corners
    // below can overwrite with the true corner pixel.
    for col in 0..content.w + 2 * pad {
        let x = content.x - pad + col;
        let top_px = *atlas.get_pixel(x.clamp(content.x, content.x + content.w - 1), content.y);
        let bottom_px = *atlas.get_pixel(
            x.clamp(content.x, content.x + content.w - 1),
            content.y + content.h - 1,
        );
        for d in 1..=pad {
            atlas.put_pixel(x, content.y - d, top_px);
            atlas.put_pixel(x, content.y + content.h - 1 + d, bottom_px);
        }
    }

    // Four pad x pad corners, extended from the content rect's corner pixel.
    let corners = [
        (content.x, content.y, -1i64, -1i64),
        (content.x + content.w - 1, content.y, 1, -1),
        (content.x, content.y + content.h - 1, -1, 1),
        (content.x + content.w - 1, content.y + content.h - 1, 1, 1),
    ];
    for (cx, cy, dx, dy) in corners {
        let corner_px = *atlas.get_pixel(cx, cy);
        for i in 1..=pad as i64 {
            for j in 1..=pad as i64 {
                let x = (cx as i64 + dx * i) as u32;
                let y = (cy as i64 + dy * j) as u32;
                atlas.put_pixel(x, y, corner_px);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_solid_island_bleeds_its_own_color() {
        let mut source = RgbaImage::new(4, 4);
        for px in source.pixels_mut() {
            *px = image::Rgba([10, 20, 30, 255]);
        }
        let placements = vec![Placement {
            source: PixelRect { x: 0, y: 0, w: 4, h: 4 },
            dest: PixelRect { x: 0, y: 0, w: 8, h: 8 },
            pad: 2,
        }];
        let atlas = composite(&source, 8, 8, &placements);
        assert_eq!(*atlas.get_pixel(0, 0), image::Rgba([10, 20, 30, 255]));
        assert_eq!(*atlas.get_pixel(7, 7), image::Rgba([10, 20, 30, 255]));
        assert_eq!(*atlas.get_pixel(4, 4), image::Rgba([10, 20, 30, 255]));
    }
}
