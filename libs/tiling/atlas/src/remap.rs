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
use crate::island::UvIsland;
use crate::pack::PixelRect;
use mesh::IndexedMesh;
use std::collections::HashMap;

/// Rebuilds `mesh` with UVs remapped into the packed atlas and vertices
/// duplicated across island boundaries. A vertex whose incident triangles
/// were split across two islands becomes two vertices, one per island, each
/// carrying that island's own remapped UV — otherwise one island's UV
/// "wins" and the other's triangles sample the wrong part of the atlas
/// (spec.md §4.4).
pub(crate) fn remap_and_rebuild(
    mesh: &IndexedMesh,
    islands: &[UvIsland],
    dest_rects: &[PixelRect],
    pad: u32,
    atlas_w: u32,
    atlas_h: u32,
) -> IndexedMesh {
    let mut positions = Vec::new();
    let mut normals = mesh.normals.as_ref().map(|_| Vec::new());
    let mut colors = mesh.colors.as_ref().map(|_| Vec::new());
    let mut uvs = Vec::new();
    let mut indices = Vec::with_capacity(mesh.indices.len());

    // Keyed by (original vertex index, island index) so a vertex shared by
    // two islands gets one emitted copy per island, but triangles within
    // the same island that share a vertex still share the new index.
    let mut emitted: HashMap<(u32, usize), u32> = HashMap::new();

    for (island_idx, (island, dest)) in islands.iter().zip(dest_rects.iter()).enumerate() {
        for &t in &island.triangles {
            let tri = mesh.triangle(t);
            let mut new_tri = [0u32; 3];
            for (slot, &orig) in tri.iter().enumerate() {
                let key = (orig, island_idx);
                let new_index = *emitted.entry(key).or_insert_with(|| {
                    let new_index = (positions.len() / 3) as u32;
                    let p = mesh.position(orig as usize);
                    positions.extend_from_slice(&p);
                    if let (Some(dst), Some(n)) = (normals.as_mut(), mesh.normal(orig as usize)) {
                        dst.extend_from_slice(&n);
                    }
                    if let (Some(dst), Some(c)) = (colors.as_mut(), mesh.color(orig as usize)) {
                        dst.extend_from_slice(&c);
                    }
                    let uv = mesh.uv(orig as usize).unwrap_or([0.0, 0.0]);
                    let remapped = remap_uv(uv, island, dest, pad, atlas_w, atlas_h);
                    uvs.extend_from_slice(&remapped);
                    new_index
                });
                new_tri[slot] = new_index;
            }
            indices.extend_from_slice(&new_tri);
        }
    }

    IndexedMesh {
        positions,
        normals: normals.map(Some).unwrap_or(None),
        uvs: Some(uvs),
        colors: colors.map(Some).unwrap_or(None),
        indices,
        material: mesh.material,
    }
}

/// `u' = (R.x + pad + 0.5 + (u - I.u_min) * (R.w - 2*pad - 1)) / W`, and
/// analogously for `v'`. The half-texel inset keeps sampling strictly
/// inside the opaque region even at the content rect's own edge.
fn remap_uv(
    uv: [f32; 2],
    island: &UvIsland,
    dest: &PixelRect,
    pad: u32,
    atlas_w: u32,
    atlas_h: u32,
) -> [f32; 2] {
    // The per-vertex UV is raw (never wrapped); apply the same `floor(min)`
    // offset `detect_islands` subtracted when it measured this island's
    // bounds, so the two stay in the same coordinate space.
    let u = uv[0] as f64 - island.wrap[0];
    let v = uv[1] as f64 - island.wrap[1];
    let pad = pad as f64;
    let u_prime = (dest.x as f64 + pad + 0.5 + (u - island.uv_min[0]) * (dest.w as f64 - 2.0 * pad - 1.0))
        / atlas_w as f64;
    let v_prime = (dest.y as f64 + pad + 0.5 + (v - island.uv_min[1]) * (dest.h as f64 - 2.0 * pad - 1.0))
        / atlas_h as f64;
    [u_prime as f32, v_prime as f32]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uv_min_corner_lands_half_texel_inside_the_content_rect() {
        let island = UvIsland {
            triangles: vec![0],
            uv_min: [0.0, 0.0],
            uv_max: [1.0, 1.0],
            wrap: [0.0, 0.0],
        };
        let dest = PixelRect { x: 10, y: 10, w: 20, h: 20 };
        let [u, v] = remap_uv([0.0, 0.0], &island, &dest, 2, 256, 256);
        // x = (10 + 2 + 0.5) / 256
        assert!((u - (12.5 / 256.0) as f32).abs() < 1e-6);
        assert!((v - (12.5 / 256.0) as f32).abs() < 1e-6);
    }
}
