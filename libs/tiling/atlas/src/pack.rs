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

//! Guillotine bin packer: best-fit by shorter side, splitting the remaining
//! free rectangle along its longer residual axis (spec.md §4.4).

/// An axis-aligned pixel rectangle, origin at top-left.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Adaptive bleed padding by island size, per spec.md §4.4's table.
pub fn bleed_for(max_dim: u32) -> u32 {
    if max_dim <= 100 {
        2
    } else if max_dim <= 200 {
        4
    } else {
        5
    }
}

struct FreeRect {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

/// Packs `sizes` (content width/height, padding NOT yet included) into the
/// smallest square canvas whose side is a power of two, growing by doubling
/// until everything fits. Returns, in the order `sizes` was given, the
/// pixel rect each item landed at (content + `pad` border on every side).
pub fn pack(sizes: &[(u32, u32)], pad: u32) -> (u32, u32, Vec<PixelRect>) {
    let mut order: Vec<usize> = (0..sizes.len()).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(sizes[i].1 + 2 * pad));

    let mut side = starting_side(sizes, pad);
    loop {
        if let Some(placed) = try_pack(sizes, &order, pad, side) {
            return (side, side, placed);
        }
        side *= 2;
    }
}

fn starting_side(sizes: &[(u32, u32)], pad: u32) -> u32 {
    let total_area: u64 = sizes
        .iter()
        .map(|&(w, h)| (w as u64 + 2 * pad as u64) * (h as u64 + 2 * pad as u64))
        .sum();
    let max_dim = sizes
        .iter()
        .map(|&(w, h)| (w + 2 * pad).max(h + 2 * pad))
        .max()
        .unwrap_or(1);
    let mut side = 1u32;
    while (side as u64) * (side as u64) < total_area || side < max_dim {
        side = side.saturating_mul(2).max(1);
        if side == 0 {
            side = max_dim.next_power_of_two().max(1);
            break;
        }
    }
    side.next_power_of_two().max(1)
}

fn try_pack(
    sizes: &[(u32, u32)],
    order: &[usize],
    pad: u32,
    side: u32,
) -> Option<Vec<PixelRect>> {
    let mut free = vec![FreeRect {
        x: 0,
        y: 0,
        w: side,
        h: side,
    }];
    let mut placed = vec![
        PixelRect {
            x: 0,
            y: 0,
            w: 0,
            h: 0
        };
        sizes.len()
    ];

    for &i in order {
        let (content_w, content_h) = sizes[i];
        let need_w = content_w + 2 * pad;
        let need_h = content_h + 2 * pad;

        let best = free
            .iter()
            .enumerate()
            .filter(|(_, r)| r.w >= need_w && r.h >= need_h)
            .min_by_key(|(_, r)| (r.w - need_w).min(r.h - need_h))
            .map(|(idx, _)| idx)?;

        let chosen = free.swap_remove(best);
        placed[i] = PixelRect {
            x: chosen.x,
            y: chosen.y,
            w: need_w,
            h: need_h,
        };

        let right_leftover = chosen.w - need_w;
        let bottom_leftover = chosen.h - need_h;
        if right_leftover > bottom_leftover {
            push_non_empty(&mut free, chosen.x + need_w, chosen.y, right_leftover, chosen.h);
            push_non_empty(&mut free, chosen.x, chosen.y + need_h, need_w, bottom_leftover);
        } else {
            push_non_empty(&mut free, chosen.x, chosen.y + need_h, chosen.w, bottom_leftover);
            push_non_empty(&mut free, chosen.x + need_w, chosen.y, right_leftover, need_h);
        }
    }

    Some(placed)
}

fn push_non_empty(free: &mut Vec<FreeRect>, x: u32, y: u32, w: u32, h: u32) {
    if w > 0 && h > 0 {
        free.push(FreeRect { x, y, w, h });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bleed_table_matches_spec() {
        assert_eq!(bleed_for(50), 2);
        assert_eq!(bleed_for(100), 2);
        assert_eq!(bleed_for(150), 4);
        assert_eq!(bleed_for(200), 4);
        assert_eq!(bleed_for(201), 5);
    }

    #[test]
    fn packs_non_overlapping_rects() {
        let sizes = vec![(64, 64), (32, 32), (16, 64), (100, 20)];
        let (w, h, rects) = pack(&sizes, 2);
        assert!(w.is_power_of_two());
        assert!(h.is_power_of_two());
        for i in 0..rects.len() {
            for j in (i + 1)..rects.len() {
                assert!(!overlap(&rects[i], &rects[j]), "rects {i} and {j} overlap");
            }
        }
    }

    fn overlap(a: &PixelRect, b: &PixelRect) -> bool {
        a.x < b.x + b.w && b.x < a.x + a.w && a.y < b.y + b.h && b.y < a.y + a.h
    }

    #[test]
    fn grows_canvas_until_everything_fits() {
        let sizes: Vec<(u32, u32)> = (0..40).map(|_| (50, 50)).collect();
        let (w, h, rects) = pack(&sizes, 2);
        assert_eq!(rects.len(), 40);
        assert!((w as u64) * (h as u64) >= 40 * 54 * 54);
    }
}
