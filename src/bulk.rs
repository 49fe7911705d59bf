// Copyright 2019 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Morton (Z-order) curve support for the bulk loader (spec §4.5).
//!
//! The recursive partition-and-insert algorithm itself lives on
//! [`crate::Quadtree::add_bulk`], since it needs the arena and the item
//! store; this module holds the pure, independently testable pieces: the
//! bit-interleave and the per-axis quantisation.

use crate::geometry::Point;
use crate::item::ItemId;
use num_traits::Float;

/// Spreads the low 16 bits of `x` so each occupies an even bit position,
/// leaving the odd positions zero. The standard "Part1By1" trick used to
/// build 2d Morton codes.
fn part_1_by_1(x: u32) -> u32 {
    let mut x = x & 0x0000_ffff;
    x = (x | (x << 8)) & 0x00FF_00FF;
    x = (x | (x << 4)) & 0x0F0F_0F0F;
    x = (x | (x << 2)) & 0x3333_3333;
    x = (x | (x << 1)) & 0x5555_5555;
    x
}

/// Interleaves two 16-bit-quantised axis coordinates into a 32-bit Morton
/// (Z-order) code.
pub(crate) fn morton_code(qx: u32, qy: u32) -> u32 {
    part_1_by_1(qx) | (part_1_by_1(qy) << 1)
}

/// Quantises `value` into `[0, quant]` given the bounding extent
/// `[min, min + extent)`. Returns `0` for a degenerate (zero or
/// non-finite) extent rather than dividing by it.
fn quantise<T: Float>(value: T, min: T, extent: T, quant: u32) -> u32 {
    if !extent.is_finite() || extent <= T::zero() {
        return 0;
    }
    let quant_t = T::from(quant).unwrap_or_else(T::max_value);
    let normalised = ((value - min) / extent)
        .max(T::zero())
        .min(T::one());
    (normalised * quant_t)
        .to_u32()
        .unwrap_or(quant)
}

/// One item tagged with its Morton code, ready to be stably sorted.
pub(crate) struct MortonItem<G> {
    pub(crate) code: u32,
    pub(crate) id: ItemId,
    pub(crate) geometry: G,
}

/// Computes each item's Morton code from its representative point (spec
/// §4.5 steps 1-3) and stable-sorts ascending (step 4).
///
/// Returns an empty vec unchanged; a single item gets code `0` (its
/// bounding box is a point, so quantisation degenerates harmlessly).
pub(crate) fn sort_by_morton<T: Float, G>(
    items: Vec<(ItemId, G)>,
    morton_point: impl Fn(&G) -> Point<T>,
    quantisation: u32,
) -> Vec<MortonItem<G>> {
    if items.is_empty() {
        return Vec::new();
    }

    let points: Vec<Point<T>> = items.iter().map(|(_, g)| morton_point(g)).collect();
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (points[0].x, points[0].y, points[0].x, points[0].y);
    for p in &points[1..] {
        if p.x < min_x {
            min_x = p.x;
        }
        if p.x > max_x {
            max_x = p.x;
        }
        if p.y < min_y {
            min_y = p.y;
        }
        if p.y > max_y {
            max_y = p.y;
        }
    }
    let extent_x = max_x - min_x;
    let extent_y = max_y - min_y;

    let mut tagged: Vec<MortonItem<G>> = items
        .into_iter()
        .zip(points)
        .map(|((id, geometry), p)| {
            let qx = quantise(p.x, min_x, extent_x, quantisation);
            let qy = quantise(p.y, min_y, extent_y, quantisation);
            MortonItem {
                code: morton_code(qx, qy),
                id,
                geometry,
            }
        })
        .collect();

    tagged.sort_by_key(|item| item.code);
    tagged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleave_known_values() {
        assert_eq!(morton_code(0, 0), 0);
        assert_eq!(morton_code(1, 0), 1);
        assert_eq!(morton_code(0, 1), 2);
        assert_eq!(morton_code(1, 1), 3);
        assert_eq!(morton_code(2, 0), 4);
        assert_eq!(morton_code(0, 2), 8);
    }

    #[test]
    fn quantise_clamps_into_range() {
        assert_eq!(quantise(0.0_f64, 0.0, 10.0, 0xFFFF), 0);
        assert_eq!(quantise(10.0_f64, 0.0, 10.0, 0xFFFF), 0xFFFF);
        assert_eq!(quantise(5.0_f64, 0.0, 10.0, 0xFFFF), 0xFFFF / 2);
    }

    #[test]
    fn quantise_handles_degenerate_extent() {
        assert_eq!(quantise(3.0_f64, 3.0, 0.0, 0xFFFF), 0);
    }

    #[test]
    fn sort_is_ascending_by_code() {
        let items: Vec<(ItemId, Point<f64>)> = vec![
            (ItemId(0), Point { x: 9.0, y: 9.0 }),
            (ItemId(1), Point { x: 0.0, y: 0.0 }),
            (ItemId(2), Point { x: 4.0, y: 4.0 }),
        ];
        let sorted = sort_by_morton(items, |p| *p, 0xFFFF);
        for pair in sorted.windows(2) {
            assert!(pair[0].code <= pair[1].code);
        }
    }
}
