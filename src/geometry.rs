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

//! The value types the tree is built from: [`Point`] and [`Rect`].
//!
//! Both are lightweight, `Copy` types meant to be passed by value, the same
//! way the [`Area`]/[`Point`] pair in the crate this one is descended from
//! are passed by value.
//!
//! [`Area`]: https://docs.rs/quadtree_rs

use derive_builder::Builder;
use num_traits::Float;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A point in 2d space.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T: Float + Debug> Debug for Point<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

impl<T> From<(T, T)> for Point<T> {
    fn from((x, y): (T, T)) -> Self {
        Self { x, y }
    }
}

impl<T: Copy> From<Point<T>> for (T, T) {
    fn from(p: Point<T>) -> Self {
        (p.x, p.y)
    }
}

/// An axis-aligned rectangular region, anchored at its top-left corner.
///
/// **NB:**
///   - `x` and `y` can be any finite or non-finite coordinate.
///   - `w` and `h` must be non-negative (zero-area rectangles are allowed —
///     see the "Degenerate geometry" case in the crate's error-handling
///     design — but negative extents are a builder error).
///
/// Containment is the half-open convention `[left, right) x [top, bottom)`
/// for point-in-rect tests (required so that a lazily-subdivided node's four
/// children tile it without overlap at the split lines — see invariant I3 in
/// the crate docs). Rect-in-rect containment and rect/rect intersection use
/// the symmetric closed-interval formulas described in the crate's value-type
/// contract: containment is non-strict (`⊇`), and intersection counts shared
/// edges.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct Rect<T> {
    #[builder(setter(into))]
    anchor: Point<T>,
    dimensions: (T, T),
}

impl<T: Float> RectBuilder<T> {
    fn validate(&self) -> Result<(), String> {
        if let Some((w, h)) = self.dimensions {
            if w < T::zero() {
                return Err("Rects may not have negative widths.".to_string());
            }
            if h < T::zero() {
                return Err("Rects may not have negative heights.".to_string());
            }
        }
        Ok(())
    }
}

impl<T: Float + Debug> Debug for Rect<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "({:?})->{:?}x{:?}",
            self.anchor(),
            self.width(),
            self.height()
        )
    }
}

impl<T: Float> Rect<T> {
    /// Constructs a rect from an anchor point and (width, height).
    ///
    /// # Panics
    /// Panics if either extent is negative.
    pub fn new(anchor: impl Into<Point<T>>, width: T, height: T) -> Self {
        RectBuilder::default()
            .anchor(anchor.into())
            .dimensions((width, height))
            .build()
            .expect("Rect::new called with a negative extent")
    }

    /// A unit (1x1) rect anchored at `pt`. Used to turn a bare point into a
    /// rect for the point-geometry policy variants.
    pub fn unit_at(pt: impl Into<Point<T>>) -> Self {
        Self::new(pt, T::one(), T::one())
    }

    pub fn anchor(&self) -> Point<T> {
        self.anchor
    }

    pub fn width(&self) -> T {
        self.dimensions.0
    }

    pub fn height(&self) -> T {
        self.dimensions.1
    }

    pub fn left(&self) -> T {
        self.anchor.x
    }

    pub fn top(&self) -> T {
        self.anchor.y
    }

    pub fn right(&self) -> T {
        self.anchor.x + self.width()
    }

    pub fn bottom(&self) -> T {
        self.anchor.y + self.height()
    }

    /// The area of the rect. `NaN` for degenerate/non-finite rects.
    pub fn area(&self) -> T {
        self.width() * self.height()
    }

    /// Whether every coordinate involved is finite (not NaN, not infinite).
    pub fn is_finite(&self) -> bool {
        self.left().is_finite()
            && self.top().is_finite()
            && self.width().is_finite()
            && self.height().is_finite()
    }

    /// Whether `self` wholly contains `other` (non-strict, `⊇`).
    pub fn contains_rect(&self, other: Rect<T>) -> bool {
        self.left() <= other.left()
            && other.right() <= self.right()
            && self.top() <= other.top()
            && other.bottom() <= self.bottom()
    }

    /// Closed-interval overlap: rects that merely share an edge intersect.
    pub fn intersects(&self, other: Rect<T>) -> bool {
        self.left() <= other.right()
            && self.right() >= other.left()
            && self.top() <= other.bottom()
            && self.bottom() >= other.top()
    }

    /// Half-open point containment, `[left, right) x [top, bottom)`. This is
    /// the convention used internally to decide which single child of a
    /// subdivided node a point belongs to.
    pub fn contains_point(&self, p: Point<T>) -> bool {
        self.left() <= p.x && p.x < self.right() && self.top() <= p.y && p.y < self.bottom()
    }

    /// The geometric midpoint of the rect, used both by lazy `Subdivide` and
    /// as the bulk loader's fallback split point.
    pub fn midpoint(&self) -> Point<T> {
        let two = T::one() + T::one();
        Point {
            x: self.left() + self.width() / two,
            y: self.top() + self.height() / two,
        }
    }

    /// Splits `self` into (top-left, top-right, bottom-left, bottom-right)
    /// children around `split`. `split` need not be the geometric midpoint —
    /// the bulk loader picks a data-dependent split point (spec §4.5).
    pub fn split_at(&self, split: Point<T>) -> [Rect<T>; 4] {
        let tl = Rect::new(self.anchor(), split.x - self.left(), split.y - self.top());
        let tr = Rect::new(
            Point {
                x: split.x,
                y: self.top(),
            },
            self.right() - split.x,
            split.y - self.top(),
        );
        let bl = Rect::new(
            Point {
                x: self.left(),
                y: split.y,
            },
            split.x - self.left(),
            self.bottom() - split.y,
        );
        let br = Rect::new(split, self.right() - split.x, self.bottom() - split.y);
        [tl, tr, bl, br]
    }
}

impl<T: Float> PartialEq for Rect<T> {
    fn eq(&self, other: &Self) -> bool {
        self.anchor == other.anchor && self.dimensions == other.dimensions
    }
}

impl<T: Float> PartialEq for Point<T> {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}
