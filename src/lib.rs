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

//! A mutable, in-memory region quadtree over rectangle, point, and
//! inverted-point ("find by predicate, not by structure") item geometries.
//!
//! ```
//! use region_quadtree::{Quadtree, RectShape, Rect};
//!
//! let mut qt: Quadtree<f64, RectShape, &str> = Quadtree::new(Rect::new((0.0, 0.0), 100.0, 100.0));
//! let id = qt.add(Rect::new((10.0, 10.0), 5.0, 5.0), "sensor-1");
//!
//! let hits: Vec<_> = qt.query(Rect::new((0.0, 0.0), 20.0, 20.0)).collect();
//! assert_eq!(hits.len(), 1);
//! assert_eq!(*hits[0].value(), "sensor-1");
//!
//! qt.relocate(id, Rect::new((90.0, 90.0), 5.0, 5.0));
//! assert!(qt.query(Rect::new((0.0, 0.0), 20.0, 20.0)).next().is_none());
//! ```
//!
//! A node holds items directly in a bucket up to a configurable capacity
//! and only subdivides into four children once that capacity is exceeded
//! (lazy subdivision); an item that straddles a split stays at the node
//! that introduced the split rather than being duplicated into multiple
//! children. Deletions and relocations trigger self-coalescing cleanup so
//! the tree doesn't accumulate empty subtrees over time. See `DESIGN.md`
//! for the grounding behind each piece and the open questions this crate
//! resolved while building it.

mod arena;
mod bulk;
mod config;
mod entry;
mod error;
mod geometry;
mod item;
mod policy;
mod query;
mod tree;

pub use config::{QuadtreeConfig, QuadtreeConfigBuilder, QuadtreeConfigBuilderError};
pub use entry::Entry;
pub use error::QuadtreeError;
pub use geometry::{Point, Rect, RectBuilder, RectBuilderError};
pub use item::ItemId;
pub use policy::{ItemShape, PointInvQuery, PointInvShape, PointShape, RectShape};
pub use query::{AllItems, Iter};
pub use tree::Quadtree;
