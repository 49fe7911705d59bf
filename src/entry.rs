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

//! A view into a single item in the [`Quadtree`](crate::Quadtree), returned
//! by queries and by [`Quadtree::get`](crate::Quadtree::get).
//!
//! Mirrors the `Entry<U, V>` view type the teacher crate returns from its
//! own `.get()`/`.query()`, minus the handle-duplication bookkeeping that
//! crate's overlapping-region design needs (an item here lives in exactly
//! one node, so there is exactly one `Entry` per live item, not one per
//! node it happens to touch).

use crate::item::ItemId;

/// A read-only view of one item: its id, its current geometry, and its
/// value.
#[derive(Debug, Clone, Copy)]
pub struct Entry<'a, G, V> {
    id: ItemId,
    geometry: &'a G,
    value: &'a V,
}

impl<'a, G, V> Entry<'a, G, V> {
    pub(crate) fn new(id: ItemId, geometry: &'a G, value: &'a V) -> Self {
        Self {
            id,
            geometry,
            value,
        }
    }

    /// The handle this entry was looked up or yielded by.
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// The item's current geometry.
    pub fn geometry(&self) -> &'a G {
        self.geometry
    }

    /// The item's value.
    pub fn value(&self) -> &'a V {
        self.value
    }
}
