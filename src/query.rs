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

//! The hoisting query traversal (spec §4.6): `Iter` is the lazy, two-stack
//! form (`EnumObjects`), driven incrementally by `Iterator::next` so a
//! caller can stop early without paying for the rest of the traversal. The
//! eager forms ([`Quadtree::query_collect`](crate::Quadtree::query_collect)
//! and [`Quadtree::query_for_each`](crate::Quadtree::query_for_each)) built
//! on [`Quadtree::query`](crate::Quadtree::query) just run this iterator to
//! completion, so the two forms can't disagree with each other by
//! construction.
//!
//! This generalizes the same "stack of nodes still needing a test, plus a
//! stack of handles ready to yield" shape the teacher crate's `HandleIter`
//! (`src/handle_iter.rs`) already uses for its own query descent -- the
//! addition here is the second, "fully contained, emit unconditionally"
//! stack that distinguishes hoisting from a plain filtered walk.

use crate::arena::Arena;
use crate::entry::Entry;
use crate::item::{ItemId, ItemRecord};
use crate::policy::ItemShape;
use num_traits::Float;
use std::collections::HashMap;

/// A lazy iterator over every item in a [`Quadtree`](crate::Quadtree) that
/// matches a query, in an unspecified but deterministic order. Produced by
/// [`Quadtree::query`](crate::Quadtree::query).
pub struct Iter<'a, T, S: ItemShape<T>, V>
where
    T: Float,
{
    pub(crate) store: &'a HashMap<ItemId, ItemRecord<S::Geometry, V>>,
    pub(crate) arena: &'a Arena<T>,
    pub(crate) query: S::Query,
    // Nodes not yet known to be fully contained by the query; each still
    // needs a `query_contains`/`query_intersects` test.
    pub(crate) node_stack: Vec<crate::arena::NodeId>,
    // Nodes already known to be fully contained: every item beneath them is
    // emitted unconditionally (the hoisting fast path).
    pub(crate) hoisted_stack: Vec<crate::arena::NodeId>,
    // Items ready to yield.
    pub(crate) item_stack: Vec<ItemId>,
}

impl<'a, T, S, V> Iterator for Iter<'a, T, S, V>
where
    T: Float,
    S: ItemShape<T>,
{
    type Item = Entry<'a, S::Geometry, V>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(id) = self.item_stack.pop() {
                let rec = &self.store[&id];
                return Some(Entry::new(id, &rec.geometry, &rec.value));
            }

            if let Some(nid) = self.hoisted_stack.pop() {
                let node = self.arena.get(nid);
                self.item_stack.extend(node.bucket.iter().copied());
                if let Some(children) = node.children {
                    self.hoisted_stack.extend(children);
                }
                continue;
            }

            if let Some(nid) = self.node_stack.pop() {
                let node = self.arena.get(nid);
                if S::query_contains(&self.query, node.rect) {
                    self.hoisted_stack.push(nid);
                } else if S::query_intersects(&self.query, node.rect) {
                    for id in &node.bucket {
                        if S::query_matches(&self.query, &self.store[id].geometry) {
                            self.item_stack.push(*id);
                        }
                    }
                    if let Some(children) = node.children {
                        self.node_stack.extend(children);
                    }
                }
                continue;
            }

            return None;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.store.len()))
    }
}

impl<'a, T, S, V> std::iter::FusedIterator for Iter<'a, T, S, V>
where
    T: Float,
    S: ItemShape<T>,
{
}

/// A lazy iterator over every live item in a [`Quadtree`](crate::Quadtree),
/// regardless of query -- `GetAllObjects`. Plain DFS of the arena; no
/// hoisting or per-item predicate applies since there is no query to test
/// against.
pub struct AllItems<'a, T, G, V> {
    pub(crate) store: &'a HashMap<ItemId, ItemRecord<G, V>>,
    pub(crate) arena: &'a Arena<T>,
    pub(crate) node_stack: Vec<crate::arena::NodeId>,
    pub(crate) item_stack: Vec<ItemId>,
    pub(crate) _shape: std::marker::PhantomData<G>,
}

impl<'a, T, G, V> Iterator for AllItems<'a, T, G, V> {
    type Item = Entry<'a, G, V>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(id) = self.item_stack.pop() {
                let rec = &self.store[&id];
                return Some(Entry::new(id, &rec.geometry, &rec.value));
            }

            let nid = self.node_stack.pop()?;
            let node = self.arena.get(nid);
            self.item_stack.extend(node.bucket.iter().copied());
            if let Some(children) = node.children {
                self.node_stack.extend(children);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.store.len()))
    }
}

impl<'a, T, G, V> std::iter::FusedIterator for AllItems<'a, T, G, V> {}
