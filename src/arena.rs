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

//! The node arena.
//!
//! Spec §9's design notes call out the cyclic parent<->child references a
//! naive node-owns-children-owns-parent translation would need, and
//! recommend an arena of nodes addressed by integer id instead. That's what
//! this module is: nodes never own each other directly, every parent/child
//! link is a [`NodeId`], and the arena is the sole owner. Cleaning frees a
//! node's slot for reuse rather than dropping an owned subtree.

use crate::geometry::Rect;
use crate::item::ItemId;

/// An index into a [`Arena`]. Never reused while the node it names is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(u32);

/// The four children of a subdivided node, in the order the spec names them.
pub(crate) const TL: usize = 0;
pub(crate) const TR: usize = 1;
pub(crate) const BL: usize = 2;
pub(crate) const BR: usize = 3;

pub(crate) struct Node<T> {
    pub(crate) rect: Rect<T>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Option<[NodeId; 4]>,
    pub(crate) bucket: Vec<ItemId>,
}

impl<T: Copy> Node<T> {
    fn new(rect: Rect<T>, parent: Option<NodeId>) -> Self {
        Self {
            rect,
            parent,
            children: None,
            bucket: Vec::new(),
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.bucket.is_empty() && self.children.is_none()
    }
}

/// An arena of [`Node`]s, addressed by [`NodeId`]. Freed slots are reused by
/// later allocations (a simple free-list "slab"), so the arena's size
/// tracks live node count rather than total nodes ever allocated.
pub(crate) struct Arena<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<u32>,
}

impl<T: Copy> Arena<T> {
    pub(crate) fn with_root(rect: Rect<T>) -> (Self, NodeId) {
        let mut arena = Self {
            slots: Vec::new(),
            free: Vec::new(),
        };
        let root = arena.alloc(Node::new(rect, None));
        (arena, root)
    }

    fn alloc(&mut self, node: Node<T>) -> NodeId {
        if let Some(idx) = self.free.pop() {
            self.slots[idx as usize] = Some(node);
            NodeId(idx)
        } else {
            let idx = self.slots.len() as u32;
            self.slots.push(Some(node));
            NodeId(idx)
        }
    }

    pub(crate) fn alloc_child(&mut self, rect: Rect<T>, parent: NodeId) -> NodeId {
        self.alloc(Node::new(rect, Some(parent)))
    }

    pub(crate) fn free(&mut self, id: NodeId) {
        self.slots[id.0 as usize] = None;
        self.free.push(id.0);
    }

    pub(crate) fn get(&self, id: NodeId) -> &Node<T> {
        self.slots[id.0 as usize]
            .as_ref()
            .expect("dangling NodeId")
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node<T> {
        self.slots[id.0 as usize]
            .as_mut()
            .expect("dangling NodeId")
    }

    /// Drops every node but the root, resetting it to an empty leaf.
    pub(crate) fn reset(&mut self, root: NodeId, root_rect: Rect<T>) {
        self.slots.clear();
        self.free.clear();
        self.slots.push(Some(Node::new(root_rect, None)));
        debug_assert_eq!(root.0, 0);
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}
