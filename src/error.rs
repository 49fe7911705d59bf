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

//! The small, closed error taxonomy described in the crate's design: most
//! fallible operations are soft (`Option`/`bool`, never raised) and only one
//! case is a genuine programmer error.

use thiserror::Error;

/// Errors raised by fatal (programmer-error) operations.
///
/// Everything else the tree can fail to do -- `remove`/`relocate` of an
/// absent item, a query that matches nothing, degenerate item geometry --
/// is modeled as a normal `Option`/`bool` return, never as this type.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuadtreeError {
    /// `add_bulk` was called on a subtree that already has children, or that
    /// already holds items. Bulk loading requires a leaf to partition into.
    #[error("add_bulk requires an empty leaf subtree to build into")]
    BulkLoadOnNonLeaf,
}
