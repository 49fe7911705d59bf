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

//! The tunable constants from the crate's value-type contract, ported from
//! compile-time constants to a runtime [`QuadtreeConfig`] (built with a
//! [`QuadtreeConfigBuilder`], the same `derive_builder` idiom used for
//! [`crate::geometry::Rect`]) so a single binary can run more than one
//! quadtree with different tunings.

use derive_builder::Builder;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tunable constants governing subdivision, bulk loading, and the optional
/// sparse-rebuild heuristic.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Builder)]
pub struct QuadtreeConfig {
    /// Bucket size that triggers subdivision on `Insert`. Default `10`.
    #[builder(default = "10")]
    pub bucket_cap: usize,
    /// Upper bound on a subtree's item count for the optional sparse-rebuild
    /// heuristic (see `enable_sparse_rebuild`). Default `22`.
    #[builder(default = "22")]
    pub rebuild_threshold: usize,
    /// Refuse to subdivide a node whose rect's area is smaller than this.
    /// Default `0.01`.
    #[builder(default = "0.01")]
    pub min_subdivide_area: f64,
    /// Stop recursive bulk partitioning once a partition holds at most this
    /// many items, inserting the remainder one by one. Default `8`.
    #[builder(default = "8")]
    pub bulk_leaf_cutoff: usize,
    /// Per-axis resolution for Morton/Z-order quantisation during bulk
    /// load. Default `0xFFFF` (16 bits per axis).
    #[builder(default = "0xFFFF")]
    pub morton_quantisation: u32,
    /// The source implementation guards the "rebuild subtree when sparse"
    /// optimization with an always-false condition, i.e. it is present in
    /// the code but permanently disabled. This crate exposes that decision
    /// as a config toggle rather than guessing at intended behavior --
    /// default `false`, matching the source. See `DESIGN.md`.
    #[builder(default = "false")]
    pub enable_sparse_rebuild: bool,
}

impl Default for QuadtreeConfig {
    fn default() -> Self {
        Self {
            bucket_cap: 10,
            rebuild_threshold: 22,
            min_subdivide_area: 0.01,
            bulk_leaf_cutoff: 8,
            morton_quantisation: 0xFFFF,
            enable_sparse_rebuild: false,
        }
    }
}
