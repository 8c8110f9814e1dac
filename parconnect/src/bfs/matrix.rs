/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Distributed boolean adjacency matrix for the BFS peeler.
//!
//! Rows are distributed in 1-D blocks aligned with the `parents` vector
//! partition, so a frontier entry always lives on the rank owning its
//! adjacency row and SpMV needs a single `all_to_all_v` per level: every
//! frontier vertex proposes itself as parent to its neighbors, proposals
//! are routed to the owner of the target index, and duplicates collapse to
//! the maximum proposer (the `(max, AND)` semiring over booleans).

use crate::comm::{block_owner, block_range, Communicator};
use crate::graph::Edge;

/// A sparse-vector entry: a global vertex index and the value it carries
/// (during BFS, the proposing parent).
#[cfg_attr(feature = "mpi", derive(mpi::traits::Equivalence))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Entry {
    pub index: u64,
    pub value: u64,
}

pub struct AdjMatrix {
    nvertices: u64,
    size: usize,
    row_lo: u64,
    row_hi: u64,
    offsets: Vec<usize>,
    cols: Vec<u64>,
    /// Per-row degree totals, duplicate edges included; used for the MTEPS
    /// telemetry.
    degrees: Vec<u64>,
}

impl AdjMatrix {
    /// Builds the matrix from the edge bus: every `(u, v)` sets
    /// `A[u, v] = true`. Collective.
    pub fn new<C: Communicator>(edges: &[Edge], nvertices: u64, comm: &C) -> Self {
        let p = comm.size();
        let (row_lo, row_hi) = block_range(nvertices, p, comm.rank());
        let local_rows = (row_hi - row_lo) as usize;

        let mut buckets: Vec<Vec<Edge>> = vec![Vec::new(); p];
        for e in edges {
            buckets[block_owner(nvertices, p, e.src)].push(*e);
        }
        let mut mine = comm.all_to_all_v(buckets);
        mine.sort_unstable();

        let mut offsets = vec![0usize; local_rows + 1];
        let mut cols = Vec::with_capacity(mine.len());
        let mut degrees = vec![0u64; local_rows];
        let mut idx = 0;
        for row in 0..local_rows {
            let src = row_lo + row as u64;
            let mut prev = None;
            while idx < mine.len() && mine[idx].src == src {
                degrees[row] += 1;
                let dst = mine[idx].dst;
                // Boolean matrix: duplicate (src, dst) pairs are adjacent
                // after the sort and collapse to one column.
                if prev != Some(dst) {
                    cols.push(dst);
                    prev = Some(dst);
                }
                idx += 1;
            }
            offsets[row + 1] = cols.len();
        }
        debug_assert_eq!(idx, mine.len());

        Self {
            nvertices,
            size: p,
            row_lo,
            row_hi,
            offsets,
            cols,
            degrees,
        }
    }

    #[inline]
    pub fn nvertices(&self) -> u64 {
        self.nvertices
    }

    #[inline]
    pub fn row_range(&self) -> (u64, u64) {
        (self.row_lo, self.row_hi)
    }

    #[inline]
    pub fn local_rows(&self) -> usize {
        (self.row_hi - self.row_lo) as usize
    }

    #[inline]
    pub fn degree(&self, local_row: usize) -> u64 {
        self.degrees[local_row]
    }

    /// One SpMV step over the `(max, AND)` semiring: every frontier entry
    /// proposes its value to the neighbors of its index; the returned
    /// entries are the proposals for locally owned indices, one per index,
    /// duplicates collapsed to the maximum value. Collective.
    pub fn spmv<C: Communicator>(&self, frontier: &[Entry], comm: &C) -> Vec<Entry> {
        let mut buckets: Vec<Vec<Entry>> = vec![Vec::new(); self.size];
        for f in frontier {
            debug_assert!((self.row_lo..self.row_hi).contains(&f.index));
            let row = (f.index - self.row_lo) as usize;
            for &dst in &self.cols[self.offsets[row]..self.offsets[row + 1]] {
                buckets[block_owner(self.nvertices, self.size, dst)].push(Entry {
                    index: dst,
                    value: f.value,
                });
            }
        }
        let mut proposals = comm.all_to_all_v(buckets);
        proposals.sort_unstable_by(|a, b| a.index.cmp(&b.index).then(a.value.cmp(&b.value)));
        proposals.dedup_by(|next, kept| {
            if next.index == kept.index {
                // Sorted ascending, so the later value is the larger one.
                kept.value = next.value;
                true
            } else {
                false
            }
        });
        proposals
    }
}
