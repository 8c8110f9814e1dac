/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The BFS peeler.
//!
//! Runs one or a few breadth-first traversals over a distributed boolean
//! adjacency matrix, each from the globally smallest unvisited vertex, and
//! afterwards shrinks the edge bus to the edges whose source was never
//! visited. On scale-free graphs the first traversal covers the giant
//! component, leaving a much sparser residue for the coloring engine.
//!
//! The peeler owns the matrix, the per-run parents vector and the unvisited
//! set; ids must be compacted to `[0, |V|)` before construction.

use std::collections::HashSet;
use std::time::Instant;

use log::info;

use crate::comm::sort::{distribute, is_sorted_by, samplesort_by};
use crate::comm::Communicator;
use crate::graph::{by_src, Edge};

pub mod matrix;

use matrix::{AdjMatrix, Entry};

/// Parent slot of a vertex not reached by the current run.
const UNVISITED: u64 = u64::MAX;

/// Telemetry of one BFS run.
#[derive(Debug, Clone, Copy)]
pub struct BfsRunStats {
    /// Vertices visited by this run, the size of the peeled component.
    pub visited: u64,
    /// Millions of traversed edges per second, minimum over ranks.
    pub mteps: f64,
}

pub struct Peeler<'a, C: Communicator> {
    comm: &'a C,
    matrix: AdjMatrix,
    /// Locally indexed vertex ids not yet covered by any run; translated to
    /// global ids only at source-selection and filter time.
    unvisited: HashSet<u64>,
}

impl<'a, C: Communicator> Peeler<'a, C> {
    /// Builds the adjacency matrix and marks every vertex unvisited.
    /// Collective.
    pub fn new(edges: &[Edge], nvertices: u64, comm: &'a C) -> Self {
        let matrix = AdjMatrix::new(edges, nvertices, comm);
        let unvisited = (0..matrix.local_rows() as u64).collect();
        Self {
            comm,
            matrix,
            unvisited,
        }
    }

    /// Runs up to `iterations` BFS traversals, returning the stats of the
    /// runs actually executed; stops early when every vertex is covered.
    pub fn run_iterations(&mut self, iterations: usize) -> Vec<BfsRunStats> {
        let mut stats = Vec::with_capacity(iterations);
        let (row_lo, _) = self.matrix.row_range();

        for _ in 0..iterations {
            // The smallest unvisited global id over all ranks, or MAX when
            // the graph is fully covered.
            let candidate = self
                .unvisited
                .iter()
                .min()
                .map(|&local| local + row_lo)
                .unwrap_or(u64::MAX);
            let source = self.comm.all_reduce(candidate, |a, b| a.min(b));
            if source == u64::MAX {
                if self.comm.rank() == 0 {
                    info!("all vertices already covered, no more BFS iterations required");
                }
                return stats;
            }

            let start = Instant::now();
            let mut parents = vec![UNVISITED; self.matrix.local_rows()];
            let mut frontier = Vec::new();
            if source >= row_lo && source - row_lo < self.matrix.local_rows() as u64 {
                let local = source - row_lo;
                parents[local as usize] = source;
                self.unvisited.remove(&local);
                frontier.push(Entry {
                    index: source,
                    value: source,
                });
            }
            let mut visited = 1u64;

            loop {
                for f in frontier.iter_mut() {
                    f.value = f.index;
                }
                let proposals = self.matrix.spmv(&frontier, self.comm);

                // Keep only proposals whose parents slot is still empty.
                frontier.clear();
                for e in proposals {
                    let local = (e.index - row_lo) as usize;
                    if parents[local] == UNVISITED {
                        parents[local] = e.value;
                        self.unvisited.remove(&(e.index - row_lo));
                        frontier.push(e);
                    }
                }

                let newly = self.comm.all_reduce(frontier.len() as u64, |a, b| a + b);
                visited += newly;
                if newly == 0 {
                    break;
                }
            }

            // Edges touched by this run: the degree sum of its vertices.
            let local_traversed: u64 = parents
                .iter()
                .enumerate()
                .filter(|&(_, &p)| p != UNVISITED)
                .map(|(local, _)| self.matrix.degree(local))
                .sum();
            let traversed = self.comm.all_reduce(local_traversed, |a, b| a + b);
            let secs = start.elapsed().as_secs_f64();
            let mteps = if secs > 0.0 {
                traversed as f64 / secs / 1e6
            } else {
                0.0
            };
            let mteps = self.comm.all_reduce(mteps, f64::min);

            if self.comm.rank() == 0 {
                info!("BFS run visited {visited} vertices ({mteps:.1} MTEPS)");
            }
            stats.push(BfsRunStats { visited, mteps });
        }
        stats
    }

    /// Shrinks the edge bus to the edges whose source is still unvisited
    /// and restores block balance. Call after the BFS runs.
    pub fn filter_edges(&mut self, edges: &mut Vec<Edge>) {
        let (row_lo, _) = self.matrix.row_range();

        if self.comm.global_size(edges.len()) == 0 {
            return;
        }
        // Usually already sorted by source from compaction.
        if !is_sorted_by(edges, self.comm, by_src) {
            samplesort_by(edges, self.comm, by_src);
        }

        let lens = self.comm.all_gather(edges.len() as u64);
        let firsts = self.comm.all_gather(edges.first().map(|e| e.src).unwrap_or(0));
        let owners: Vec<(u64, usize)> = (0..self.comm.size())
            .filter(|&r| lens[r] > 0)
            .map(|r| (firsts[r], r))
            .collect();

        // Route every unvisited id to the last edge-holding rank whose
        // first source is not past it.
        let mut buckets: Vec<Vec<u64>> = vec![Vec::new(); self.comm.size()];
        for &local in &self.unvisited {
            let v = local + row_lo;
            let pos = owners.partition_point(|&(first, _)| first <= v);
            let target = if pos == 0 { owners[0].1 } else { owners[pos - 1].1 };
            buckets[target].push(v);
        }
        let mut wanted = self.comm.all_to_all_v(buckets);
        wanted.sort_unstable();

        // A bucket of edges sharing one source may straddle the rank
        // boundary; the straddling vertex is the first id received by the
        // next rank that received anything, so borrow it.
        let have = self.comm.all_gather(!wanted.is_empty() as u64);
        let heads = self.comm.all_gather(wanted.first().copied().unwrap_or(0));
        let borrow = (self.comm.rank() + 1..self.comm.size())
            .find(|&r| have[r] != 0)
            .map(|r| heads[r]);
        if let Some(b) = borrow {
            wanted.push(b);
        }

        let mut kept = Vec::new();
        let mut ei = 0;
        for &v in &wanted {
            while ei < edges.len() && edges[ei].src < v {
                ei += 1;
            }
            while ei < edges.len() && edges[ei].src == v {
                kept.push(edges[ei]);
                ei += 1;
            }
        }

        *edges = kept;
        distribute(edges, self.comm);
    }
}
