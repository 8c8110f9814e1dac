/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Degree profiling and the BFS/coloring dispatch decision.
//!
//! The out-degree of a vertex is its number of distinct destinations. The
//! degree-frequency histogram is reduced to rank 0, padded by one per bin
//! for numerical stability, and handed to the discrete power-law fit. A
//! small Kolmogorov–Smirnov statistic means the graph is heavy-tailed, so a
//! single BFS from the giant component will peel most of it; a large one
//! means the graph is chain- or tree-like and goes straight to coloring.

use std::collections::HashMap;

use log::info;

use crate::comm::sort::{distribute, samplesort_by};
use crate::comm::Communicator;
use crate::graph::{by_src_dst, Edge};

pub mod powerlaw;

/// Decides whether a BFS peel should run, by fitting the degree
/// distribution against a discrete power law. Collective; the decision is
/// taken on rank 0 and broadcast.
pub fn run_bfs_decision<C: Communicator>(
    edges: &mut Vec<Edge>,
    threshold: f64,
    comm: &C,
) -> bool {
    distribute(edges, comm);
    samplesort_by(edges, comm, by_src_dst);

    // Local degree counts; the first and last bucket may straddle a rank
    // boundary, so they are set aside and merged on rank 0.
    let mut histogram: HashMap<u64, u64> = HashMap::new();
    let mut boundary: Vec<Edge> = Vec::new();
    let mut i = 0;
    while i < edges.len() {
        let src = edges[i].src;
        let mut j = i;
        while j < edges.len() && edges[j].src == src {
            j += 1;
        }
        if i == 0 || j == edges.len() {
            boundary.extend_from_slice(&edges[i..j]);
        } else {
            *histogram.entry(unique_dst_count(&edges[i..j])).or_insert(0) += 1;
        }
        i = j;
    }

    // Boundary runs arrive in rank order, so their concatenation is sorted
    // by (src, dst) and same-source runs from adjacent ranks merge.
    let gathered = comm.gather_v(&boundary, 0);
    if comm.rank() == 0 {
        let gathered = gathered.unwrap();
        let mut i = 0;
        while i < gathered.len() {
            let src = gathered[i].src;
            let mut j = i;
            while j < gathered.len() && gathered[j].src == src {
                j += 1;
            }
            *histogram.entry(unique_dst_count(&gathered[i..j])).or_insert(0) += 1;
            i = j;
        }
    }

    let local_max = histogram.keys().max().copied().unwrap_or(0);
    let max_degree = comm.all_reduce(local_max, |a, b| a.max(b));
    if max_degree == 0 {
        return comm.broadcast(0u8, 0) != 0;
    }

    // Frequency of degrees 1..=max_degree, summed to rank 0.
    let local_counts: Vec<f64> = (1..=max_degree)
        .map(|d| histogram.get(&d).copied().unwrap_or(0) as f64)
        .collect();
    let gathered = comm.gather_v(&local_counts, 0);

    let mut decision = 0u8;
    if comm.rank() == 0 {
        let gathered = gathered.unwrap();
        let bins = max_degree as usize;
        let mut global_counts = vec![0.0f64; bins];
        for (i, v) in gathered.into_iter().enumerate() {
            global_counts[i % bins] += v;
        }
        for c in global_counts.iter_mut() {
            *c += 1.0;
        }
        let fit = powerlaw::fit_discrete(&global_counts);
        if fit.d < threshold {
            info!(
                "Kolmogorov-Smirnov statistic {} (below {threshold}), running BFS",
                fit.d
            );
            decision = 1;
        } else {
            info!(
                "Kolmogorov-Smirnov statistic {} (above {threshold}), skipping BFS",
                fit.d
            );
        }
    }

    comm.broadcast(decision, 0) != 0
}

/// Distinct destinations of a run of edges sharing one source, sorted by
/// destination.
fn unique_dst_count(run: &[Edge]) -> u64 {
    let mut count = 0;
    let mut prev = None;
    for e in run {
        if prev != Some(e.dst) {
            count += 1;
            prev = Some(e.dst);
        }
    }
    count
}
