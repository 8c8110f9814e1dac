/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The distributed edge bus.
//!
//! Edges live in a block-partitioned `Vec<Edge>`, one contiguous slice per
//! rank, every undirected edge present in both orientations. The engines
//! mutate the bus in place: compaction rewrites endpoints, the BFS peeler
//! deletes the edges of visited components, the coloring engine reorders.

use std::cmp::Ordering;

use log::info;

use crate::comm::sort::{distribute, samplesort_by};
use crate::comm::Communicator;

pub mod compact;
pub mod permute;

/// A directed edge pair; an undirected edge appears in both orientations.
#[cfg_attr(feature = "mpi", derive(mpi::traits::Equivalence))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge {
    pub src: u64,
    pub dst: u64,
}

impl Edge {
    #[inline]
    pub fn new(src: u64, dst: u64) -> Self {
        Self { src, dst }
    }
}

impl From<(u64, u64)> for Edge {
    fn from((src, dst): (u64, u64)) -> Self {
        Self { src, dst }
    }
}

#[inline]
pub fn by_src(a: &Edge, b: &Edge) -> Ordering {
    a.src.cmp(&b.src)
}

#[inline]
pub fn by_src_dst(a: &Edge, b: &Edge) -> Ordering {
    a.cmp(b)
}

#[inline]
pub fn by_dst(a: &Edge, b: &Edge) -> Ordering {
    a.dst.cmp(&b.dst)
}

/// Total number of directed edge pairs in the bus.
pub fn global_size<C: Communicator>(edges: &[Edge], comm: &C) -> u64 {
    comm.global_size(edges.len())
}

/// Restores block balance (sizes differ by at most one) without reordering.
pub fn redistribute<C: Communicator>(edges: &mut Vec<Edge>, comm: &C) {
    distribute(edges, comm);
}

/// Checks that every `(u, v)` has a matching `(v, u)` somewhere in the bus.
///
/// Sorts one copy by `(src, dst)` and one by `(dst, src)`; the i-th elements
/// must be flips of each other. Test support.
pub fn check_bidirectional<C: Communicator>(edges: &[Edge], comm: &C) -> bool {
    let mut fwd = edges.to_vec();
    let mut rev = edges.to_vec();
    samplesort_by(&mut fwd, comm, by_src_dst);
    samplesort_by(&mut rev, comm, |a, b| {
        a.dst.cmp(&b.dst).then_with(|| a.src.cmp(&b.src))
    });
    let local_ok = fwd
        .iter()
        .zip(rev.iter())
        .all(|(a, b)| a.src == b.dst && a.dst == b.src);
    comm.all_reduce(u8::from(local_ok), |a, b| a.min(b)) != 0
}

/// Logs the min/mean/max per-rank count of a distributed sequence on rank 0
/// and returns the triple on every rank.
pub fn load_distribution<C: Communicator>(
    label: &str,
    local_len: usize,
    comm: &C,
) -> (u64, u64, u64) {
    let counts = comm.all_gather(local_len as u64);
    let min = *counts.iter().min().unwrap();
    let max = *counts.iter().max().unwrap();
    let mean = counts.iter().sum::<u64>() / counts.len() as u64;
    if comm.rank() == 0 {
        info!("{label} distribution min-mean-max: {min},{mean},{max}");
    }
    (min, mean, max)
}
