/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Dense vertex-id compaction.
//!
//! Remaps the distinct ids appearing in the edge list to `[0, |V|)` without
//! materializing a global vertex table. Two symmetric passes, once keyed on
//! `dst` and once on `src`:
//!
//! 1. samplesort the edges by the chosen layer;
//! 2. scan the local slice: each maximal run of equal keys is one logical
//!    vertex, numbered from 0;
//! 3. deduct one from the local unique count if the run straddles into the
//!    next rank (first key there equals the last key here), assigning the
//!    straddling bucket to the right;
//! 4. exclusive-scan the adjusted counts to obtain each rank's base index;
//! 5. rewrite the chosen layer of run `k` to `base + k`.
//!
//! Both passes map a key to its position in the globally sorted distinct-key
//! order, so the two layers receive the same mapping and bidirectionality is
//! preserved. Running the compaction twice is the identity on the second
//! run, because dense ids map to themselves.

use crate::comm::sort::samplesort_by;
use crate::comm::Communicator;
use crate::graph::Edge;

/// Remaps all endpoint ids to `[0, |V|)` and returns `|V|`, the number of
/// distinct endpoints.
pub fn compact_ids<C: Communicator>(edges: &mut Vec<Edge>, comm: &C) -> u64 {
    let dst_count = compact_layer(edges, comm, |e| e.dst, |e, v| e.dst = v);
    let src_count = compact_layer(edges, comm, |e| e.src, |e, v| e.src = v);
    // Bidirectionality makes the distinct sets of the two layers equal.
    debug_assert_eq!(dst_count, src_count);
    src_count
}

fn compact_layer<C: Communicator>(
    edges: &mut Vec<Edge>,
    comm: &C,
    key: fn(&Edge) -> u64,
    set: fn(&mut Edge, u64),
) -> u64 {
    samplesort_by(edges, comm, move |a, b| key(a).cmp(&key(b)));

    let lens = comm.all_gather(edges.len() as u64);
    let firsts = comm.all_gather(edges.first().map(key).unwrap_or(0));

    // Number of maximal runs of equal keys in the local slice.
    let mut runs = 0u64;
    let mut prev = None;
    for e in edges.iter() {
        let k = key(e);
        if prev != Some(k) {
            runs += 1;
            prev = Some(k);
        }
    }

    // The bucket straddling the right boundary is owned by the next
    // non-empty rank; a run spanning more than two ranks telescopes, since
    // the middle ranks count zero adjusted runs.
    let straddles = edges.last().is_some_and(|last| {
        (comm.rank() + 1..comm.size())
            .find(|&r| lens[r] > 0)
            .is_some_and(|r| firsts[r] == key(last))
    });
    let adjusted = runs - u64::from(straddles);

    let base = comm.exscan(adjusted, |a, b| a + b).unwrap_or(0);

    let mut k = 0u64;
    let mut prev = None;
    for e in edges.iter_mut() {
        let cur = key(e);
        match prev {
            None => prev = Some(cur),
            Some(p) if p != cur => {
                k += 1;
                prev = Some(cur);
            }
            _ => {}
        }
        set(e, base + k);
    }

    comm.all_gather(adjusted).into_iter().sum()
}
