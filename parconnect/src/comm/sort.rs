/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Distributed sorting and block re-balancing.
//!
//! [`samplesort_by`] is a regular-sampling samplesort: local sort, `p - 1`
//! evenly spaced samples per rank, global splitter selection, splitter
//! bucketing, one `all_to_all_v`, local sort of the received runs, and a
//! final stable re-balance restoring the caller's per-rank element counts.
//! Preserving the counts is what lets the engines sort sub-ranges of their
//! local vectors in place round after round.
//!
//! [`distribute`] re-balances a distributed sequence into block
//! decomposition: sizes differ by at most one, larger slices on the lower
//! ranks, relative order untouched.

use std::cmp::Ordering;

use rayon::prelude::*;

use super::{block_range, CommData, Communicator};

/// Sorts a distributed sequence in place with `cmp`, leaving each rank with
/// exactly as many elements as it contributed.
///
/// Ranks may hold zero elements. Ties are broken deterministically but not
/// stably.
pub fn samplesort_by<T, C, F>(data: &mut [T], comm: &C, cmp: F)
where
    T: CommData,
    C: Communicator,
    F: Fn(&T, &T) -> Ordering + Sync,
{
    let p = comm.size();
    if p == 1 {
        data.par_sort_unstable_by(&cmp);
        return;
    }
    let counts = comm.all_gather(data.len() as u64);
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return;
    }

    data.par_sort_unstable_by(&cmp);

    // Regular sampling: p - 1 evenly spaced elements of the local run.
    let mut samples = Vec::with_capacity(p.saturating_sub(1));
    if !data.is_empty() {
        for i in 0..p - 1 {
            let idx = ((i as u128 + 1) * data.len() as u128 / p as u128) as usize;
            samples.push(data[idx.min(data.len() - 1)]);
        }
    }
    let mut pool = comm.all_gather_v(&samples);
    pool.sort_unstable_by(&cmp);

    let splitters: Vec<T> = (0..p - 1)
        .map(|i| {
            let idx = ((i as u128 + 1) * pool.len() as u128 / p as u128) as usize;
            pool[idx.min(pool.len() - 1)]
        })
        .collect();

    // Bucket k gets the elements from the first one not less than
    // splitter k - 1; elements equal to a splitter go right.
    let mut bounds = vec![0usize; p + 1];
    bounds[p] = data.len();
    for k in 1..p {
        bounds[k] = data.partition_point(|x| cmp(x, &splitters[k - 1]) == Ordering::Less);
    }
    let buckets: Vec<Vec<T>> = (0..p).map(|k| data[bounds[k]..bounds[k + 1]].to_vec()).collect();

    let mut received = comm.all_to_all_v(buckets);
    received.par_sort_unstable_by(&cmp);

    let sorted = redistribute_to(received, &counts, comm);
    debug_assert_eq!(sorted.len(), data.len());
    data.copy_from_slice(&sorted);
}

/// Re-balances a distributed sequence into block decomposition (sizes
/// differing by at most one, larger slices first), preserving order.
pub fn distribute<T, C>(data: &mut Vec<T>, comm: &C)
where
    T: CommData,
    C: Communicator,
{
    if comm.size() == 1 {
        return;
    }
    let total = comm.global_size(data.len());
    let targets: Vec<u64> = (0..comm.size())
        .map(|r| {
            let (lo, hi) = block_range(total, comm.size(), r);
            hi - lo
        })
        .collect();
    *data = redistribute_to(std::mem::take(data), &targets, comm);
}

/// Moves a distributed sequence to the given per-rank target counts without
/// reordering: each rank ships the slices of its global index range that
/// overlap the target ranges.
fn redistribute_to<T, C>(data: Vec<T>, targets: &[u64], comm: &C) -> Vec<T>
where
    T: CommData,
    C: Communicator,
{
    let lens = comm.all_gather(data.len() as u64);
    let my_start: u64 = lens[..comm.rank()].iter().sum();

    let mut buckets: Vec<Vec<T>> = Vec::with_capacity(comm.size());
    let mut target_start = 0u64;
    for &target in targets {
        let target_end = target_start + target;
        let lo = my_start.max(target_start);
        let hi = (my_start + data.len() as u64).min(target_end);
        if lo < hi {
            let a = (lo - my_start) as usize;
            let b = (hi - my_start) as usize;
            buckets.push(data[a..b].to_vec());
        } else {
            buckets.push(Vec::new());
        }
        target_start = target_end;
    }
    comm.all_to_all_v(buckets)
}

/// Checks that a distributed sequence is globally sorted under `cmp`.
pub fn is_sorted_by<T, C, F>(data: &[T], comm: &C, cmp: F) -> bool
where
    T: CommData,
    C: Communicator,
    F: Fn(&T, &T) -> Ordering,
{
    let local_ok = data.windows(2).all(|w| cmp(&w[0], &w[1]) != Ordering::Greater);
    let boundary: Vec<T> = match (data.first(), data.last()) {
        (Some(&f), Some(&l)) => vec![f, l],
        _ => Vec::new(),
    };
    let edges = comm.all_gather_v(&boundary);
    // Consecutive (last, next first) pairs of the concatenation must be
    // ordered; interior pairs are ordered by the local check.
    let boundary_ok = edges.windows(2).all(|w| cmp(&w[0], &w[1]) != Ordering::Greater);
    comm.all_reduce(u8::from(local_ok), |a, b| a.min(b)) != 0 && boundary_ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::thread::ThreadComm;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_samplesort_preserves_counts_and_orders() {
        for p in [1usize, 2, 4, 5] {
            let out = ThreadComm::with_ranks(p, |comm| {
                let mut rng = SmallRng::seed_from_u64(0xc0ffee + comm.rank() as u64);
                let len = 17 + comm.rank() * 13;
                let mut data: Vec<u64> = (0..len).map(|_| rng.random_range(0..1000)).collect();
                let before = data.len();
                samplesort_by(&mut data, comm, |a, b| a.cmp(b));
                assert_eq!(data.len(), before);
                assert!(is_sorted_by(&data, comm, |a, b| a.cmp(b)));
                data
            });
            let flat: Vec<u64> = out.into_iter().flatten().collect();
            assert!(flat.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn test_samplesort_with_empty_ranks() {
        let out = ThreadComm::with_ranks(4, |comm| {
            let mut data: Vec<u64> = if comm.rank() == 2 {
                (0..40).rev().collect()
            } else {
                Vec::new()
            };
            samplesort_by(&mut data, comm, |a, b| a.cmp(b));
            data
        });
        assert_eq!(out[0], Vec::<u64>::new());
        assert_eq!(out[2], (0..40).collect::<Vec<u64>>());
    }

    #[test]
    fn test_distribute_balances() {
        let out = ThreadComm::with_ranks(3, |comm| {
            let mut data: Vec<u64> = if comm.rank() == 0 {
                (0..10).collect()
            } else {
                Vec::new()
            };
            distribute(&mut data, comm);
            data
        });
        assert_eq!(out[0].len(), 4);
        assert_eq!(out[1].len(), 3);
        assert_eq!(out[2].len(), 3);
        let flat: Vec<u64> = out.into_iter().flatten().collect();
        assert_eq!(flat, (0..10).collect::<Vec<u64>>());
    }

    #[test]
    fn test_is_sorted_detects_boundary_inversion() {
        let out = ThreadComm::with_ranks(2, |comm| {
            let data: Vec<u64> = if comm.rank() == 0 { vec![5, 6] } else { vec![1, 9] };
            is_sorted_by(&data, comm, |a, b| a.cmp(b))
        });
        assert!(!out[0]);
    }
}
