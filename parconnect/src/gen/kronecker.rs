/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Kronecker (RMAT) graph generator with the Graph500 initiator.
//!
//! Generates `edgefactor · 2^scale` undirected edges over `2^scale` vertex
//! ids by recursive quadrant sampling with the initiator matrix
//! `{A, B, C, D} = {0.57, 0.19, 0.19, 0.05}`. Each rank draws its block of
//! edges from a generator seeded by the run seed and its rank, so the
//! output is deterministic for a fixed number of ranks. Both orientations
//! of every edge are emitted.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::comm::{block_range, Communicator};
use crate::graph::Edge;

const A: f64 = 0.57;
const B: f64 = 0.19;
const C: f64 = 0.19;

/// Generates the rank's block of a Kronecker graph.
pub fn generate<Co: Communicator>(scale: u32, edgefactor: u64, seed: u64, comm: &Co) -> Vec<Edge> {
    let desired = edgefactor << scale;
    let (lo, hi) = block_range(desired, comm.size(), comm.rank());
    let mut rng = SmallRng::seed_from_u64(seed ^ (comm.rank() as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15));

    let mut edges = Vec::with_capacity(2 * (hi - lo) as usize);
    for _ in lo..hi {
        let mut src = 0u64;
        let mut dst = 0u64;
        for level in 0..scale {
            let r: f64 = rng.random();
            let bit = 1u64 << level;
            if r < A {
                // top-left quadrant
            } else if r < A + B {
                dst |= bit;
            } else if r < A + B + C {
                src |= bit;
            } else {
                src |= bit;
                dst |= bit;
            }
        }
        edges.push(Edge::new(src, dst));
        edges.push(Edge::new(dst, src));
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::thread::ThreadComm;

    #[test]
    fn test_kronecker_is_deterministic_and_bidirectional() {
        let out1 = ThreadComm::with_ranks(3, |comm| generate(8, 16, 1, comm));
        let out2 = ThreadComm::with_ranks(3, |comm| generate(8, 16, 1, comm));
        assert_eq!(out1, out2);

        let total: usize = out1.iter().map(|v| v.len()).sum();
        assert_eq!(total as u64, 2 * 16 * (1 << 8));
        for edges in &out1 {
            for pair in edges.chunks(2) {
                assert_eq!(pair[0].src, pair[1].dst);
                assert_eq!(pair[0].dst, pair[1].src);
                assert!(pair[0].src < 1 << 8);
            }
        }
    }
}
