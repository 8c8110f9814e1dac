/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The coloring tuple and its comparators.

use std::cmp::Ordering;

/// "No candidate" on `pn`, and the id of a forever-stable partition.
pub const MAX_PID: u64 = u64::MAX;
/// Marks a tuple whose bucket was stable in the current round.
pub const MAX_PID2: u64 = u64::MAX - 1;
/// Marks a flipped parent-request tuple awaiting deletion.
pub const MAX_NID: u64 = u64::MAX;

/// One statement about a vertex: `node` currently belongs to partition
/// `pc`, with `pn` the candidate partition proposed during the round.
#[cfg_attr(feature = "mpi", derive(mpi::traits::Equivalence))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tuple {
    pub pc: u64,
    pub pn: u64,
    pub node: u64,
}

impl Tuple {
    #[inline]
    pub fn new(pc: u64, pn: u64, node: u64) -> Self {
        Self { pc, pn, node }
    }
}

/// Sort key of the candidate-update step.
#[inline]
pub fn by_node_then_pc(a: &Tuple, b: &Tuple) -> Ordering {
    a.node.cmp(&b.node).then_with(|| a.pc.cmp(&b.pc))
}

/// Sort key of the relabeling step.
#[inline]
pub fn by_pc_then_pn(a: &Tuple, b: &Tuple) -> Ordering {
    a.pc.cmp(&b.pc).then_with(|| a.pn.cmp(&b.pn))
}

/// Sort key of the component count.
#[inline]
pub fn by_pc(a: &Tuple, b: &Tuple) -> Ordering {
    a.pc.cmp(&b.pc)
}
