/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! MPI-backed communicator (rsmpi), enabled by the `mpi` feature.
//!
//! The adapter maps the primitive collectives one-to-one onto rsmpi:
//! `all_gather_into`, `all_gather_varcount_into`, a counts exchange followed
//! by `all_to_all_varcount_into`, `gather_varcount_into_root`,
//! `broadcast_into`, and `split_by_color`. A failed collective aborts the
//! process group, per the fail-stop model.

use mpi::datatype::{Partition, PartitionMut};
use mpi::environment::Universe;
use mpi::topology::{Color, SimpleCommunicator};
use mpi::traits::{Communicator as _, CommunicatorCollectives, Root};
use mpi::Count;

use super::{CommData, Communicator};

pub struct MpiComm {
    comm: SimpleCommunicator,
}

impl MpiComm {
    /// Initializes MPI and returns the world communicator. Keep the
    /// [`Universe`] alive for the duration of the computation; MPI is
    /// finalized when it drops.
    pub fn world() -> (Universe, Self) {
        let universe = mpi::initialize().expect("MPI initialization failed");
        let world = universe.world();
        (universe, Self { comm: world })
    }
}

fn displs(counts: &[Count]) -> Vec<Count> {
    let mut displs = Vec::with_capacity(counts.len());
    let mut acc = 0;
    for &c in counts {
        displs.push(acc);
        acc += c;
    }
    displs
}

impl Communicator for MpiComm {
    fn rank(&self) -> usize {
        self.comm.rank() as usize
    }

    fn size(&self) -> usize {
        self.comm.size() as usize
    }

    fn barrier(&self) {
        self.comm.barrier();
    }

    fn all_gather<T: CommData>(&self, value: T) -> Vec<T> {
        let mut buf = vec![T::default(); self.size()];
        self.comm.all_gather_into(&value, &mut buf[..]);
        buf
    }

    fn all_gather_v<T: CommData>(&self, data: &[T]) -> Vec<T> {
        let counts: Vec<Count> = self.all_gather(data.len() as u64).iter().map(|&c| c as Count).collect();
        let total: Count = counts.iter().sum();
        let displs = displs(&counts);
        let mut buf = vec![T::default(); total as usize];
        let mut partition = PartitionMut::new(&mut buf[..], counts, displs);
        self.comm.all_gather_varcount_into(data, &mut partition);
        buf
    }

    fn all_to_all_v<T: CommData>(&self, buckets: Vec<Vec<T>>) -> Vec<T> {
        assert_eq!(buckets.len(), self.size());
        let send_counts: Vec<Count> = buckets.iter().map(|b| b.len() as Count).collect();
        let mut recv_counts = vec![0 as Count; self.size()];
        self.comm.all_to_all_into(&send_counts[..], &mut recv_counts[..]);

        let send_buf: Vec<T> = buckets.into_iter().flatten().collect();
        let send_displs = displs(&send_counts);
        let recv_displs = displs(&recv_counts);
        let total: Count = recv_counts.iter().sum();
        let mut recv_buf = vec![T::default(); total as usize];

        let send = Partition::new(&send_buf[..], send_counts, send_displs);
        let mut recv = PartitionMut::new(&mut recv_buf[..], recv_counts, recv_displs);
        self.comm.all_to_all_varcount_into(&send, &mut recv);
        recv_buf
    }

    fn gather_v<T: CommData>(&self, data: &[T], root: usize) -> Option<Vec<T>> {
        let root_process = self.comm.process_at_rank(root as Count);
        let count = data.len() as Count;
        if self.rank() == root {
            let mut counts = vec![0 as Count; self.size()];
            root_process.gather_into_root(&count, &mut counts[..]);
            let total: Count = counts.iter().sum();
            let displs = displs(&counts);
            let mut buf = vec![T::default(); total as usize];
            let mut partition = PartitionMut::new(&mut buf[..], counts, displs);
            root_process.gather_varcount_into_root(data, &mut partition);
            Some(buf)
        } else {
            root_process.gather_into(&count);
            root_process.gather_varcount_into(data);
            None
        }
    }

    fn broadcast<T: CommData>(&self, value: T, root: usize) -> T {
        let mut value = value;
        self.comm.process_at_rank(root as Count).broadcast_into(&mut value);
        value
    }

    fn split(&self, participate: bool) -> Option<Self> {
        let color = if participate {
            Color::with_value(0)
        } else {
            Color::undefined()
        };
        self.comm.split_by_color(color).map(|comm| Self { comm })
    }
}
