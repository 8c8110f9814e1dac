/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! In-process communicator: one thread per rank over a shared exchange
//! board.
//!
//! The board is a mutex-guarded slot table plus a reusable barrier. Each
//! collective is two barrier phases: every rank deposits into its own slot,
//! the ranks synchronize, every rank reads the slots it needs, and a second
//! synchronization closes the round before any slot is overwritten. No slot
//! is ever read outside the window between the two barriers, so stale
//! deposits are unobservable.
//!
//! This backend exists so that every distributed code path of the crate runs
//! under `cargo test` with real multi-rank execution, and it drives the CLI
//! when no MPI launcher is involved.

use std::any::Any;
use std::sync::{Arc, Barrier, Mutex};

use super::{CommData, Communicator};

struct Board {
    slots: Mutex<Vec<Option<Box<dyn Any + Send>>>>,
    barrier: Barrier,
}

impl Board {
    fn new(size: usize) -> Self {
        Self {
            slots: Mutex::new((0..size).map(|_| None).collect()),
            barrier: Barrier::new(size),
        }
    }
}

pub struct ThreadComm {
    rank: usize,
    size: usize,
    board: Arc<Board>,
}

impl ThreadComm {
    /// Runs `f` on `size` rank threads sharing one communicator and returns
    /// the per-rank results in rank order.
    ///
    /// # Panics
    ///
    /// Panics if any rank thread panics. Note that a panicking rank leaves
    /// the other ranks stuck on the next barrier, so assertions inside `f`
    /// should be kept to a minimum; prefer asserting on the returned values.
    pub fn with_ranks<R, F>(size: usize, f: F) -> Vec<R>
    where
        F: Fn(&ThreadComm) -> R + Send + Sync,
        R: Send,
    {
        assert!(size > 0, "at least one rank is required");
        let board = Arc::new(Board::new(size));
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..size)
                .map(|rank| {
                    let comm = ThreadComm {
                        rank,
                        size,
                        board: board.clone(),
                    };
                    let f = &f;
                    scope.spawn(move || f(&comm))
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().expect("rank thread panicked"))
                .collect()
        })
    }

    fn deposit(&self, value: Box<dyn Any + Send>) {
        self.board.slots.lock().unwrap()[self.rank] = Some(value);
    }

    fn read_slot<T: Clone + 'static>(&self, rank: usize) -> T {
        let slots = self.board.slots.lock().unwrap();
        slots[rank]
            .as_ref()
            .and_then(|b| b.downcast_ref::<T>())
            .expect("collective type mismatch across ranks")
            .clone()
    }
}

impl Communicator for ThreadComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn barrier(&self) {
        self.board.barrier.wait();
    }

    fn all_gather<T: CommData>(&self, value: T) -> Vec<T> {
        self.deposit(Box::new(value));
        self.board.barrier.wait();
        let out = {
            let slots = self.board.slots.lock().unwrap();
            slots
                .iter()
                .map(|s| {
                    *s.as_ref()
                        .and_then(|b| b.downcast_ref::<T>())
                        .expect("collective type mismatch across ranks")
                })
                .collect()
        };
        self.board.barrier.wait();
        out
    }

    fn all_gather_v<T: CommData>(&self, data: &[T]) -> Vec<T> {
        self.deposit(Box::new(data.to_vec()));
        self.board.barrier.wait();
        let out = {
            let slots = self.board.slots.lock().unwrap();
            let mut out = Vec::new();
            for s in slots.iter() {
                out.extend_from_slice(
                    s.as_ref()
                        .and_then(|b| b.downcast_ref::<Vec<T>>())
                        .expect("collective type mismatch across ranks"),
                );
            }
            out
        };
        self.board.barrier.wait();
        out
    }

    fn all_to_all_v<T: CommData>(&self, buckets: Vec<Vec<T>>) -> Vec<T> {
        assert_eq!(buckets.len(), self.size);
        self.deposit(Box::new(buckets));
        self.board.barrier.wait();
        let out = {
            let mut slots = self.board.slots.lock().unwrap();
            let mut out = Vec::new();
            for s in slots.iter_mut() {
                let sent = s
                    .as_mut()
                    .and_then(|b| b.downcast_mut::<Vec<Vec<T>>>())
                    .expect("collective type mismatch across ranks");
                out.append(&mut sent[self.rank]);
            }
            out
        };
        self.board.barrier.wait();
        out
    }

    fn gather_v<T: CommData>(&self, data: &[T], root: usize) -> Option<Vec<T>> {
        self.deposit(Box::new(data.to_vec()));
        self.board.barrier.wait();
        let out = if self.rank == root {
            let slots = self.board.slots.lock().unwrap();
            let mut out = Vec::new();
            for s in slots.iter() {
                out.extend_from_slice(
                    s.as_ref()
                        .and_then(|b| b.downcast_ref::<Vec<T>>())
                        .expect("collective type mismatch across ranks"),
                );
            }
            Some(out)
        } else {
            None
        };
        self.board.barrier.wait();
        out
    }

    fn broadcast<T: CommData>(&self, value: T, root: usize) -> T {
        if self.rank == root {
            self.deposit(Box::new(value));
        }
        self.board.barrier.wait();
        let out = self.read_slot::<T>(root);
        self.board.barrier.wait();
        out
    }

    fn split(&self, participate: bool) -> Option<Self> {
        let flags = self.all_gather(u8::from(participate));
        let members: Vec<usize> = flags
            .iter()
            .enumerate()
            .filter(|(_, &f)| f != 0)
            .map(|(r, _)| r)
            .collect();
        if members.is_empty() {
            return None;
        }
        let leader = members[0];
        if self.rank == leader {
            self.deposit(Box::new(Arc::new(Board::new(members.len()))));
        }
        self.board.barrier.wait();
        let sub = if participate {
            let board = self.read_slot::<Arc<Board>>(leader);
            Some(ThreadComm {
                rank: members.iter().position(|&r| r == self.rank).unwrap(),
                size: members.len(),
                board,
            })
        } else {
            None
        };
        self.board.barrier.wait();
        sub
    }
}
