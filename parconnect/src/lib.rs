/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]
#![deny(unstable_features)]
#![deny(trivial_casts)]
#![deny(unconditional_recursion)]
#![deny(clippy::empty_loop)]
#![deny(unreachable_code)]
#![deny(unreachable_patterns)]
#![deny(unused_macro_rules)]
#![deny(unused_doc_comments)]
#![allow(clippy::type_complexity)]

pub mod bfs;
pub mod coloring;
pub mod comm;
pub mod error;
pub mod export;
pub mod gen;
pub mod graph;
pub mod profile;
pub mod run;
pub mod util;

pub mod prelude {
    pub use crate::comm::sort::{distribute, is_sorted_by, samplesort_by};
    pub use crate::comm::thread::ThreadComm;
    pub use crate::comm::Communicator;
    pub use crate::error::ConnectivityError;
    pub use crate::graph::Edge;
    pub use crate::run::{connected_components, Config, OptLevel, Summary};
}
