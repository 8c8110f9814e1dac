/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Error taxonomy of the public entry points.
//!
//! The pipeline distinguishes operator mistakes (caught before any collective
//! is issued), malformed inputs (caught at the boundary between id compaction
//! and the engines), and arithmetic overflow of the accumulators. Collective
//! failures are fatal in the transport layer and never surface here.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectivityError {
    /// Bad command line, missing file, or inconsistent flags.
    #[error("operator error: {0}")]
    Operator(String),

    /// The edge list violates a structural precondition, e.g. an endpoint
    /// outside `[0, |V|)` after compaction or a graph of size zero.
    #[error("input error: {0}")]
    Input(String),

    /// An accumulator exceeded its 64-bit range.
    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),
}
