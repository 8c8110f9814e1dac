/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Edge-list exporters.
//!
//! Each rank writes its own file; concatenating the files in rank order
//! yields the complete graph. Both exporters assume every undirected edge
//! is present in both orientations and emit each one once, as its `u < v`
//! orientation.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::comm::Communicator;
use crate::graph::{redistribute, Edge};

/// Writes `graph.<rank>.dot`; rank 0 opens `graph G {`, the last rank
/// closes it, so the concatenation in rank order is a valid dot file.
pub fn write_dot<C: Communicator>(edges: &mut Vec<Edge>, dir: &Path, comm: &C) -> Result<()> {
    redistribute(edges, comm);

    let path = dir.join(format!("graph.{}.dot", comm.rank()));
    let mut out = BufWriter::new(
        File::create(&path).with_context(|| format!("cannot create {}", path.display()))?,
    );

    if comm.rank() == 0 {
        writeln!(out, "graph G {{")?;
    }
    for e in edges.iter() {
        if e.src < e.dst {
            writeln!(out, "{} -- {};", e.src, e.dst)?;
        }
    }
    if comm.rank() == comm.size() - 1 {
        writeln!(out, "}}")?;
    }
    out.flush()?;
    Ok(())
}

/// Writes `graph.<rank>.bin`: every `u < v` edge as a pair of little-endian
/// 64-bit integers.
pub fn write_binary<C: Communicator>(edges: &mut Vec<Edge>, dir: &Path, comm: &C) -> Result<()> {
    redistribute(edges, comm);

    let path = dir.join(format!("graph.{}.bin", comm.rank()));
    let mut out = BufWriter::new(
        File::create(&path).with_context(|| format!("cannot create {}", path.display()))?,
    );

    for e in edges.iter() {
        if e.src < e.dst {
            out.write_all(&e.src.to_le_bytes())?;
            out.write_all(&e.dst.to_le_bytes())?;
        }
    }
    out.flush()?;
    Ok(())
}
