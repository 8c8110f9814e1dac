/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Parallel text edge-list reader.
//!
//! The file is split into one byte range per rank; a line belongs to the
//! rank owning its first byte. Ranks other than 0 inspect the byte just
//! before their range to detect a line starting exactly at the boundary,
//! and every rank finishes its final line past its range end, so each line
//! is read exactly once for any partition of the file.
//!
//! Lines are whitespace-separated id pairs; `%`-prefixed lines are
//! comments; anything else is skipped.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

use anyhow::{Context, Result};

use crate::comm::{block_range, Communicator};
use crate::graph::Edge;

/// Reads the rank's share of a whitespace edge-list file, optionally
/// emitting the reverse of every edge as well.
pub fn read_edge_list<C: Communicator>(
    path: &Path,
    add_reverse: bool,
    comm: &C,
) -> Result<Vec<Edge>> {
    let len = std::fs::metadata(path)
        .with_context(|| format!("cannot stat {}", path.display()))?
        .len();
    let (start, end) = block_range(len, comm.size(), comm.rank());
    let mut edges = Vec::new();
    if start >= end {
        return Ok(edges);
    }

    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let mut reader = BufReader::new(file);

    let mut pos = if start == 0 {
        0
    } else {
        reader.seek(SeekFrom::Start(start - 1))?;
        let mut skipped = Vec::new();
        let n = reader.read_until(b'\n', &mut skipped)? as u64;
        // One byte consumed means the previous byte was a newline and the
        // line starting at `start` is ours; otherwise the straddling line
        // belonged to the previous rank.
        start - 1 + n
    };

    let mut line = String::new();
    while pos < end {
        line.clear();
        let n = reader
            .read_line(&mut line)
            .with_context(|| format!("cannot read {}", path.display()))?;
        if n == 0 {
            break;
        }
        pos += n as u64;

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('%') {
            continue;
        }
        let mut fields = trimmed.split_whitespace();
        if let (Some(a), Some(b), None) = (fields.next(), fields.next(), fields.next()) {
            if let (Ok(u), Ok(v)) = (a.parse::<u64>(), b.parse::<u64>()) {
                edges.push(Edge::new(u, v));
                if add_reverse {
                    edges.push(Edge::new(v, u));
                }
            }
        }
    }
    Ok(edges)
}
