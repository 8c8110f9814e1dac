/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The dispatch pipeline.
//!
//! Permutes the vertex ids, profiles the degree distribution, optionally
//! peels the giant component with BFS, and hands the remainder to the
//! coloring engine. The component total is the number of BFS runs executed
//! plus the number of labels the coloring engine reports.

use anyhow::Result;
use log::info;

use crate::bfs::{BfsRunStats, Peeler};
use crate::coloring::ColoringEngine;
pub use crate::coloring::OptLevel;
use crate::comm::Communicator;
use crate::error::ConnectivityError;
use crate::graph::{self, compact::compact_ids, permute::permute_ids, Edge};
use crate::profile::run_bfs_decision;
use crate::util::SectionTimer;

#[derive(Debug, Clone)]
pub struct Config {
    /// Pointer doubling in the coloring engine.
    pub pointer_doubling: bool,
    /// Optimization level of the coloring engine.
    pub opt_level: OptLevel,
    /// Kolmogorov–Smirnov threshold of the BFS decision.
    pub ks_threshold: f64,
    /// Upper bound on the number of BFS peels when the decision is positive.
    pub bfs_iterations: usize,
    /// Shuffle the vertex ids with the invertible hash first. Disabled only
    /// by tests that need untouched ids.
    pub permute_ids: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pointer_doubling: true,
            opt_level: OptLevel::LoadBalanced,
            ks_threshold: 0.05,
            bfs_iterations: 1,
            permute_ids: true,
        }
    }
}

/// What the pipeline reports back.
#[derive(Debug, Clone, Default)]
pub struct Summary {
    pub components: u64,
    /// BFS runs actually executed.
    pub bfs_iterations: u64,
    pub bfs_runs: Vec<BfsRunStats>,
    pub coloring_rounds: u64,
    /// Min/mean/max active-tuple counts per coloring round.
    pub round_loads: Vec<(u64, u64, u64)>,
}

/// Computes the number of connected components of the distributed edge
/// list. Collective; every rank receives the same component count and
/// telemetry totals (the per-round load triples are filled on the ranks
/// that took part in the coloring, rank 0 always among them).
///
/// # Examples
///
/// ```
/// use parconnect::prelude::*;
///
/// let counts = ThreadComm::with_ranks(2, |comm| {
///     // Rank 0 contributes a ten-vertex chain; the pipeline re-balances.
///     let mut edges = Vec::new();
///     if comm.rank() == 0 {
///         for i in 0..9u64 {
///             edges.push(Edge::new(i, i + 1));
///             edges.push(Edge::new(i + 1, i));
///         }
///     }
///     connected_components(edges, &Config::default(), comm)
///         .unwrap()
///         .components
/// });
/// assert_eq!(counts, vec![1, 1]);
/// ```
pub fn connected_components<C: Communicator>(
    mut edges: Vec<Edge>,
    config: &Config,
    comm: &C,
) -> Result<Summary> {
    let mut timer = SectionTimer::new();
    let rank = comm.rank();

    if graph::global_size(&edges, comm) == 0 {
        return Err(ConnectivityError::Input("graph of size zero".into()).into());
    }

    if config.permute_ids {
        permute_ids(&mut edges);
        if rank == 0 {
            info!("vertex ids permuted");
        }
        timer.section(comm, "vertex ids permuted");
    }

    let run_bfs = run_bfs_decision(&mut edges, config.ks_threshold, comm);
    timer.section(comm, "graph fit statistics calculated");

    let mut summary = Summary::default();

    if run_bfs {
        let nvertices = compact_ids(&mut edges, comm);
        timer.section(comm, "vertex ids relabeled (contiguous)");

        // Boundary check between the compactor and the engines.
        let local_max = edges.iter().map(|e| e.src.max(e.dst)).max().unwrap_or(0);
        let global_max = comm.all_reduce(local_max, |a, b| a.max(b));
        if nvertices == 0 || global_max != nvertices - 1 {
            return Err(ConnectivityError::Input(format!(
                "compaction produced {nvertices} vertices but max endpoint {global_max}"
            ))
            .into());
        }
        let nedges = graph::global_size(&edges, comm) / 2;
        if rank == 0 {
            info!("graph size: vertices -> {nvertices}, edges -> {nedges}");
        }

        let mut peeler = Peeler::new(&edges, nvertices, comm);
        summary.bfs_runs = peeler.run_iterations(config.bfs_iterations);
        summary.bfs_iterations = summary.bfs_runs.len() as u64;
        timer.section(comm, "BFS iterations executed");

        peeler.filter_edges(&mut edges);
        timer.section(comm, "remaining graph filtered out");
    } else {
        let nedges = graph::global_size(&edges, comm) / 2;
        if rank == 0 {
            info!("graph size: edges -> {nedges}");
        }
    }

    let mut coloring_count = 0u64;
    let mut coloring_outcome: Result<(), ConnectivityError> = Ok(());
    {
        let edges_ref = &mut edges;
        let doubling = config.pointer_doubling;
        let opt_level = config.opt_level;
        let count = &mut coloring_count;
        let outcome = &mut coloring_outcome;
        let rounds = &mut summary.coloring_rounds;
        let loads = &mut summary.round_loads;
        comm.with_subset(!edges_ref.is_empty(), |sub| {
            let mut engine = ColoringEngine::new(edges_ref, doubling, opt_level, sub);
            let stats = engine.compute().clone();
            *rounds = stats.rounds;
            *loads = stats.round_loads;
            match engine.component_count() {
                Ok(c) => *count = c,
                Err(e) => *outcome = Err(e),
            }
        });
    }
    if comm.all_reduce(u8::from(coloring_outcome.is_err()), |a, b| a.max(b)) != 0 {
        return Err(ConnectivityError::Overflow("component count").into());
    }
    timer.section(comm, "coloring completed");

    // Ranks outside the coloring subset contribute zero; the subset ranks
    // agree on the count, as do the stats below.
    summary.components =
        summary.bfs_iterations + comm.all_reduce(coloring_count, |a, b| a.max(b));
    summary.coloring_rounds = comm.all_reduce(summary.coloring_rounds, |a, b| a.max(b));

    if rank == 0 {
        info!("count of components -> {}", summary.components);
    }
    Ok(summary)
}
