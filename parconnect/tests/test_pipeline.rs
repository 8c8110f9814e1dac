/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! End-to-end pipeline runs: dispatch, hybrid path, determinism, and the
//! Kronecker density scenario.

mod common;

use common::{add_chain, add_two_clusters, reference_component_count, shuffled};
use parconnect::comm::thread::ThreadComm;
use parconnect::comm::Communicator;
use parconnect::gen::kronecker;
use parconnect::graph::compact::compact_ids;
use parconnect::graph::Edge;
use parconnect::run::{connected_components, Config};

fn pipeline_count(edges_on_rank0: Vec<Edge>, p: usize, config: &Config) -> u64 {
    let counts = ThreadComm::with_ranks(p, |comm| {
        let edges = if comm.rank() == 0 {
            edges_on_rank0.clone()
        } else {
            Vec::new()
        };
        connected_components(edges, config, comm).unwrap().components
    });
    assert!(counts.windows(2).all(|w| w[0] == w[1]));
    counts[0]
}

#[test]
fn test_chain_is_one_component() {
    let mut edges = Vec::new();
    add_chain(&mut edges, 1, 1000);
    let edges = shuffled(edges, 21);
    for p in [1, 4] {
        assert_eq!(pipeline_count(edges.clone(), p, &Config::default()), 1);
    }
}

#[test]
fn test_three_islands_survive_dispatch() {
    let mut edges = Vec::new();
    add_two_clusters(&mut edges);
    add_chain(&mut edges, 50, 1000);
    let edges = shuffled(edges, 22);
    for doubling in [false, true] {
        let config = Config {
            pointer_doubling: doubling,
            ..Config::default()
        };
        assert_eq!(pipeline_count(edges.clone(), 4, &config), 3);
    }
}

#[test]
fn test_empty_graph_is_an_input_error() {
    let errors = ThreadComm::with_ranks(2, |comm| {
        connected_components(Vec::new(), &Config::default(), comm).is_err()
    });
    assert_eq!(errors, vec![true, true]);
}

#[test]
fn test_determinism() {
    let mut edges = Vec::new();
    add_two_clusters(&mut edges);
    add_chain(&mut edges, 50, 400);
    let edges = shuffled(edges, 23);

    let run = |edges: Vec<Edge>| {
        let out = ThreadComm::with_ranks(3, |comm| {
            let edges = if comm.rank() == 0 { edges.clone() } else { Vec::new() };
            let summary = connected_components(edges, &Config::default(), comm).unwrap();
            (summary.components, summary.coloring_rounds, summary.bfs_iterations)
        });
        out[0]
    };
    assert_eq!(run(edges.clone()), run(edges));
}

#[test]
fn test_forced_bfs_peel_then_coloring() {
    // A threshold above 1.0 forces the BFS path: one component is peeled,
    // the two others are left to the coloring engine.
    let mut edges = Vec::new();
    add_two_clusters(&mut edges);
    add_chain(&mut edges, 50, 300);
    let edges = shuffled(edges, 24);

    let config = Config {
        ks_threshold: 1.1,
        ..Config::default()
    };
    let out = ThreadComm::with_ranks(4, |comm| {
        let edges = if comm.rank() == 0 { edges.clone() } else { Vec::new() };
        let summary = connected_components(edges, &config, comm).unwrap();
        (summary.components, summary.bfs_iterations, summary.bfs_runs.len())
    });
    for (components, bfs_iterations, runs) in out {
        assert_eq!(components, 3);
        assert_eq!(bfs_iterations, 1);
        assert_eq!(runs, 1);
    }
}

#[test]
fn test_kronecker_density_after_compaction() {
    // Graph500 generator at scale 11; after compaction every endpoint is
    // below the globally reduced unique vertex count.
    let out = ThreadComm::with_ranks(4, |comm| {
        let mut edges = kronecker::generate(11, 16, 1, comm);
        let mut endpoints: Vec<u64> = edges.iter().flat_map(|e| [e.src, e.dst]).collect();
        let nvertices = compact_ids(&mut edges, comm);
        let local_max = edges.iter().map(|e| e.src.max(e.dst)).max().unwrap_or(0);
        let global_max = comm.all_reduce(local_max, |a, b| a.max(b));
        endpoints.sort_unstable();
        endpoints.dedup();
        (nvertices, global_max, comm.gather_v(&endpoints, 0))
    });
    let (nvertices, global_max, gathered) = &out[0];
    assert_eq!(*global_max, nvertices - 1);

    let mut unique = gathered.clone().unwrap();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len() as u64, *nvertices);
}

#[test]
fn test_kronecker_matches_reference_count() {
    let fixtures = ThreadComm::with_ranks(3, |comm| kronecker::generate(8, 8, 5, comm));
    let all: Vec<Edge> = fixtures.iter().flatten().copied().collect();
    let expected = reference_component_count(&all);

    let counts = ThreadComm::with_ranks(3, |comm| {
        let edges = fixtures[comm.rank()].clone();
        connected_components(edges, &Config::default(), comm)
            .unwrap()
            .components
    });
    assert_eq!(counts, vec![expected; 3]);
}
