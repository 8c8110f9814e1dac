/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! BFS peeler scenarios: every rank holds one chain of 50 vertices, so the
//! graph has exactly one component per rank and each peel visits 50
//! vertices.

mod common;

use parconnect::bfs::Peeler;
use parconnect::comm::thread::ThreadComm;
use parconnect::comm::Communicator;
use parconnect::graph::{self, Edge};

fn rank_chain(rank: usize) -> Vec<Edge> {
    let offset = 50 * rank as u64;
    let mut edges = Vec::new();
    common::add_chain(&mut edges, offset, offset + 49);
    edges
}

#[test]
fn test_chains_single_run() {
    const P: usize = 4;
    let out = ThreadComm::with_ranks(P, |comm| {
        let mut edges = rank_chain(comm.rank());
        let nvertices = 50 * comm.size() as u64;
        let mut peeler = Peeler::new(&edges, nvertices, comm);

        let stats = peeler.run_iterations(1);
        peeler.filter_edges(&mut edges);

        let visited: Vec<u64> = stats.iter().map(|s| s.visited).collect();
        let left = graph::global_size(&edges, comm);
        let bidirectional = graph::check_bidirectional(&edges, comm);
        (visited, left, bidirectional)
    });
    for (visited, left, bidirectional) in out {
        // One run peels the first chain; each remaining chain keeps its
        // 2 * 49 directed edges.
        assert_eq!(visited, vec![50]);
        assert_eq!(left, 98 * (P as u64 - 1));
        assert!(bidirectional);
    }
}

#[test]
fn test_chains_p_runs() {
    const P: usize = 4;
    let out = ThreadComm::with_ranks(P, |comm| {
        let mut edges = rank_chain(comm.rank());
        let nvertices = 50 * comm.size() as u64;
        let mut peeler = Peeler::new(&edges, nvertices, comm);

        let stats = peeler.run_iterations(comm.size());
        peeler.filter_edges(&mut edges);

        let visited: Vec<u64> = stats.iter().map(|s| s.visited).collect();
        (visited, graph::global_size(&edges, comm))
    });
    for (visited, left) in out {
        assert_eq!(visited, vec![50; P]);
        assert_eq!(left, 0);
    }
}

#[test]
fn test_chains_one_run_at_a_time() {
    const P: usize = 3;
    let out = ThreadComm::with_ranks(P, |comm| {
        let mut edges = rank_chain(comm.rank());
        let nvertices = 50 * comm.size() as u64;
        let mut peeler = Peeler::new(&edges, nvertices, comm);

        let mut visited = Vec::new();
        for _ in 0..comm.size() {
            visited.extend(peeler.run_iterations(1).iter().map(|s| s.visited));
        }
        peeler.filter_edges(&mut edges);
        (visited, graph::global_size(&edges, comm))
    });
    for (visited, left) in out {
        assert_eq!(visited, vec![50; P]);
        assert_eq!(left, 0);
    }
}

#[test]
fn test_exhausted_graph_stops_early() {
    let out = ThreadComm::with_ranks(2, |comm| {
        let mut edges = Vec::new();
        if comm.rank() == 0 {
            common::add_chain(&mut edges, 0, 9);
        }
        let mut peeler = Peeler::new(&edges, 10, comm);
        // Ask for more runs than there are components.
        let stats = peeler.run_iterations(5);
        peeler.filter_edges(&mut edges);
        (stats.len(), graph::global_size(&edges, comm))
    });
    for (runs, left) in out {
        assert_eq!(runs, 1);
        assert_eq!(left, 0);
    }
}
