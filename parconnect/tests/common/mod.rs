/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::collections::BTreeMap;

use parconnect::graph::Edge;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

pub fn add_undirected(edges: &mut Vec<Edge>, u: u64, v: u64) {
    edges.push(Edge::new(u, v));
    edges.push(Edge::new(v, u));
}

pub fn add_chain(edges: &mut Vec<Edge>, from: u64, to: u64) {
    for i in from..to {
        add_undirected(edges, i, i + 1);
    }
}

/// The two fully connected clusters {2,3,4,11} and {5,6,8,10}.
pub fn add_two_clusters(edges: &mut Vec<Edge>) {
    add_undirected(edges, 2, 11);
    add_undirected(edges, 2, 3);
    add_undirected(edges, 2, 4);
    add_undirected(edges, 3, 4);
    add_undirected(edges, 5, 6);
    add_undirected(edges, 5, 8);
    add_undirected(edges, 6, 10);
    add_undirected(edges, 6, 8);
}

pub fn shuffled(mut edges: Vec<Edge>, seed: u64) -> Vec<Edge> {
    let mut rng = SmallRng::seed_from_u64(seed);
    edges.shuffle(&mut rng);
    edges
}

/// Sequential union-find reference for component counts.
pub fn reference_component_count(edges: &[Edge]) -> u64 {
    let mut ids = BTreeMap::new();
    for e in edges {
        let next = ids.len();
        ids.entry(e.src).or_insert(next);
        let next = ids.len();
        ids.entry(e.dst).or_insert(next);
    }
    let mut parent: Vec<usize> = (0..ids.len()).collect();
    fn find(parent: &mut [usize], mut x: usize) -> usize {
        while parent[x] != x {
            parent[x] = parent[parent[x]];
            x = parent[x];
        }
        x
    }
    for e in edges {
        let a = find(&mut parent, ids[&e.src]);
        let b = find(&mut parent, ids[&e.dst]);
        parent[a.max(b)] = a.min(b);
    }
    (0..parent.len()).filter(|&x| find(&mut parent, x) == x).count() as u64
}
