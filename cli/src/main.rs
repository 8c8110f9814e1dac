/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use parconnect::coloring::OptLevel;
use parconnect::comm::Communicator;
use parconnect::export;
use parconnect::gen::{chain, debruijn, file, kronecker};
use parconnect::graph::Edge;
use parconnect::run::{connected_components, Config};

#[cfg(not(feature = "mpi"))]
use parconnect::comm::thread::ThreadComm;

/// Kronecker generator seed; fixed so that runs are reproducible.
const KRONECKER_SEED: u64 = 1;

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Input {
    /// Whitespace edge-list file (`%` comments).
    Generic,
    /// De Bruijn graph of a FASTQ file.
    Dbg,
    /// Kronecker (RMAT) generator, Graph500 initiator.
    Kronecker,
    /// Undirected chain.
    Chain,
}

#[derive(Parser, Debug)]
#[command(
    name = "parconnect",
    about = "Connected components of large distributed graphs",
    version
)]
struct Args {
    /// Input kind.
    #[arg(long, value_enum)]
    input: Input,

    /// Input file (required for generic and dbg).
    #[arg(long)]
    file: Option<PathBuf>,

    /// Scale of the Kronecker graph (required for kronecker).
    #[arg(long)]
    scale: Option<u32>,

    /// Edge factor of the Kronecker graph.
    #[arg(long, default_value_t = 16)]
    edgefactor: u64,

    /// Number of nodes of the chain (required for chain).
    #[arg(long = "chainLength")]
    chain_length: Option<u64>,

    /// Pointer doubling during coloring.
    #[arg(long = "pointerDouble", value_parser = ["y", "n"])]
    pointer_double: String,

    /// Number of in-process ranks (ignored under MPI).
    #[arg(long, default_value_t = 1)]
    ranks: usize,

    /// Kolmogorov-Smirnov threshold of the BFS decision.
    #[arg(long, default_value_t = 0.05)]
    ks_threshold: f64,

    /// Disable per-round re-balancing of the active tuples.
    #[arg(long)]
    no_load_balance: bool,

    /// Export the input graph in dot format into this directory.
    #[arg(long)]
    export_dot: Option<PathBuf>,

    /// Export the input graph in binary format into this directory.
    #[arg(long)]
    export_bin: Option<PathBuf>,
}

impl Args {
    fn validate(&self) -> Result<()> {
        match self.input {
            Input::Generic | Input::Dbg => {
                if self.file.is_none() {
                    bail!("required option missing: '--file'");
                }
            }
            Input::Kronecker => {
                if self.scale.is_none() {
                    bail!("required option missing: '--scale'");
                }
            }
            Input::Chain => {
                if self.chain_length.is_none() {
                    bail!("required option missing: '--chainLength'");
                }
            }
        }
        if self.ranks == 0 {
            bail!("--ranks must be positive");
        }
        Ok(())
    }
}

fn produce<C: Communicator>(args: &Args, comm: &C) -> Result<Vec<Edge>> {
    Ok(match args.input {
        Input::Generic => {
            let path = args.file.as_ref().unwrap();
            if comm.rank() == 0 {
                info!("input file -> {}", path.display());
            }
            file::read_edge_list(path, true, comm)?
        }
        Input::Dbg => {
            let path = args.file.as_ref().unwrap();
            if comm.rank() == 0 {
                info!("input file -> {}", path.display());
            }
            debruijn::from_fastq(path, comm)?
        }
        Input::Kronecker => {
            let scale = args.scale.unwrap();
            if comm.rank() == 0 {
                info!("scale -> {scale}, edgefactor -> {}", args.edgefactor);
            }
            kronecker::generate(scale, args.edgefactor, KRONECKER_SEED, comm)
        }
        Input::Chain => chain::generate(args.chain_length.unwrap(), comm),
    })
}

fn run<C: Communicator>(args: &Args, comm: &C) -> Result<()> {
    let rank = comm.rank();
    if rank == 0 {
        println!("generating graph");
    }
    let mut edges = produce(args, comm)?;

    if let Some(dir) = &args.export_dot {
        export::write_dot(&mut edges, dir, comm).context("dot export failed")?;
    }
    if let Some(dir) = &args.export_bin {
        export::write_binary(&mut edges, dir, comm).context("binary export failed")?;
    }

    let config = Config {
        pointer_doubling: args.pointer_double == "y",
        opt_level: if args.no_load_balance {
            OptLevel::StablePartition
        } else {
            OptLevel::LoadBalanced
        },
        ks_threshold: args.ks_threshold,
        ..Config::default()
    };

    if rank == 0 {
        println!("beginning computation");
    }
    let start = std::time::Instant::now();
    let summary = connected_components(edges, &config, comm)?;

    if rank == 0 {
        for (i, run) in summary.bfs_runs.iter().enumerate() {
            println!(
                "BFS iteration {}: visited {} vertices, {:.1} MTEPS",
                i + 1,
                run.visited,
                run.mteps
            );
        }
        println!(
            "{} BFS iterations executed, {} coloring rounds",
            summary.bfs_iterations, summary.coloring_rounds
        );
        for (round, (min, mean, max)) in summary.round_loads.iter().enumerate() {
            info!(
                "round {} active tuples min-mean-max: {min},{mean},{max}",
                round + 1
            );
        }
        println!("count of components -> {}", summary.components);
        println!(
            "time excluding graph construction (ms) -> {:.3}",
            start.elapsed().as_secs_f64() * 1e3
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    args.validate()?;

    #[cfg(feature = "mpi")]
    {
        let (_universe, comm) = parconnect::comm::mpi::MpiComm::world();
        run(&args, &comm)
    }

    #[cfg(not(feature = "mpi"))]
    {
        let results = ThreadComm::with_ranks(args.ranks, |comm| run(&args, comm));
        results.into_iter().collect::<Result<Vec<()>>>().map(drop)
    }
}
