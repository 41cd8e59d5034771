// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! StreetNet CLI - grow street networks and export their faces.
//!
//! # Commands
//!
//! - `streetnet grow` - grow a network from seed points and/or seed streets
//! - `streetnet faces` - trace the faces of an existing set of streets
//!
//! Seed streets are read as JSON: an array of polylines, each an array of
//! `[x, y]` pairs. Output is the network snapshot as JSON, written to a file
//! or stdout. Logging goes to stderr and is controlled by `RUST_LOG`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use streetnet_growth::{GrowthConfig, GrowthEngine};
use streetnet_topology::{NetworkGraph, Point2D};

#[derive(Parser)]
#[command(name = "streetnet")]
#[command(about = "Procedural street network growth", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grow a street network
    Grow {
        /// Growth config JSON (defaults apply to missing fields)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Seed streets JSON
        #[arg(short, long)]
        network: Option<PathBuf>,
        /// Seed point as `x,y`; may be repeated
        #[arg(short = 'p', long = "point", value_parser = parse_point)]
        points: Vec<Point2D>,
        /// Override the random seed
        #[arg(long)]
        seed: Option<u64>,
        /// Override the number of generations
        #[arg(long)]
        iterations: Option<u32>,
        /// Override the wall-clock deadline in milliseconds
        #[arg(long)]
        deadline_ms: Option<u64>,
        /// Also write the block dual graph to this file
        #[arg(long)]
        dual: Option<PathBuf>,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Trace the faces of a set of streets
    Faces {
        /// Streets JSON
        network: PathBuf,
        /// Also write the block dual graph to this file
        #[arg(long)]
        dual: Option<PathBuf>,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Grow {
            config,
            network,
            points,
            seed,
            iterations,
            deadline_ms,
            dual,
            output,
        } => {
            let mut config = match config {
                Some(path) => GrowthConfig::from_json_file(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => GrowthConfig::default(),
            };
            if let Some(seed) = seed {
                config.seed = seed;
            }
            if let Some(iterations) = iterations {
                config.iterations = iterations;
            }
            if let Some(deadline_ms) = deadline_ms {
                config.deadline_ms = deadline_ms;
            }
            cmd_grow(config, network.as_deref(), &points, dual.as_deref(), output.as_deref())
        }
        Commands::Faces {
            network,
            dual,
            output,
        } => cmd_faces(&network, dual.as_deref(), output.as_deref()),
    }
}

fn cmd_grow(
    config: GrowthConfig,
    network: Option<&Path>,
    points: &[Point2D],
    dual: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let mut graph = match network {
        Some(path) => NetworkGraph::from_curve_network(&load_polylines(path)?),
        None => NetworkGraph::new(),
    };

    let mut engine = GrowthEngine::new(config)?;

    // Without explicit seeds, every node of the seed streets grows.
    if points.is_empty() {
        let existing = graph.node_points();
        if existing.is_empty() {
            bail!("nothing to grow: give a seed network or at least one --point");
        }
        for point in existing {
            engine.seed_node(&mut graph, point);
        }
    } else {
        for &point in points {
            engine.seed_node(&mut graph, point);
        }
    }

    let report = engine.run(&mut graph)?;
    tracing::info!(
        connections = report.connections(),
        timed_out = report.timed_out,
        "Grew network"
    );

    finish(graph, dual, output)
}

fn cmd_faces(network: &Path, dual: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let graph = NetworkGraph::from_curve_network(&load_polylines(network)?);
    tracing::info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Loaded network"
    );
    finish(graph, dual, output)
}

/// Solves faces, writes the snapshot and optionally the dual graph.
fn finish(mut graph: NetworkGraph, dual: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let faces = graph.solve_faces();
    let blocks = graph.block_loops().len();
    tracing::info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        faces = faces,
        blocks = blocks,
        "Solved faces"
    );

    if let Some(path) = dual {
        let dual_graph = graph.dual_graph();
        write_output(&dual_graph.to_json()?, Some(path))?;
    }

    write_output(&graph.to_json()?, output)
}

fn load_polylines(path: &Path) -> Result<Vec<Vec<Point2D>>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading network {}", path.display()))?;
    parse_polylines(&content).with_context(|| format!("parsing network {}", path.display()))
}

fn parse_polylines(json: &str) -> Result<Vec<Vec<Point2D>>> {
    let raw: Vec<Vec<[f64; 2]>> = serde_json::from_str(json)?;
    Ok(raw
        .into_iter()
        .map(|line| line.into_iter().map(|[x, y]| Point2D::new(x, y)).collect())
        .collect())
}

fn write_output(json: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = json.len(), "Wrote output");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn parse_point(s: &str) -> std::result::Result<Point2D, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x in `{s}`: {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y in `{s}`: {e}"))?;
    Ok(Point2D::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_parse_from_pairs() {
        assert_eq!(parse_point("1.5, -2").unwrap(), Point2D::new(1.5, -2.0));
        assert!(parse_point("1.5").is_err());
        assert!(parse_point("a,2").is_err());
    }

    #[test]
    fn polylines_parse_from_nested_pairs() {
        let lines = parse_polylines("[[[0, 0], [10, 0]], [[5, -5], [5, 5], [8, 9]]]").unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].len(), 3);
        assert_eq!(lines[1][2], Point2D::new(8.0, 9.0));
        assert!(parse_polylines("{}").is_err());
    }

    #[test]
    fn cli_accepts_repeated_points() {
        let cli = Cli::try_parse_from([
            "streetnet", "grow", "-p", "0,0", "--point", "100,0", "--seed", "3",
        ])
        .unwrap();
        match cli.command {
            Commands::Grow { points, seed, .. } => {
                assert_eq!(points.len(), 2);
                assert_eq!(seed, Some(3));
            }
            Commands::Faces { .. } => panic!("expected grow"),
        }
    }
}
