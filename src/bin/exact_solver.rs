use std::{
    fs::File,
    io::{stdout, BufWriter, Write},
    path::PathBuf,
};

use anyhow::Context;
use log::{info, warn, LevelFilter};
use serde::Serialize;
use structopt::StructOpt;

use atsp::{
    exact::{BranchAndBound, NodeView, TraceCursor, TraceStep},
    graph::SquareMatrix,
    io::{try_write_dot_with_tour, DotWriter, MatrixReadable, TourWriter},
    log::build_logger_for_verbosity,
    prelude::TerminatingIterativeAlgorithm,
    utils::signal_handling,
};

#[derive(StructOpt)]
struct Opts {
    /// Instance file; stdin if omitted
    #[structopt(short, long)]
    instance: Option<PathBuf>,

    /// Tour output file; stdout if omitted
    #[structopt(short, long)]
    output: Option<PathBuf>,

    /// Record every search step and dump the trace as JSON
    #[structopt(long)]
    trace_json: Option<PathBuf>,

    /// Write the input graph (with the tour highlighted, if any) as DOT
    #[structopt(long)]
    dot_graph: Option<PathBuf>,

    /// Write the final search tree as DOT
    #[structopt(long)]
    dot_tree: Option<PathBuf>,

    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: usize,
}

/// Machine-readable dump of a recorded search: the step log plus the full
/// final arena. A renderer reconstructs the tree at step `i` from the first
/// `steps[i].nodes` entries of `tree`.
#[derive(Serialize)]
struct TraceDump<'a> {
    steps: &'a [TraceStep],
    tree: Vec<NodeView>,
}

fn load_matrix(path: &Option<PathBuf>) -> anyhow::Result<SquareMatrix> {
    Ok(match path {
        Some(path) => SquareMatrix::try_read_matrix_file(path)
            .with_context(|| format!("cannot read instance {}", path.display()))?,
        None => {
            let stdin = std::io::stdin();
            SquareMatrix::try_read_matrix(stdin.lock())
                .context("cannot read instance from stdin")?
        }
    })
}

fn write_artifacts(
    opts: &Opts,
    matrix: &SquareMatrix,
    solver: &BranchAndBound,
) -> anyhow::Result<()> {
    if let Some(path) = &opts.dot_graph {
        let writer = BufWriter::new(File::create(path)?);
        match solver.best_tour() {
            Some(tour) => try_write_dot_with_tour(matrix, tour, writer)?,
            None => matrix.try_write_dot(writer)?,
        }
    }

    if let Some(path) = &opts.dot_tree {
        if let Some(tree) = solver.tree() {
            tree.try_write_dot(BufWriter::new(File::create(path)?))?;
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::from_args();
    build_logger_for_verbosity(LevelFilter::Warn, opts.verbose);
    signal_handling::initialize();

    let matrix = load_matrix(&opts.instance)?;
    info!(
        "loaded instance with {} vertices",
        matrix.number_of_vertices()
    );

    let tour = if let Some(trace_path) = &opts.trace_json {
        let mut cursor = TraceCursor::new(matrix.clone());
        while !signal_handling::received_ctrl_c() && cursor.step_forward() {}

        let dump = TraceDump {
            steps: cursor.recorded_steps(),
            tree: cursor
                .solver()
                .tree()
                .map_or_else(Vec::new, |t| t.view(t.len())),
        };
        serde_json::to_writer(BufWriter::new(File::create(trace_path)?), &dump)
            .with_context(|| format!("cannot write trace {}", trace_path.display()))?;

        write_artifacts(&opts, &matrix, cursor.solver())?;
        cursor.solver().best_tour().cloned()
    } else {
        let mut algo = BranchAndBound::new(matrix.clone());
        let tour = algo.run_to_completion().flatten();
        write_artifacts(&opts, &matrix, &algo)?;
        tour
    };

    match tour {
        Some(tour) => {
            if !tour.is_empty() && !tour.exists() {
                warn!("the tour contains infinite edges; the instance is degenerate");
            }
            let writer: Box<dyn Write> = match &opts.output {
                Some(path) => Box::new(BufWriter::new(File::create(path)?)),
                None => Box::new(stdout().lock()),
            };
            tour.try_write_tour(writer)?;
        }
        None => warn!("no Hamiltonian tour exists"),
    }

    Ok(())
}
