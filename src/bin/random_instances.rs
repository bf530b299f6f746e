use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use log::{error, info, LevelFilter};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use structopt::StructOpt;

use atsp::{
    exact::{naive::naive_solver, solve},
    graph::{random_cost_matrix, NumVertices, SquareMatrix},
    log::build_logger_for_verbosity,
    utils::signal_handling,
};

/// Stress test comparing the branch and bound against the brute force on
/// random instances.
#[derive(StructOpt)]
struct Opts {
    /// Number of rounds; each round solves one instance per size
    #[structopt(short, long, default_value = "200")]
    repeats: u32,

    /// Instance sizes to draw from
    #[structopt(short = "n", long, default_value = "4,5,6,7,8", use_delimiter = true)]
    sizes: Vec<NumVertices>,

    /// Largest finite cost of a generated edge
    #[structopt(short, long, default_value = "20")]
    max_cost: u32,

    /// Seed for the generator; random if omitted
    #[structopt(short, long)]
    seed: Option<u64>,

    /// Directory to store mismatching instances in
    #[structopt(short = "b", long)]
    buggy_dir: Option<PathBuf>,

    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: usize,
}

fn write_instance(matrix: &SquareMatrix, path: &Path) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "p tsp {}", matrix.number_of_vertices())?;

    for row in matrix.vertices() {
        for col in matrix.vertices() {
            if col > 0 {
                write!(writer, " ")?;
            }
            let cost = matrix[(row, col)];
            if cost.is_finite() {
                write!(writer, "{cost}")?;
            } else {
                write!(writer, "-")?;
            }
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn main() {
    let opts = Opts::from_args();
    build_logger_for_verbosity(LevelFilter::Info, opts.verbose);
    signal_handling::initialize();

    let seed = opts.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!("using seed {seed}");
    let mut rng = Pcg64::seed_from_u64(seed);

    let mut mismatches = 0u32;
    'rounds: for round in 0..opts.repeats {
        for &n in &opts.sizes {
            if signal_handling::received_ctrl_c() {
                info!("interrupted in round {round}");
                break 'rounds;
            }

            let matrix = random_cost_matrix(&mut rng, n, opts.max_cost);
            let expected = naive_solver(&matrix);
            let tour = solve(matrix.clone());

            let agrees = match (&expected, &tour) {
                (None, None) => true,
                (Some(expected), Some(tour)) => {
                    tour.is_complete(n) && tour.cost() == expected.cost()
                }
                _ => false,
            };

            if !agrees {
                mismatches += 1;
                error!(
                    "mismatch in round {round} for n={n}: brute force {:?}, branch and bound {:?}",
                    expected.as_ref().map(|t| t.cost()),
                    tour.as_ref().map(|t| t.cost())
                );

                if let Some(dir) = &opts.buggy_dir {
                    let path = dir.join(format!("buggy-{seed}-{round}-{n}.tsp"));
                    match write_instance(&matrix, &path) {
                        Ok(()) => info!("wrote {}", path.display()),
                        Err(error) => error!("cannot write {}: {error}", path.display()),
                    }
                }
            }
        }
    }

    info!("finished with {mismatches} mismatches");
    if mismatches > 0 {
        std::process::exit(1);
    }
}
