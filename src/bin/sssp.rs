//! Command-line front end.
//!
//! ```text
//! sssp run -i graph.txt -s 0 -n 1000 --workers 4
//! mpirun -n 4 sssp run -i graph.txt -s 0 -n 1000 --mpi   # with --features mpi-support
//! sssp serial -i graph.txt -s 0 -n 1000
//! sssp generate -n 1000 -e 5000 -o edges.txt
//! sssp matrix -i edges.txt -n 1000 -o graph.txt
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dijkstra_spmd::algs::communicator::run_local_world;
use dijkstra_spmd::generate::{GeneratorConfig, random_edges};
use dijkstra_spmd::io::{EdgeListReader, EdgeListWriter, MatrixWriter};
use dijkstra_spmd::prelude::*;

#[derive(Parser)]
#[command(author, version, about = "Data-parallel Dijkstra on dense adjacency matrices", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Print reports as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Args)]
struct Launch {
    /// Dense adjacency matrix, `-1` for no edge.
    #[arg(short = 'i', long = "input")]
    input: PathBuf,

    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    source: i64,

    /// Number of vertices.
    #[arg(short = 'n', long = "nodes", allow_negative_numbers = true)]
    nodes: i64,
}

#[derive(Subcommand)]
enum Command {
    /// Distributed run over in-process workers or MPI ranks.
    Run {
        #[command(flatten)]
        launch: Launch,

        /// In-process worker count (ignored with --mpi).
        #[arg(short, long, default_value_t = 1)]
        workers: usize,

        /// Use the MPI world instead of in-process workers.
        #[arg(long)]
        mpi: bool,
    },
    /// Single-process reference run.
    Serial {
        #[command(flatten)]
        launch: Launch,
    },
    /// Write a random `u v w` edge list.
    Generate {
        #[arg(short = 'n', long = "nodes")]
        nodes: usize,
        #[arg(short, long)]
        edges: usize,
        #[arg(short, long)]
        directed: bool,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Convert a `u v w` edge list into a dense matrix.
    Matrix {
        #[arg(short = 'i', long = "input")]
        input: PathBuf,
        #[arg(short = 'n', long = "nodes")]
        nodes: usize,
        #[arg(short, long)]
        directed: bool,
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            if e.is_configuration() {
                eprintln!("Usage: sssp <run|serial> -i <adj_matrix> -s <source> -n <nodes>");
            }
            ExitCode::from(1)
        }
    }
}

fn execute(cli: &Cli) -> Result<(), SsspError> {
    match &cli.command {
        Command::Run {
            launch,
            workers,
            mpi,
        } => {
            let cfg = launch.config()?;
            let report = if *mpi {
                run_mpi(&cfg)?
            } else {
                let mut results = run_local_world(*workers, |comm| distributed_sssp(&comm, &cfg))?;
                // The coordinator holds the most specific error and the only report.
                results.swap_remove(0)?
            };
            if let Some(report) = report {
                print_report(&report, cli.json)?;
            }
            Ok(())
        }
        Command::Serial { launch } => {
            let cfg = launch.config()?;
            let graph = cfg.input.load(cfg.vertex_count)?;
            print_report(&dijkstra_serial(&graph, cfg.source)?, cli.json)
        }
        Command::Generate {
            nodes,
            edges,
            directed,
            seed,
            output,
        } => {
            let gen_cfg = GeneratorConfig {
                vertices: *nodes,
                edges: *edges,
                directed: *directed,
                seed: *seed,
                ..Default::default()
            };
            let list = random_edges(&gen_cfg)?;
            let file = File::create(output).map_err(|e| SsspError::io(output, e))?;
            EdgeListWriter.write_edges(BufWriter::new(file), &list, *directed)?;
            println!("Graph generated: {}", output.display());
            Ok(())
        }
        Command::Matrix {
            input,
            nodes,
            directed,
            output,
        } => {
            let file = File::open(input).map_err(|e| SsspError::io(input, e))?;
            let graph = EdgeListReader::new(*nodes, *directed).read(file)?;
            let out = File::create(output).map_err(|e| SsspError::io(output, e))?;
            MatrixWriter.write(BufWriter::new(out), &graph)?;
            println!("Adjacency matrix written to: {}", output.display());
            Ok(())
        }
    }
}

impl Launch {
    fn config(&self) -> Result<RunConfig, SsspError> {
        RunConfig::from_raw(
            self.nodes,
            self.source,
            Some(GraphSource::File(self.input.clone())),
        )
    }
}

#[cfg(feature = "mpi-support")]
fn run_mpi(cfg: &RunConfig) -> Result<Option<SsspReport>, SsspError> {
    let comm = MpiComm::new()?;
    distributed_sssp(&comm, cfg)
}

#[cfg(not(feature = "mpi-support"))]
fn run_mpi(_cfg: &RunConfig) -> Result<Option<SsspReport>, SsspError> {
    Err(SsspError::CommError {
        rank: 0,
        message: "built without the `mpi-support` feature".into(),
    })
}

fn print_report(report: &SsspReport, json: bool) -> Result<(), SsspError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let res = if json {
        serde_json::to_writer_pretty(&mut out, report)
            .map_err(std::io::Error::from)
            .and_then(|_| writeln!(out))
    } else {
        writeln!(out, "{report}")
    };
    res.map_err(|e| SsspError::io("<stdout>", e))
}
