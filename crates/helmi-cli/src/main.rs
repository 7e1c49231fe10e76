//! Helmi Command-Line Interface
//!
//! Runs the Helmi example experiments (Bell pairs, GHZ, Bernstein–Vazirani,
//! qubit flips, parameter sweeps, batch submission) against a local
//! simulator or the simulated Helmi device, and scores the histograms.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::bv::BvOption;
use commands::common::{BackendKind, Session, create_backend};
use commands::flip::FlipOption;
use commands::{backends, batch, bell, bv, flip, ghz, sweep};

/// Helmi - run and score quantum experiments on the 5-qubit Helmi device
#[derive(Parser)]
#[command(name = "helmi")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Backend to run on
    #[arg(short, long, value_enum, default_value_t = BackendKind::Simulator, global = true)]
    backend: BackendKind,

    /// Seed for sampling and random secrets
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bell pairs between QB3 and every other qubit, both CNOT directions
    Bell {
        /// Number of shots per circuit
        #[arg(short, long, default_value = "10000")]
        shots: u32,
    },

    /// Bell pairs on the star, then the 5-qubit GHZ state
    Ghz {
        /// Number of shots per circuit
        #[arg(short, long, default_value = "10000")]
        shots: u32,
    },

    /// Bernstein-Vazirani search for a hidden 4-bit number
    Bv {
        /// Hidden number (0-15); drawn at random if omitted
        #[arg(long)]
        number: Option<u32>,

        /// Single run or repeated runs
        #[arg(short, long, value_enum, default_value_t = BvOption::Repeated)]
        option: BvOption,

        /// Number of repeats of the repeated run
        #[arg(long, default_value = "5")]
        repeats: usize,

        /// Shots per run (10000 for a single run, 1000 per repeat)
        #[arg(short, long)]
        shots: Option<u32>,
    },

    /// Flip qubits with X and report success rates
    Flip {
        /// One at a time, all at once, both, or the qubit given by --qubit
        #[arg(short, long, value_enum, default_value_t = FlipOption::Both)]
        option: FlipOption,

        /// Physical qubit index (0-4); implies --option qubit
        #[arg(long)]
        qubit: Option<u32>,

        /// Number of shots per circuit
        #[arg(short, long, default_value = "10000")]
        shots: u32,
    },

    /// Sweep the phase-probe circuit over theta
    Sweep {
        /// Number of sweep points
        #[arg(long, default_value = "3")]
        points: usize,

        /// First theta
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        start: f64,

        /// Last theta
        #[arg(long, default_value = "0.5", allow_negative_numbers = true)]
        stop: f64,

        /// Number of shots per point
        #[arg(short, long, default_value = "1000")]
        shots: u32,
    },

    /// Submit two Bell variants as one batch
    Batch {
        /// Number of shots per circuit
        #[arg(short, long, default_value = "100")]
        shots: u32,
    },

    /// List available backends
    Backends,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = run(cli).await;

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Commands::Backends = cli.command {
        return backends::execute();
    }

    let session = Session {
        backend: create_backend(cli.backend, cli.seed)?,
        json: cli.json,
        seed: cli.seed,
    };

    match cli.command {
        Commands::Bell { shots } => bell::execute(&session, shots).await,
        Commands::Ghz { shots } => ghz::execute(&session, shots).await,
        Commands::Bv {
            number,
            option,
            repeats,
            shots,
        } => bv::execute(&session, number, option, repeats, shots).await,
        Commands::Flip {
            option,
            qubit,
            shots,
        } => flip::execute(&session, option, qubit, shots).await,
        Commands::Sweep {
            points,
            start,
            stop,
            shots,
        } => sweep::execute(&session, points, start, stop, shots).await,
        Commands::Batch { shots } => batch::execute(&session, shots).await,
        Commands::Backends => backends::execute(),
    }
}
