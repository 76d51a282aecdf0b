//! refla - reference linear algebra case runner
//!
//! Usage:
//!   refla run eig                        # Print the eig reference trace
//!   refla run lu-non-dominant            # Print P, L, U for the pivoting case
//!   refla run matmul-grid --seed 42      # Print the multiplication grid
//!   refla run eig --digits 14            # Select the trace precision
//!   refla generate matmul-grid -o g.json # Persist the grid as a golden file
//!
//! Exit code is 0 on success and non-zero on any unrecoverable numerical
//! failure, e.g. an exceeded convergence budget. A failed case never emits
//! a partial golden file.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use refla::error::Result;
use refla::golden::{cases, FloatFormat, GoldenRecord};

/// refla - reference linear algebra cases with golden output
#[derive(Parser)]
#[command(name = "refla")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one reference case and print its trace to stdout
    Run {
        /// Which case to run
        #[arg(value_enum)]
        case: Case,

        /// Significant digits of the printed values
        #[arg(long, default_value_t = 14)]
        digits: usize,

        /// Seed for the random grid cases
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },

    /// Generate a case and write it as a golden-record file
    Generate {
        /// Which case to generate
        #[arg(value_enum)]
        case: Case,

        /// Seed for the random grid cases
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Significant digits of the persisted values
        #[arg(long, default_value_t = 15)]
        digits: usize,

        /// Output path
        #[arg(short, long, value_name = "FILE")]
        out: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Case {
    /// General eigendecomposition of a pinned non-symmetric matrix
    Eig,
    /// Symmetric eigendecomposition of a pinned symmetric matrix
    SymmetricEig,
    /// LU of a diagonally dominant matrix (no row swaps expected)
    LuDiagonalDominant,
    /// LU of a non-dominant matrix (pivoting is the point)
    LuNonDominant,
    /// Seeded random multiplication grid over (order, inner-dim) pairs
    MatmulGrid,
}

impl Case {
    fn name(self) -> &'static str {
        match self {
            Case::Eig => "eig",
            Case::SymmetricEig => "symmetric-eig",
            Case::LuDiagonalDominant => "lu-diagonal-dominant",
            Case::LuNonDominant => "lu-non-dominant",
            Case::MatmulGrid => "matmul-grid",
        }
    }

    fn build(self, seed: u64, fmt: &FloatFormat) -> Result<GoldenRecord> {
        match self {
            Case::Eig => cases::eig_case(fmt),
            Case::SymmetricEig => cases::symmetric_eig_case(fmt),
            Case::LuDiagonalDominant => cases::lu_case(true, fmt),
            Case::LuNonDominant => cases::lu_case(false, fmt),
            Case::MatmulGrid => cases::matmul_grid(seed, fmt),
        }
    }
}

fn run(case: Case, digits: usize, seed: u64) -> Result<()> {
    let fmt = FloatFormat::with_digits(digits);
    let record = case.build(seed, &fmt)?;
    let bytes = record.encode()?;
    std::io::stdout().write_all(&bytes)?;
    println!();
    Ok(())
}

fn generate(case: Case, seed: u64, digits: usize, out: &PathBuf) -> Result<()> {
    let fmt = FloatFormat::with_digits(digits);
    // Build fully before touching the filesystem so a failed case leaves
    // no partial golden file behind
    let record = case.build(seed, &fmt)?;
    let bytes = record.encode()?;
    std::fs::write(out, bytes)?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (case, result) = match cli.command {
        Commands::Run { case, digits, seed } => (case, run(case, digits, seed)),
        Commands::Generate {
            case,
            seed,
            digits,
            out,
        } => (case, generate(case, seed, digits, &out)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("case {} failed: {e}", case.name());
            ExitCode::FAILURE
        }
    }
}
