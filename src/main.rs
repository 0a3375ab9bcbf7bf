use std::io::{self, BufRead, Write};
use std::num::ParseIntError;
use std::process::ExitCode;

use clap::builder::RangedU64ValueParser;
use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use union_connections::{ConnectivitySimulator, UnionFindError};

#[derive(Parser, Debug)]
#[command(author, version, about = "Counts random connections until all sites are joined", long_about = None)]
struct Args {
    /// Number of sites, read from stdin when omitted
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    sites: Option<i64>,

    /// Number of independent trials
    #[arg(short, long, default_value_t = 5, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    trials: usize,

    /// Seed for the random source
    #[arg(short, long)]
    seed: Option<u64>,

    /// Run the trials on the rayon thread pool
    #[arg(long)]
    parallel: bool,

    /// Print the attempt count of every trial
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read the number of sites: {0}")]
    Io(#[from] io::Error),
    #[error("invalid number of sites: {0}")]
    Parse(#[from] ParseIntError),
    #[error(transparent)]
    UnionFind(#[from] UnionFindError),
}

fn prompt_sites() -> Result<i64, CliError> {
    print!("Enter a value for n: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().parse::<i64>()?)
}

fn run(args: Args) -> Result<(), CliError> {
    let sites = match args.sites {
        Some(sites) => sites,
        None => prompt_sites()?,
    };
    let simulator = ConnectivitySimulator::try_new(sites, args.trials)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(
        "running {} trials over {} sites with seed {}",
        simulator.trials(),
        simulator.sites(),
        seed
    );

    let summary = if args.parallel {
        simulator.run_parallel(seed)?
    } else {
        simulator.run(&mut StdRng::seed_from_u64(seed))?
    };

    if args.verbose {
        for (trial, attempts) in summary.attempts().iter().enumerate() {
            println!("trial {}: {}", trial, attempts);
        }
    }
    if let Some(average) = summary.average() {
        println!("Number of connections: {}", average);
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
