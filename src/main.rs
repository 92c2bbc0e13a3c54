//! Simulate the threshold random beacon and print the chain.

use clap::Parser;
use dkg_beacon::sim::{Config, Simulator};
use dkg_beacon::{CurveKind, Error, MinPk, MinSig, Variant};
use tracing::{error, Level};

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(about = "Threshold-BLS random beacon simulation")]
struct Args {
    /// Length of the chain (number of blocks to create)
    #[arg(short = 'l', default_value_t = 20)]
    length: usize,

    /// Group size
    #[arg(short = 'n', default_value_t = 3)]
    group_size: usize,

    /// Threshold
    #[arg(short = 'k', default_value_t = 2)]
    threshold: usize,

    /// Number of processes
    #[arg(short = 'N', default_value_t = 8)]
    processes: usize,

    /// Number of groups
    #[arg(short = 'm', default_value_t = 5)]
    groups: usize,

    /// Random seed
    #[arg(long, default_value = "DFINITY")]
    seed: String,

    /// Enable built-in self tests
    #[arg(long)]
    bist: bool,

    /// Skip checking shares against the verification vectors
    #[arg(long)]
    skip_vvec: bool,

    /// Log timing information
    #[arg(long)]
    timing: bool,

    /// Pairing: bls12381-minpk or bls12381-minsig
    #[arg(long, default_value = "bls12381-minsig")]
    curve: String,

    /// Log level
    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,
}

impl Args {
    fn config(&self) -> Result<Config, Error> {
        Ok(Config {
            seed: self.seed.clone(),
            group_size: self.group_size,
            threshold: self.threshold,
            processes: self.processes,
            groups: self.groups,
            length: self.length,
            double_check: self.bist,
            vvec: !self.skip_vvec,
            timing: self.timing,
            curve: self.curve.parse::<CurveKind>()?,
        })
    }
}

fn run<V: Variant>(config: Config) -> Result<(), Error> {
    println!("{}", V::NAME);
    let timing = config.timing;
    let length = config.length;
    let mut sim = Simulator::<V>::new(config)?;

    println!("--- Genesis block");
    print!("{}: {}", sim.length(), sim.tip().long());
    println!("--- Blockchain states: (l){}", length);
    for _ in 0..length {
        sim.advance(1)?;
        println!("{:3}: {}", sim.length(), sim.tip());
    }
    sim.verify_chain()?;

    if timing {
        println!("{}", sim.counters());
    }
    Ok(())
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    let res = args.config().and_then(|config| match config.curve {
        CurveKind::Bls12381MinPk => run::<MinPk>(config),
        CurveKind::Bls12381MinSig => run::<MinSig>(config),
    });
    if let Err(e) = res {
        error!(fatal = e.is_fatal(), "{}", e);
        std::process::exit(1);
    }
}
