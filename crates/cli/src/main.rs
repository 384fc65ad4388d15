//! Trace-driven SRAM cache simulator CLI.

use clap::Parser;
use log::info;
use std::{fs, process};

use cachesim::config::Config;
use cachesim::sim::trace::{Replay, parse_trace, verbose_line};
use cachesim::MemError;

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Write-back, write-allocate SRAM cache simulator",
    long_about = None,
)]
struct Cli {
    /// Memory trace to replay (valgrind lackey format).
    #[arg(short = 't', long)]
    trace: String,

    /// JSON configuration file; flags below override it.
    #[arg(short = 'c', long)]
    config: Option<String>,

    /// Number of set index bits (2^s sets).
    #[arg(short = 's')]
    index_bits: Option<u32>,

    /// Associativity (lines per set).
    #[arg(short = 'E')]
    ways: Option<usize>,

    /// Number of block offset bits (2^b byte blocks).
    #[arg(short = 'b')]
    offset_bits: Option<u32>,

    /// Print every record with its outcomes.
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Print the statistics as JSON.
    #[arg(long)]
    json: bool,

    /// Print the cache contents after the replay.
    #[arg(long)]
    dump: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("\x1b[1;31merror:\x1b[0m {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), MemError> {
    let config = load_config(cli)?;
    let text = fs::read_to_string(&cli.trace)?;
    let records = parse_trace(&text)?;
    info!("replaying {} records from {}", records.len(), cli.trace);

    let mut replay = Replay::new(&config.cache)?;
    let stats = replay.run(&records, |record, outcomes| {
        if cli.verbose {
            println!("{}", verbose_line(record, outcomes));
        }
    })?;

    if cli.dump {
        print!("{}", replay.cache());
    }
    if cli.json {
        println!("{}", stats.to_json()?);
    } else {
        stats.print();
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config, MemError> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(s) = cli.index_bits {
        config.cache.index_bits = s;
    }
    if let Some(e) = cli.ways {
        config.cache.ways = e;
    }
    if let Some(b) = cli.offset_bits {
        config.cache.offset_bits = b;
    }
    // Replay never touches DRAM, but the geometry must still be consistent.
    config.cache.validate()?;
    Ok(config)
}
