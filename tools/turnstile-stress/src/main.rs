///
/// turnstile-stress CLI
///
/// Runs concurrent workloads against the turnstile primitives:
/// - turnstile-stress queue: producers and consumers through a bounded queue
/// - turnstile-stress lock: readers and writers under one admission priority
/// - turnstile-stress run <config>: both workloads from a TOML file
///

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

use turnstile_rwlock::Priority;
use turnstile_stress::config::{
    DEFAULT_CAPACITY, DEFAULT_CONSUMERS, DEFAULT_ITEMS_PER_PRODUCER, DEFAULT_ITERATIONS,
    DEFAULT_PRIORITY, DEFAULT_PRODUCERS, DEFAULT_READERS, DEFAULT_WRITERS,
};
use turnstile_stress::{
    parse_config, run, run_lock_workload, run_queue_workload, LockWorkload, QueueWorkload,
};

#[derive(Parser)]
#[command(name = "turnstile-stress")]
#[command(author, version, about = "Stress the turnstile queue and rwlock", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Push and pop through one bounded queue
    Queue {
        /// Queue capacity in items
        #[arg(long, default_value_t = DEFAULT_CAPACITY)]
        capacity: usize,

        /// Number of producer threads
        #[arg(long, default_value_t = DEFAULT_PRODUCERS)]
        producers: usize,

        /// Number of consumer threads
        #[arg(long, default_value_t = DEFAULT_CONSUMERS)]
        consumers: usize,

        /// Items pushed by each producer
        #[arg(long, default_value_t = DEFAULT_ITEMS_PER_PRODUCER)]
        items: usize,
    },

    /// Contend readers and writers on one priority lock
    Lock {
        /// Admission priority (readers, writers, n-way:<n>)
        #[arg(long, default_value_t = DEFAULT_PRIORITY)]
        priority: Priority,

        /// Number of reader threads
        #[arg(long, default_value_t = DEFAULT_READERS)]
        readers: usize,

        /// Number of writer threads
        #[arg(long, default_value_t = DEFAULT_WRITERS)]
        writers: usize,

        /// Sections entered by each thread
        #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
        iterations: usize,
    },

    /// Run both workloads from a TOML config
    Run {
        /// Path to the config file
        config: PathBuf,
    },
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Queue {
            capacity,
            producers,
            consumers,
            items,
        } => {
            let report = run_queue_workload(&QueueWorkload {
                capacity,
                producers,
                consumers,
                items_per_producer: items,
            })?;
            println!("{}", report);
        }
        Commands::Lock {
            priority,
            readers,
            writers,
            iterations,
        } => {
            let report = run_lock_workload(&LockWorkload {
                priority,
                readers,
                writers,
                iterations,
            })?;
            println!("{}", report);
        }
        Commands::Run { config } => {
            let config = parse_config(&config)?;
            let report = run(&config)?;
            println!("{}", report);
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_max_level(level)
        .init();
}
