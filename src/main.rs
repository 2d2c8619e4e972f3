//! memsim - paging simulator entry point
//!
//! Usage: memsim [-s] <sim_type> <first_level_bits> <phys_mem_bits> <trace>...
//!
//! Arguments:
//!   sim_type         - 0 one-level FIFO and LRU, 1 two-level, 2 inverted, 3+ all
//!   first_level_bits - bits of the VPN used by the two-level first-level table
//!   phys_mem_bits    - log2 of the physical memory size in bytes
//!   trace            - one trace file per simulated process
//!
//! Options:
//!   -s  Print every translated address

use std::path::PathBuf;
use std::process;

use clap::Parser;

use memsim::io::open_traces;
use memsim::{SimConfig, SimType, SimulationReport, Simulator};

#[derive(Parser, Debug)]
#[command(name = "memsim")]
#[command(about = "Simulates one-level, two-level and inverted page tables over memory traces")]
#[command(version)]
struct Cli {
    /// Print the physical address of every access
    #[arg(short = 's')]
    verbose: bool,

    /// 0: one-level FIFO and LRU, 1: two-level, 2: inverted, 3 or more: all
    sim_type: u32,

    /// Number of VPN bits used to index the first-level table
    first_level_bits: u32,

    /// log2 of the physical memory size in bytes
    phys_mem_bits: u32,

    /// Trace files, one per process
    #[arg(required = true)]
    traces: Vec<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    // Run the simulator and handle any errors
    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main logic separated from main() for cleaner error handling
fn run(cli: &Cli) -> memsim::Result<()> {
    // Step 1: Validate configuration before touching any trace
    let config = SimConfig::new(SimType(cli.sim_type), cli.first_level_bits, cli.phys_mem_bits)?;

    // Step 2: Open traces
    for (pid, path) in cli.traces.iter().enumerate() {
        println!("process {} opening {}", pid, path.display());
    }
    let traces = open_traces(&cli.traces)?;

    println!(
        "\nNum of Frames {} Physical Memory Size {} bytes",
        config.frame_count(),
        config.phys_mem_size()
    );

    // Step 3: Simulate each selected architecture
    let mut simulator = Simulator::new(config, traces);
    if cli.verbose {
        simulator = simulator.with_observer(|event| println!("{}", event));
    }

    for &architecture in config.sim_type.architectures() {
        println!("{}", SimulationReport::banner(architecture));
        let report = simulator.run(architecture)?;
        print!("{}", report);
    }

    Ok(())
}
