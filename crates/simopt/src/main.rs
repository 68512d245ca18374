use std::path::PathBuf;

use clap::{Parser, Subcommand};
use simopt::{OutputFormat, RunConfig, init_logging, render, run};

#[derive(Parser, Debug)]
#[command(name = "simopt")]
#[command(about = "Calibrate stochastic simulation models with stochastic approximation")]
struct Args {
    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the optimizer described by a YAML file
    Run {
        /// Path to the run description
        config: PathBuf,

        /// How to print the trace
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Override the seed from the run description
        #[arg(long)]
        seed: Option<u64>,

        /// Override the iteration budget from the run description
        #[arg(long)]
        max_iterations: Option<usize>,
    },
    /// Print an example run description
    Example,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(&args.log_level, args.log_file.as_deref())?;

    match args.command {
        Command::Run {
            config,
            format,
            seed,
            max_iterations,
        } => {
            let mut run_config = RunConfig::load(&config)?;
            if let Some(seed) = seed {
                run_config.seed = seed;
            }
            if let Some(max_iterations) = max_iterations {
                run_config.max_iterations = max_iterations;
            }

            let report = run(&run_config, None)?;
            print!("{}", render(&report, format)?);
        }
        Command::Example => {
            print!("{}", RunConfig::example().to_yaml()?);
        }
    }

    tracing::info!("simopt finished");
    Ok(())
}
