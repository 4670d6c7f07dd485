use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process;
use workflow::config::WorkflowConfig;
use workflow::runner::{RunOutcome, Runner};

mod discovery;
mod workflow;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Generate SigmaDSP_parameters.h from SigmaStudio export files"
)]
struct Args {
    /// SigmaStudio project directory to search for exports
    #[arg(short = 'i', long, default_value = ".")]
    input: PathBuf,
    /// Output directory (defaults to the input directory)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
    /// Project directory (deprecated, use --input)
    #[arg(short = 'd', long)]
    directory: Option<PathBuf>,
    /// Enable debug logging
    #[arg(short = 'v', long, default_value_t = false)]
    verbose: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Override the project name taken from the .dspproj file
    #[arg(long)]
    project_name: Option<String>,
    /// Fixed timestamp for the generated banner
    #[arg(long)]
    timestamp: Option<String>,
    /// Print the run summary as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut config = if let Some(path) = &args.workflow {
        WorkflowConfig::load(path)?
    } else {
        let input = args.directory.clone().unwrap_or_else(|| args.input.clone());
        WorkflowConfig::from_args(input, None)
    };
    if let Some(output) = args.output {
        config.output_dir = Some(output);
    }
    if let Some(name) = args.project_name {
        config.project_name = Some(name);
    }
    if let Some(timestamp) = args.timestamp {
        config.timestamp = Some(timestamp);
    }

    if !config.input_dir.is_dir() {
        anyhow::bail!("input directory does not exist: {}", config.input_dir.display());
    }
    log::debug!("input directory: {}", config.input_dir.display());
    log::debug!("output file: {}", config.output_path().display());

    let runner = Runner::new(config);
    match runner.execute()? {
        RunOutcome::Generated(summary) => {
            if args.json {
                let json = serde_json::to_string_pretty(&summary)
                    .context("serializing run summary")?;
                println!("{}", json);
            } else {
                println!(
                    "Generated {} -> chip {}, symbols {}, blocks {}, {} chars",
                    summary.output.display(),
                    summary.chip,
                    summary.metrics.parameter_symbols,
                    summary.metrics.blocks_emitted,
                    summary.metrics.output_chars
                );
            }
            Ok(())
        }
        RunOutcome::Aborted(diagnostics) => {
            for diagnostic in diagnostics.iter().filter(|diag| diag.is_fatal()) {
                eprintln!("{}", diagnostic);
            }
            process::exit(1);
        }
    }
}
