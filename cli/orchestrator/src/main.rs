//! protogen command line
//!
//! Runs the generator stage for one schema description: resolves the
//! parameter string, applies the bootstrap guard, plans the artifacts and
//! writes them below the output directory.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pipeline::FsSink;
use protogen_cli::{generator_for, load_config, load_schema, Result};
use tracing::info;

/// Command-line interface configuration for protogen.
#[derive(Parser, Debug)]
#[command(name = "protogen", about = "Schema-to-C++ generator stage", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
    /// Environment file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log level, overridden by PROTOGEN_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,
}

/// Available protogen commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate artifacts for a schema
    Generate {
        /// JSON schema description
        #[arg(long)]
        schema: PathBuf,
        /// Generator parameter string, e.g. `lite,proto_h`
        #[arg(long)]
        parameter: Option<String>,
        /// Output directory (defaults to the configured one)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the artifacts a generation would produce
    Plan {
        /// JSON schema description
        #[arg(long)]
        schema: PathBuf,
        /// Generator parameter string
        #[arg(long)]
        parameter: Option<String>,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("protogen: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    logging::init(level, config.logging.file.as_deref());
    logging::trace("cli", &format!("runtime {:?}", config.runtime));

    let generator = generator_for(&config);
    match cli.cmd {
        Commands::Generate { schema, parameter, output } => {
            let schema = load_schema(&schema)?;
            let parameter = config.effective_parameter(parameter.as_deref());
            let root = output.unwrap_or_else(|| config.codegen.output_dir.clone());
            let mut sink = FsSink::new(&root);

            let report = generator.generate(&schema, &parameter, &mut sink)?;
            let artifacts = report.written.len();
            info!(output = %root.display(), artifacts, "generation finished");
            if let Some(target) = &report.forwarded_to {
                println!("forwarded {} -> {}", report.basename, target);
            }
            for name in &report.written {
                println!("{}", name);
            }
        }
        Commands::Plan { schema, parameter, json } => {
            let schema = load_schema(&schema)?;
            let parameter = config.effective_parameter(parameter.as_deref());
            match generator.plan(&schema, &parameter)? {
                Some(plan) if json => println!("{}", serde_json::to_string_pretty(&plan)?),
                Some(plan) => {
                    for name in plan.artifact_names() {
                        println!("{}", name);
                    }
                }
                None => println!("{} is forwarded to its bootstrap output", schema.name),
            }
        }
    }
    Ok(())
}
