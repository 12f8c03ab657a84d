pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod processor;
pub mod writer;

use std::io::Write as _;
use std::path::Path;

use anyhow::{Context, anyhow};
use clap::Parser;
use tracing::info;

use crate::cli::{Command, DelimiterArgs, Format};
use crate::model::DelimiterConfig;
use crate::processor::context::JsonContext;
use crate::processor::vm::{self, StringSink};

pub use crate::error::{CompileError, RenderError};
pub use crate::model::{Instruction, Segment};
pub use crate::processor::compile;

pub fn run() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    logging::init(args.verbose);

    match args.command {
        Command::Compile {
            input,
            output,
            format,
            name,
            context_type,
            delimiters,
        } => {
            // 1. ── Configure ──────────────────────────────────────────
            let config = load_config(&delimiters)?;
            let name = artifact_name(name, &input)?;

            // 2. ── Compile ────────────────────────────────────────────
            let source = read_template(&input)?;
            let compiled = processor::run(&name, &source, &config)
                .with_context(|| format!("Compiling {}", input.display()))?;

            // 3. ── Write outputs ──────────────────────────────────────
            std::fs::create_dir_all(&output)
                .with_context(|| format!("Creating {}", output.display()))?;
            let path = match format {
                Format::Rust => writer::rust::emit(&compiled, &output, &context_type)
                    .with_context(|| "Writing Rust source")?,
                Format::Json => {
                    writer::json::emit(&compiled, &output).with_context(|| "Writing JSON artifact")?
                }
            };
            info!(
                instructions = compiled.instructions.len(),
                path = %path.display(),
                "template compiled"
            );
        }
        Command::Render {
            input,
            context,
            output,
            escape,
            delimiters,
        } => {
            let instructions = load_instructions(&input, &delimiters)?;

            let json = std::fs::read_to_string(&context)
                .with_context(|| format!("Reading {}", context.display()))?;
            let mut host = JsonContext::from_json(&json)
                .with_context(|| format!("Parsing context {}", context.display()))?;

            let mut sink = escape
                .into_iter()
                .fold(StringSink::new(), StringSink::escape_html_for);
            vm::execute(&instructions, &mut host, &mut sink)
                .with_context(|| format!("Rendering {}", input.display()))?;

            let rendered = sink.into_string();
            match output {
                Some(path) => {
                    std::fs::write(&path, &rendered)
                        .with_context(|| format!("Writing {}", path.display()))?;
                    info!(path = %path.display(), "template rendered");
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(rendered.as_bytes())?;
                    stdout.flush()?;
                }
            }
        }
    }

    Ok(())
}

fn load_config(args: &DelimiterArgs) -> anyhow::Result<DelimiterConfig> {
    let overrides = config::Overrides {
        start: args.start.clone(),
        end: args.end.clone(),
        markers: args.markers.clone(),
    };
    config::load(args.config.as_deref(), &overrides).with_context(|| "Loading delimiter config")
}

/// Name of the generated function / artifact file. Both formats need a
/// plain identifier so the artifact lands inside the output directory.
fn artifact_name(name: Option<String>, input: &Path) -> anyhow::Result<String> {
    let name = match name {
        Some(name) => name,
        None => {
            writer::rust::ident_from_stem(&input.file_stem().unwrap_or_default().to_string_lossy())
        }
    };
    if !writer::rust::is_ident(&name) {
        return Err(anyhow!(
            "`{name}` is not a valid artifact name (ASCII identifier, not a keyword), pass --name"
        ));
    }
    Ok(name)
}

/// A `.json` input is an artifact from `compile --format json`; anything
/// else is template source.
fn load_instructions(input: &Path, delimiters: &DelimiterArgs) -> anyhow::Result<Vec<Instruction>> {
    if input.extension().is_some_and(|ext| ext == "json") {
        let json = read_template(input)?;
        let instructions = writer::json::load_instructions(&json)
            .with_context(|| format!("Loading compiled artifact {}", input.display()))?;
        info!(instructions = instructions.len(), "compiled artifact loaded");
        return Ok(instructions);
    }

    let config = load_config(delimiters)?;
    let source = read_template(input)?;
    processor::compile(&source, &config).with_context(|| format!("Compiling {}", input.display()))
}

fn read_template(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))
}
