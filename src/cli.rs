use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a template into a Rust render function or a JSON instruction stream
    Compile {
        /// Input template file
        input: PathBuf,
        /// Output directory
        output: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Rust)]
        format: Format,
        /// Function / artifact name (default: derived from the input file name)
        #[arg(long)]
        name: Option<String>,
        /// Type of the `ctx` parameter in generated Rust
        #[arg(long, default_value = crate::writer::rust::DEFAULT_CONTEXT_TYPE)]
        context_type: String,
        #[command(flatten)]
        delimiters: DelimiterArgs,
    },
    /// Render a template against a JSON context
    Render {
        /// Input template file
        input: PathBuf,
        /// JSON file with the values expressions are looked up in
        #[arg(long)]
        context: PathBuf,
        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// HTML-escape the output of this eval marker (repeatable)
        #[arg(long = "escape", value_name = "MARKER")]
        escape: Vec<char>,
        #[command(flatten)]
        delimiters: DelimiterArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct DelimiterArgs {
    /// JSON delimiter config file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Start delimiter (default `<%`)
    #[arg(long)]
    pub start: Option<String>,
    /// End delimiter (default `%>`)
    #[arg(long)]
    pub end: Option<String>,
    /// Eval marker characters, e.g. `=!` (default `=`)
    #[arg(long)]
    pub markers: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Rust,
    Json,
}
