//! The functional core: scan, emit, and execute templates.
//!
//! `compile` is a pure function of its inputs; callers wanting caching can
//! key on `(source, config)`.
pub mod context;
pub mod emitter;
pub mod literal;
pub mod scanner;
pub mod vm;

use tracing::debug;

use crate::error::CompileError;
use crate::model::{CompiledTemplate, DelimiterConfig, Instruction};

/// Compiles template source into its instruction stream.
pub fn compile(src: &str, config: &DelimiterConfig) -> Result<Vec<Instruction>, CompileError> {
    let segments = scanner::scan(src, config)?;
    Ok(emitter::emit(&segments))
}

/// Runs every pass and returns a read-only structure for writers.
pub fn run(name: &str, src: &str, config: &DelimiterConfig) -> Result<CompiledTemplate, CompileError> {
    let instructions = compile(src, config)?;
    debug!(name, instructions = instructions.len(), "compiled template");

    Ok(CompiledTemplate {
        name: name.to_string(),
        config: config.clone(),
        instructions,
    })
}
