//! Render-time executor for a compiled instruction stream.
//!
//! Instructions run strictly in order. The sink is called exactly once per
//! `EmitLiteral` / `EmitEvaluated`, the host once per `EmitEvaluated` and
//! `Splice`. The first failure stops execution and is returned as is.

use std::collections::BTreeSet;

use tracing::trace;

use crate::error::{BoxError, RenderError};
use crate::model::Instruction;

/// The write callback: receives every piece of output in order.
pub trait Sink {
    /// `marker` is `None` for static text and the eval marker otherwise.
    fn write(&mut self, content: &str, marker: Option<char>) -> Result<(), BoxError>;
}

impl<F> Sink for F
where
    F: FnMut(&str, Option<char>) -> Result<(), BoxError>,
{
    fn write(&mut self, content: &str, marker: Option<char>) -> Result<(), BoxError> {
        self(content, marker)
    }
}

/// Evaluates embedded code on behalf of the executor.
pub trait Host {
    fn evaluate(&mut self, expr: &str, marker: char) -> Result<String, BoxError>;

    fn splice(&mut self, code: &str) -> Result<(), BoxError>;
}

pub fn execute<H, S>(instructions: &[Instruction], host: &mut H, sink: &mut S) -> Result<(), RenderError>
where
    H: Host + ?Sized,
    S: Sink + ?Sized,
{
    for (pc, instruction) in instructions.iter().enumerate() {
        trace!(pc, ?instruction, "exec");
        match instruction {
            Instruction::EmitLiteral { bytes } => {
                let text = bytes.decode()?;
                sink.write(&text, None).map_err(RenderError::Write)?;
            }
            Instruction::EmitEvaluated { expr, marker } => {
                let value = host
                    .evaluate(expr, *marker)
                    .map_err(|source| RenderError::Host {
                        expr: expr.clone(),
                        source,
                    })?;
                sink.write(&value, Some(*marker))
                    .map_err(RenderError::Write)?;
            }
            Instruction::Splice { code } => {
                host.splice(code).map_err(|source| RenderError::Splice {
                    code: code.clone(),
                    source,
                })?;
            }
        }
    }
    Ok(())
}

/// Collects output into a `String`, HTML-escaping the results of selected
/// markers.
#[derive(Debug, Clone, Default)]
pub struct StringSink {
    buf: String,
    escaped: BTreeSet<char>,
}

impl StringSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn escape_html_for(mut self, marker: char) -> Self {
        self.escaped.insert(marker);
        self
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

impl Sink for StringSink {
    fn write(&mut self, content: &str, marker: Option<char>) -> Result<(), BoxError> {
        match marker {
            Some(m) if self.escaped.contains(&m) => escape_html_into(&mut self.buf, content),
            _ => self.buf.push_str(content),
        }
        Ok(())
    }
}

fn escape_html_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
}
