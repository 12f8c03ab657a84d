use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::CompileError;
pub use crate::processor::literal::EncodedLiteral;

pub const DEFAULT_START: &str = "<%";
pub const DEFAULT_END: &str = "%>";
pub const DEFAULT_EVAL_MARKER: char = '=';

/// Delimiters and eval markers used for one compilation.
///
/// Missing fields fall back to the defaults when deserialised, so a config
/// file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelimiterConfig {
    pub start: String,
    pub end: String,
    pub eval_markers: BTreeSet<char>,
}

impl Default for DelimiterConfig {
    fn default() -> Self {
        Self {
            start: DEFAULT_START.into(),
            end: DEFAULT_END.into(),
            eval_markers: BTreeSet::from([DEFAULT_EVAL_MARKER]),
        }
    }
}

impl DelimiterConfig {
    pub fn new(
        start: impl Into<String>,
        end: impl Into<String>,
        eval_markers: impl IntoIterator<Item = char>,
    ) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            eval_markers: eval_markers.into_iter().collect(),
        }
    }

    pub fn is_eval_marker(&self, c: char) -> bool {
        self.eval_markers.contains(&c)
    }

    /// Rejects empty delimiters. Ambiguous but non-empty delimiters are
    /// accepted; matching is leftmost-greedy.
    pub fn validate(&self) -> Result<(), CompileError> {
        if self.start.is_empty() {
            return Err(CompileError::InvalidConfiguration(
                "start delimiter is empty".into(),
            ));
        }
        if self.end.is_empty() {
            return Err(CompileError::InvalidConfiguration(
                "end delimiter is empty".into(),
            ));
        }
        Ok(())
    }
}

/// One classified span of the template source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text, emitted unmodified.
    StaticText { content: String },
    /// `<start><marker> code <end>` – evaluate and emit.
    EvalCode { code: String, marker: char },
    /// `<start> code <end>` – spliced as statement code.
    RawCode { code: String },
}

impl Segment {
    /// The exact source span this segment was scanned from.
    pub fn source_text(&self, config: &DelimiterConfig) -> String {
        match self {
            Segment::StaticText { content } => content.clone(),
            Segment::EvalCode { code, marker } => {
                format!("{}{}{}{}", config.start, marker, code, config.end)
            }
            Segment::RawCode { code } => format!("{}{}{}", config.start, code, config.end),
        }
    }
}

/// One step of the render-time instruction stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Instruction {
    /// Write the decoded literal with no marker.
    EmitLiteral { bytes: EncodedLiteral },
    /// Evaluate `expr` in the host and write the result tagged with `marker`.
    EmitEvaluated { expr: String, marker: char },
    /// Insert `code` verbatim as statement code.
    Splice { code: String },
}

/// Fully compiled template handed to `writer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledTemplate {
    pub name: String,
    pub config: DelimiterConfig,
    pub instructions: Vec<Instruction>,
}
