//! Lowers scanned segments to the instruction stream.

use tracing::debug;

use super::literal::encode_literal;
use crate::model::{Instruction, Segment};

/// Converts every segment, in order, into one instruction. Empty static text
/// produces nothing.
pub fn emit(segments: &[Segment]) -> Vec<Instruction> {
    let mut instructions = Vec::<Instruction>::with_capacity(segments.len());

    for segment in segments {
        let instruction = match segment {
            Segment::StaticText { content } if content.is_empty() => continue,
            Segment::StaticText { content } => Instruction::EmitLiteral {
                bytes: encode_literal(content),
            },
            Segment::EvalCode { code, marker } => Instruction::EmitEvaluated {
                expr: code.clone(),
                marker: *marker,
            },
            Segment::RawCode { code } => Instruction::Splice { code: code.clone() },
        };
        instructions.push(instruction);
    }

    debug!(instructions = instructions.len(), "emitted instruction stream");
    instructions
}
