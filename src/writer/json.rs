//! Dump the instruction stream as JSON.
//!
//! Instructions are internally tagged by `op`; literals keep their `\xHH`
//! encoded form, so the artifact never depends on JSON string escaping for
//! template text.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::model::{CompiledTemplate, Instruction};

pub fn emit(template: &CompiledTemplate, out_dir: &Path) -> Result<PathBuf> {
    let path = out_dir.join(format!("{}.json", template.name));
    let json = serde_json::to_string_pretty(template).context("Serialising instructions")?;
    fs::write(&path, json).with_context(|| format!("Writing {}", path.display()))?;
    Ok(path)
}

/// Reads the `instructions` array back out of an emitted artifact.
pub fn load_instructions(json: &str) -> Result<Vec<Instruction>> {
    let root: serde_json::Value = serde_json::from_str(json)?;
    let instructions = root
        .get("instructions")
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("artifact has no `instructions` array"))?;
    Ok(serde_json::from_value(instructions)?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::DelimiterConfig;
    use crate::processor;

    #[test]
    fn test_artifact_shape() {
        let compiled =
            processor::run("t", "A<%= b %><% c %>", &DelimiterConfig::default()).unwrap();
        let value = serde_json::to_value(&compiled).unwrap();

        assert_eq!(
            value,
            json!({
                "name": "t",
                "config": { "start": "<%", "end": "%>", "eval_markers": ["="] },
                "instructions": [
                    { "op": "emit_literal", "bytes": "\\x41" },
                    { "op": "emit_evaluated", "expr": " b ", "marker": "=" },
                    { "op": "splice", "code": " c " }
                ]
            })
        );
    }

    #[test]
    fn test_emitted_artifact_loads_back() {
        let compiled = processor::run(
            "page",
            "<ul><% for x in xs { %><li><%= x %></li><% } %></ul>",
            &DelimiterConfig::default(),
        )
        .unwrap();
        let dir = tempfile::tempdir().unwrap();

        let path = emit(&compiled, dir.path()).unwrap();
        let loaded = load_instructions(&fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(path, dir.path().join("page.json"));
        assert_eq!(loaded, compiled.instructions);
    }

    #[test]
    fn test_load_rejects_missing_instructions() {
        let err = load_instructions("{\"name\": \"x\"}").unwrap_err();
        assert!(err.to_string().contains("instructions"));
    }
}
