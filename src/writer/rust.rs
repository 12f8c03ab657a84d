//! Emit a Rust render function for a compiled template.
//!
//! Every `EmitLiteral` becomes a `write(..., None)` call on a byte-string
//! literal built from the encoded escapes, every `EmitEvaluated` a
//! `write(&format!(..), Some(marker))` call, and every `Splice` is pasted in
//! verbatim so `if`/`for`/`while` in the template wrap the surrounding calls.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::{CompiledTemplate, Instruction};

pub const DEFAULT_CONTEXT_TYPE: &str = "Context";

pub fn emit(template: &CompiledTemplate, out_dir: &Path, context_type: &str) -> io::Result<PathBuf> {
    let path = out_dir.join(format!("{}.rs", template.name));
    fs::write(&path, source(template, context_type))?;
    Ok(path)
}

/// The generated module source.
pub fn source(template: &CompiledTemplate, context_type: &str) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_source(&mut out, template, context_type);
    out
}

fn write_source(
    out: &mut String,
    template: &CompiledTemplate,
    context_type: &str,
) -> std::fmt::Result {
    let config = &template.config;

    writeln!(out, "// Auto-generated by tmplc – DO NOT EDIT")?;
    writeln!(
        out,
        "// delimiters: {:?} … {:?}, eval markers: {:?}\n",
        config.start, config.end, config.eval_markers
    )?;

    writeln!(out, "#[allow(unused_variables, unused_braces, clippy::all)]")?;
    writeln!(out, "pub fn {}<E>(", template.name)?;
    writeln!(out, "    ctx: &{context_type},")?;
    writeln!(
        out,
        "    write: &mut dyn FnMut(&str, Option<char>) -> Result<(), E>,"
    )?;
    writeln!(out, ") -> Result<(), E> {{")?;
    // literals are checked in const context: bad UTF-8 fails the build
    writeln!(out, "    macro_rules! __literal {{")?;
    writeln!(out, "        ($bytes:literal) => {{{{")?;
    writeln!(out, "            const S: &str = match ::core::str::from_utf8($bytes) {{")?;
    writeln!(out, "                Ok(s) => s,")?;
    writeln!(out, "                Err(_) => panic!(\"template literal is not valid UTF-8\"),")?;
    writeln!(out, "            }};")?;
    writeln!(out, "            S")?;
    writeln!(out, "        }}}};")?;
    writeln!(out, "    }}")?;

    for instruction in &template.instructions {
        match instruction {
            Instruction::EmitLiteral { bytes } => {
                writeln!(out, "    write(__literal!(b\"{}\"), None)?;", bytes.as_str())?;
            }
            Instruction::EmitEvaluated { expr, marker } => {
                writeln!(out, "    write(&::std::format!(\"{{}}\", {{")?;
                writeln!(out, "{expr}")?;
                writeln!(out, "    }}), Some('{}'))?;", marker.escape_default())?;
            }
            Instruction::Splice { code } => {
                writeln!(out, "{code}")?;
            }
        }
    }

    writeln!(out, "    Ok(())")?;
    writeln!(out, "}}")?;
    Ok(())
}

/// Strict and reserved keywords of the 2024 edition. `_` is handled apart.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub",
    "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "try",
    "type", "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

/// Turns a file stem into a usable function name: non-identifier chars
/// become `_`, a leading digit gets a `_` prefix, a keyword a `_` suffix.
pub fn ident_from_stem(stem: &str) -> String {
    let mut ident: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if is_keyword(&ident) {
        ident.push('_');
    }
    ident
}

/// ASCII identifier that is neither `_` nor a keyword.
pub fn is_ident(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    name != "_" && !is_keyword(name) && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
