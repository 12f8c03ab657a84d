//! Output artifacts for a compiled template.
pub mod json;
pub mod rust;
