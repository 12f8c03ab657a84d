//! A `Host` that resolves expressions as dotted paths into a JSON value.
//!
//! `user.name` looks up the field `name` inside `user`, `items.0` indexes a
//! list. Surrounding whitespace in the expression is ignored. There is no
//! control flow: only blank splices are accepted.

use serde_json::Value;

use super::vm::Host;
use crate::error::BoxError;

#[derive(Debug, Clone)]
pub struct JsonContext {
    root: Value,
}

impl JsonContext {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let path = path.trim();
        if path.is_empty() {
            return None;
        }
        path.split('.').try_fold(&self.root, |value, key| match value {
            Value::Object(map) => map.get(key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }
}

/// Renders a JSON value the way it should appear in template output.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

impl Host for JsonContext {
    fn evaluate(&mut self, expr: &str, _marker: char) -> Result<String, BoxError> {
        self.lookup(expr)
            .map(display_value)
            .ok_or_else(|| format!("no value at `{}` in context", expr.trim()).into())
    }

    fn splice(&mut self, code: &str) -> Result<(), BoxError> {
        if code.trim().is_empty() {
            return Ok(());
        }
        Err(format!(
            "cannot splice `{}`: the JSON context has no control flow, compile to Rust instead",
            code.trim()
        )
        .into())
    }
}
