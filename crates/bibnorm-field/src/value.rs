//! The recursive field-value model.
//!
//! A field's raw content is a small grammar: literal text, braced groups,
//! quoted strings, concatenations, macro references, and numeric literals.
//! [`FieldValue`] represents that grammar as a tree. Parsing from the
//! lexer's tokenized output and flattening back to text both live here;
//! macro resolution is in [`crate::resolve`] and stays out of this module.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// A parsed field value.
///
/// Structurally immutable once constructed: there is no mutating API, and
/// nested sequences preserve source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Literal text outside any grouping.
    Text(String),
    /// A `{...}` group.
    Braced(Vec<FieldValue>),
    /// A `"..."` string.
    Quoted(Vec<FieldValue>),
    /// A `#`-concatenation of values.
    Concat(Vec<FieldValue>),
    /// A reference to a named string macro, unresolved.
    MacroRef(String),
    /// A bare numeric literal.
    Number(i64),
}

impl FieldValue {
    /// Parse a tokenized raw node from the external lexer.
    ///
    /// The lexer emits JSON: a string is literal text, a number is a
    /// numeric literal, and objects carry a `"type"` tag:
    ///
    /// - `{"type": "braced", "data": [...]}`
    /// - `{"type": "quoted", "data": [...]}`
    /// - `{"type": "concat", "data": [...]}`
    /// - `{"type": "macro", "name": "..."}`
    ///
    /// Purely structural: no macro resolution or normalization happens here.
    pub fn from_json(node: &serde_json::Value) -> Result<FieldValue> {
        match node {
            serde_json::Value::String(s) => Ok(FieldValue::Text(s.clone())),
            serde_json::Value::Number(n) => {
                n.as_i64().map(FieldValue::Number).ok_or_else(|| Error::InvalidNode {
                    detail: format!("non-integer numeric field value: {n}"),
                })
            }
            serde_json::Value::Object(obj) => {
                let kind = obj
                    .get("type")
                    .and_then(serde_json::Value::as_str)
                    .ok_or_else(|| Error::InvalidNode {
                        detail: "object node is missing a string \"type\" tag".to_string(),
                    })?;
                match kind {
                    "macro" => {
                        let name = obj
                            .get("name")
                            .and_then(serde_json::Value::as_str)
                            .ok_or_else(|| Error::InvalidNode {
                                detail: "macro node is missing a string \"name\"".to_string(),
                            })?;
                        Ok(FieldValue::MacroRef(name.to_string()))
                    }
                    "braced" | "quoted" | "concat" => {
                        let data = obj
                            .get("data")
                            .and_then(serde_json::Value::as_array)
                            .ok_or_else(|| Error::InvalidNode {
                                detail: format!("\"{kind}\" node is missing a \"data\" array"),
                            })?;
                        let children = data
                            .iter()
                            .map(FieldValue::from_json)
                            .collect::<Result<Vec<_>>>()?;
                        Ok(match kind {
                            "braced" => FieldValue::Braced(children),
                            "quoted" => FieldValue::Quoted(children),
                            _ => FieldValue::Concat(children),
                        })
                    }
                    other => Err(Error::InvalidNode {
                        detail: format!("unknown node type \"{other}\""),
                    }),
                }
            }
            other => Err(Error::InvalidNode {
                detail: format!("unexpected raw node: {other}"),
            }),
        }
    }

    /// Flatten to literal text, re-emitting `{`/`}` around braced groups.
    ///
    /// This is the form the normalization engine consumes: brace markers
    /// stay in the text as opaque grouping.
    pub fn flatten_braced(&self) -> String {
        let mut out = String::new();
        self.write_flat(&mut out, true);
        out
    }

    /// Flatten to literal text with braces stripped.
    ///
    /// Inner content is preserved character-for-character; only the group
    /// markers disappear. This is the plain display form.
    pub fn flatten_plain(&self) -> String {
        let mut out = String::new();
        self.write_flat(&mut out, false);
        out
    }

    fn write_flat(&self, out: &mut String, keep_braces: bool) {
        match self {
            FieldValue::Text(s) => out.push_str(s),
            FieldValue::Number(n) => {
                // Writing to a String cannot fail.
                let _ = write!(out, "{n}");
            }
            // Flattening is meant for resolved trees; an unresolved
            // reference degrades to its name rather than vanishing.
            FieldValue::MacroRef(name) => out.push_str(name),
            FieldValue::Braced(children) => {
                if keep_braces {
                    out.push('{');
                }
                for child in children {
                    child.write_flat(out, keep_braces);
                }
                if keep_braces {
                    out.push('}');
                }
            }
            FieldValue::Quoted(children) | FieldValue::Concat(children) => {
                for child in children {
                    child.write_flat(out, keep_braces);
                }
            }
        }
    }

    /// The display form of a field: plain-flattened text, numbers in decimal.
    pub fn as_display(&self) -> String {
        self.flatten_plain()
    }

    /// True when no macro reference remains anywhere in the tree.
    pub fn is_resolved(&self) -> bool {
        match self {
            FieldValue::Text(_) | FieldValue::Number(_) => true,
            FieldValue::MacroRef(_) => false,
            FieldValue::Braced(children)
            | FieldValue::Quoted(children)
            | FieldValue::Concat(children) => children.iter().all(FieldValue::is_resolved),
        }
    }
}
