//! Named-string macro table and resolution.
//!
//! `@string` definitions become a [`MacroTable`]; [`resolve`] rewrites a
//! field-value tree so that no [`FieldValue::MacroRef`] remains. The table
//! is built fully before any entry is assembled and is only read here, so
//! resolution is a pure function over immutable inputs.

use crate::error::{Error, Result};
use crate::value::FieldValue;
use std::collections::HashMap;

/// Mapping from macro name to its defined value.
///
/// Lookup is case-insensitive: names are folded to ASCII lowercase on
/// insert and lookup, matching how citation databases treat `@string` keys.
#[derive(Debug, Clone, Default)]
pub struct MacroTable {
    entries: HashMap<String, FieldValue>,
}

impl MacroTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a macro, replacing any previous definition of the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.entries.insert(name.into().to_ascii_lowercase(), value);
    }

    /// Look up a macro by name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries.get(&name.to_ascii_lowercase())
    }

    /// Whether a macro of this name is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_lowercase())
    }

    /// Number of defined macros.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no definitions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over defined (lowercased) macro names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Find a defined name similar to `name`, for error suggestions.
    fn find_similar(&self, name: &str) -> Option<String> {
        let name_lower = name.to_ascii_lowercase();
        let mut best: Option<(&str, usize)> = None;

        for defined in self.entries.keys() {
            let dist = levenshtein_distance(&name_lower, defined);
            // Only suggest if reasonably close
            if dist <= 3 && best.is_none_or(|(_, d)| dist < d) {
                best = Some((defined, dist));
            }
        }

        best.map(|(s, _)| s.to_string())
    }
}

impl FromIterator<(String, FieldValue)> for MacroTable {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        let mut table = MacroTable::new();
        for (name, value) in iter {
            table.insert(name, value);
        }
        table
    }
}

/// Resolve every macro reference in `value` against `table`.
///
/// Returns a new tree; the input is untouched. Definitions may themselves
/// contain references, which are resolved in turn. Fails with
/// [`Error::UnknownMacro`] for a name absent from the table, and with
/// [`Error::CircularMacro`] if resolution re-enters a name currently being
/// resolved (macros are acyclic by construction upstream, so this is a
/// guard against infinite recursion, not an expected path).
pub fn resolve(value: &FieldValue, table: &MacroTable) -> Result<FieldValue> {
    let mut chain = Vec::new();
    resolve_inner(value, table, &mut chain)
}

fn resolve_inner(
    value: &FieldValue,
    table: &MacroTable,
    chain: &mut Vec<String>,
) -> Result<FieldValue> {
    match value {
        FieldValue::Text(_) | FieldValue::Number(_) => Ok(value.clone()),
        FieldValue::MacroRef(name) => {
            let key = name.to_ascii_lowercase();
            if chain.contains(&key) {
                let mut cycle = chain.clone();
                cycle.push(key);
                return Err(Error::CircularMacro { chain: cycle });
            }
            let Some(definition) = table.get(name) else {
                return Err(Error::UnknownMacro {
                    name: name.clone(),
                    suggestion: table.find_similar(name),
                });
            };
            chain.push(key);
            let resolved = resolve_inner(definition, table, chain)?;
            chain.pop();
            Ok(resolved)
        }
        FieldValue::Braced(children) => {
            Ok(FieldValue::Braced(resolve_children(children, table, chain)?))
        }
        FieldValue::Quoted(children) => {
            Ok(FieldValue::Quoted(resolve_children(children, table, chain)?))
        }
        FieldValue::Concat(children) => {
            Ok(FieldValue::Concat(resolve_children(children, table, chain)?))
        }
    }
}

fn resolve_children(
    children: &[FieldValue],
    table: &MacroTable,
    chain: &mut Vec<String>,
) -> Result<Vec<FieldValue>> {
    children
        .iter()
        .map(|child| resolve_inner(child, table, chain))
        .collect()
}

/// Simple Levenshtein distance calculation.
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = if a_chars[i - 1] == b_chars[j - 1] {
                0
            } else {
                1
            };
            curr[j] = (prev[j] + 1).min((curr[j - 1] + 1).min(prev[j - 1] + cost));
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    #[test]
    fn test_resolve_simple_reference() {
        let mut table = MacroTable::new();
        table.insert("ieee", text("IEEE"));

        let resolved = resolve(&FieldValue::MacroRef("ieee".to_string()), &table).unwrap();
        assert_eq!(resolved, text("IEEE"));
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let mut table = MacroTable::new();
        table.insert("IEEE", text("IEEE"));

        let resolved = resolve(&FieldValue::MacroRef("Ieee".to_string()), &table).unwrap();
        assert_eq!(resolved, text("IEEE"));
    }

    #[test]
    fn test_resolve_inside_concat() {
        let mut table = MacroTable::new();
        table.insert("acm", text("ACM"));

        let value = FieldValue::Concat(vec![
            FieldValue::MacroRef("acm".to_string()),
            text(" Computing Surveys"),
        ]);
        let resolved = resolve(&value, &table).unwrap();
        assert!(resolved.is_resolved());
        assert_eq!(resolved.flatten_plain(), "ACM Computing Surveys");
    }

    #[test]
    fn test_resolve_chained_definitions() {
        let mut table = MacroTable::new();
        table.insert("tocs", FieldValue::MacroRef("acm".to_string()));
        table.insert("acm", text("ACM"));

        let resolved = resolve(&FieldValue::MacroRef("tocs".to_string()), &table).unwrap();
        assert_eq!(resolved, text("ACM"));
    }

    #[test]
    fn test_unknown_macro() {
        let mut table = MacroTable::new();
        table.insert("ieee", text("IEEE"));

        let result = resolve(&FieldValue::MacroRef("acm".to_string()), &table);
        match result {
            Err(Error::UnknownMacro { name, .. }) => assert_eq!(name, "acm"),
            other => panic!("expected UnknownMacro, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_macro_suggests_close_name() {
        let mut table = MacroTable::new();
        table.insert("ieee", text("IEEE"));

        let result = resolve(&FieldValue::MacroRef("iee".to_string()), &table);
        match result {
            Err(Error::UnknownMacro { suggestion, .. }) => {
                assert_eq!(suggestion.as_deref(), Some("ieee"));
            }
            other => panic!("expected UnknownMacro, got {other:?}"),
        }
        let message = resolve(&FieldValue::MacroRef("iee".to_string()), &table)
            .unwrap_err()
            .to_string();
        assert!(message.contains("did you mean 'ieee'"), "got: {message}");
    }

    #[test]
    fn test_circular_macro_detected() {
        let mut table = MacroTable::new();
        table.insert("a", FieldValue::MacroRef("b".to_string()));
        table.insert("b", FieldValue::MacroRef("a".to_string()));

        let result = resolve(&FieldValue::MacroRef("a".to_string()), &table);
        match result {
            Err(Error::CircularMacro { chain }) => {
                assert_eq!(chain, vec!["a", "b", "a"]);
            }
            other => panic!("expected CircularMacro, got {other:?}"),
        }
    }

    #[test]
    fn test_self_referencing_macro_detected() {
        let mut table = MacroTable::new();
        table.insert("loop", FieldValue::MacroRef("loop".to_string()));

        assert!(matches!(
            resolve(&FieldValue::MacroRef("loop".to_string()), &table),
            Err(Error::CircularMacro { .. })
        ));
    }

    #[test]
    fn test_resolve_leaves_input_untouched() {
        let mut table = MacroTable::new();
        table.insert("ieee", text("IEEE"));

        let value = FieldValue::MacroRef("ieee".to_string());
        let _ = resolve(&value, &table).unwrap();
        assert_eq!(value, FieldValue::MacroRef("ieee".to_string()));
    }

    #[test]
    fn test_table_from_iterator() {
        let table: MacroTable = vec![
            ("Jan".to_string(), text("January")),
            ("Feb".to_string(), text("February")),
        ]
        .into_iter()
        .collect();
        assert_eq!(table.len(), 2);
        assert!(table.contains("jan"));
        assert!(table.contains("FEB"));
    }
}
