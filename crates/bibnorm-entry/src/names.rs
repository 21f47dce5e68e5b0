//! Author-list parsing.
//!
//! An `author` field's resolved text is a list of person names separated
//! by the word `and` at brace depth 0. Each person decomposes into the
//! standard four name-part groups (First, von, Last, Jr) according to how
//! many depth-0 commas the name contains:
//!
//! - no comma: `First von Last`
//! - one comma: `von Last, First`
//! - two commas: `von Last, Jr, First`
//!
//! Braced groups protect their content: a depth-0 `" and "` ends a person,
//! one inside `{...}` does not, and `{Barnes and Noble}` stays a single
//! name token. Group markers are stripped from the stored parts; the inner
//! text is preserved character-for-character.

use serde::{Deserialize, Serialize};

/// A structured person name.
///
/// Each part is an ordered list of the tokens classified into it, so
/// multi-word parts like `La Fontaine` keep their word boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    /// First (given) name tokens.
    pub first: Vec<String>,
    /// The lowercase particle tokens ("von", "de", "van den", ...).
    pub von: Vec<String>,
    /// Last (family) name tokens.
    pub last: Vec<String>,
    /// Generational suffix tokens ("Jr", "III", ...).
    pub jr: Vec<String>,
}

impl PersonName {
    /// Render in the canonical "von Last, Jr, First" form, omitting empty
    /// groups.
    pub fn display_name(&self) -> String {
        let mut parts = Vec::new();

        let family: Vec<&str> = self
            .von
            .iter()
            .chain(self.last.iter())
            .map(String::as_str)
            .collect();
        if !family.is_empty() {
            parts.push(family.join(" "));
        }
        if !self.jr.is_empty() {
            parts.push(self.jr.join(" "));
        }
        if !self.first.is_empty() {
            parts.push(self.first.join(" "));
        }

        parts.join(", ")
    }
}

/// An ordered list of authors.
///
/// The empty list is a valid state ("author field present but blank") and
/// is distinct from the field being absent, which entry assembly models as
/// `Option<&Authors>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authors(Vec<PersonName>);

impl Authors {
    /// Number of authors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list has no authors.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Author at `index`, in source order.
    pub fn get(&self, index: usize) -> Option<&PersonName> {
        self.0.get(index)
    }

    /// Iterate over the authors in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, PersonName> {
        self.0.iter()
    }

    /// View as a slice.
    pub fn as_slice(&self) -> &[PersonName] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a Authors {
    type Item = &'a PersonName;
    type IntoIter = std::slice::Iter<'a, PersonName>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<PersonName> for Authors {
    fn from_iter<I: IntoIterator<Item = PersonName>>(iter: I) -> Self {
        Authors(iter.into_iter().collect())
    }
}

/// Parse a resolved author field's text into structured authors.
///
/// The text should be the brace-preserving flattened field value, so group
/// protection still applies during splitting. Empty or whitespace-only
/// input yields an empty list, never an error; blank name slots (as in
/// `"Smith and and Jones"`) are skipped.
pub fn parse_author_list(text: &str) -> Authors {
    if text.trim().is_empty() {
        return Authors::default();
    }
    split_at_depth0(text, " and ")
        .iter()
        .filter_map(|person| parse_person(person))
        .collect()
}

fn parse_person(text: &str) -> Option<PersonName> {
    let segments: Vec<Vec<String>> = split_at_depth0(text, ",")
        .iter()
        .map(|segment| tokenize(segment))
        .collect();

    let person = if segments.len() == 1 {
        first_von_last(&segments[0])
    } else {
        // "von Last, First" or "von Last, Jr, First"; any comma beyond the
        // second folds into the First part.
        let (von, last) = von_last(&segments[0]);
        let (jr, first_segments) = if segments.len() >= 3 {
            (segments[1].clone(), &segments[2..])
        } else {
            (Vec::new(), &segments[1..])
        };
        PersonName {
            first: first_segments.concat(),
            von,
            last,
            jr,
        }
    };

    if person == PersonName::default() {
        None
    } else {
        Some(person)
    }
}

/// Classify tokens in "First von Last" order.
///
/// The von part runs from the first lowercase token to the last one,
/// interior capitalized tokens included; the trailing capitalized run
/// after it is the last name (the canonical tie-break when several
/// lowercase runs appear). Without any lowercase token the final token
/// alone is the last name.
fn first_von_last(tokens: &[String]) -> PersonName {
    if tokens.is_empty() {
        return PersonName::default();
    }

    let Some(von_start) = tokens.iter().position(|t| is_lowercase_token(t)) else {
        let split = tokens.len() - 1;
        return PersonName {
            first: cleaned(&tokens[..split]),
            last: cleaned(&tokens[split..]),
            ..PersonName::default()
        };
    };
    let von_end = tokens
        .iter()
        .rposition(|t| is_lowercase_token(t))
        .unwrap_or(von_start)
        + 1;

    // A name ending in a lowercase token still needs a last name; the
    // final token serves as it.
    let (von_end, last_start) = if von_end == tokens.len() {
        (tokens.len() - 1, tokens.len() - 1)
    } else {
        (von_end, von_end)
    };

    PersonName {
        first: cleaned(&tokens[..von_start]),
        von: cleaned(&tokens[von_start..von_end]),
        last: cleaned(&tokens[last_start..]),
        ..PersonName::default()
    }
}

/// Split a "von Last" segment into its von and last parts.
fn von_last(tokens: &[String]) -> (Vec<String>, Vec<String>) {
    if tokens.is_empty() {
        return (Vec::new(), Vec::new());
    }
    match tokens.iter().rposition(|t| is_lowercase_token(t)) {
        None => (Vec::new(), cleaned(tokens)),
        Some(end) => {
            let mut split = end + 1;
            if split == tokens.len() {
                split = tokens.len() - 1;
            }
            (cleaned(&tokens[..split]), cleaned(&tokens[split..]))
        }
    }
}

/// A token is lowercase when its first letter at brace depth 0 is.
/// Caseless tokens (digits, fully braced groups) count as capitalized.
fn is_lowercase_token(token: &str) -> bool {
    let mut depth = 0usize;
    for c in token.chars() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            c if depth == 0 && c.is_alphabetic() => return c.is_lowercase(),
            _ => {}
        }
    }
    false
}

fn cleaned(tokens: &[String]) -> Vec<String> {
    tokens.iter().map(|t| strip_group_markers(t)).collect()
}

fn strip_group_markers(token: &str) -> String {
    token.chars().filter(|&c| c != '{' && c != '}').collect()
}

/// Split on a literal separator, honoring brace depth: separators inside
/// `{...}` are protected.
fn split_at_depth0(text: &str, sep: &str) -> Vec<String> {
    let bytes = text.as_bytes();
    let sep_bytes = sep.as_bytes();
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => {
                depth += 1;
                i += 1;
            }
            b'}' => {
                depth = depth.saturating_sub(1);
                i += 1;
            }
            _ if depth == 0 && bytes[i..].starts_with(sep_bytes) => {
                parts.push(text[start..i].to_string());
                i += sep_bytes.len();
                start = i;
            }
            _ => i += 1,
        }
    }
    parts.push(text[start..].to_string());
    parts
}

/// Split tokens on depth-0 whitespace; whitespace inside `{...}` stays in
/// its token.
fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '{' => {
                depth += 1;
                current.push(c);
            }
            '}' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}
