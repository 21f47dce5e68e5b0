//! Brace-depth-aware text normalization.
//!
//! Two transforms are derived from a resolved title:
//!
//! - [`purify`] extracts the sort key: depth-0 alphanumerics survive,
//!   everything else is dropped, and braced groups are treated as
//!   special-character units with their own command-aware rules.
//! - [`change_case`] lower-cases letters selectively for title display,
//!   preserving the first character and the casing of command tokens.
//!
//! Both functions are pure and total: malformed brace nesting degrades to
//! a literal-character fallback instead of failing.

/// The thirteen accent/ligature commands with documented ASCII expansions,
/// case-matched to the command name.
const SPECIAL_COMMANDS: [(&str, &str); 13] = [
    ("i", "i"),
    ("j", "j"),
    ("oe", "oe"),
    ("OE", "OE"),
    ("ae", "ae"),
    ("AE", "AE"),
    ("aa", "aa"),
    ("AA", "AA"),
    ("o", "o"),
    ("O", "O"),
    ("l", "l"),
    ("L", "L"),
    ("ss", "ss"),
];

/// Extract the sort-key text from brace-preserving flattened field text.
///
/// At brace depth 0, alphanumeric characters are kept verbatim and
/// everything else (spaces, punctuation) is dropped. A `{...}` group is a
/// special-character unit: command tokens lose their backslash (with the
/// recognized accent/ligature commands substituted by their expansions,
/// and single-character accent commands dropped entirely), interior spaces
/// and nested brace markers are dropped, and all other content is kept
/// unmodified. Results concatenate in source order with no separators.
///
/// An unmatched `{` switches the remainder of the string to the depth-0
/// literal rule rather than failing.
pub fn purify(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '{' => match find_group_end(&chars, i) {
                Some(end) => {
                    purify_special(&chars[i + 1..end], &mut out);
                    i = end + 1;
                }
                None => {
                    tracing::warn!(
                        "unmatched '{{' in sort-key text, treating the remainder as literal"
                    );
                    for &c in &chars[i..] {
                        if c.is_alphanumeric() {
                            out.push(c);
                        }
                    }
                    break;
                }
            },
            c => {
                if c.is_alphanumeric() {
                    out.push(c);
                }
                i += 1;
            }
        }
    }
    out
}

/// Index of the `}` matching the `{` at `open`, if any.
fn find_group_end(chars: &[char], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &c) in chars.iter().enumerate().skip(open) {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Purify the content of one special-character unit.
fn purify_special(content: &[char], out: &mut String) {
    let mut i = 0;
    while i < content.len() {
        match content[i] {
            '\\' => {
                i += 1;
                if i < content.len() && content[i].is_alphabetic() {
                    let start = i;
                    while i < content.len() && content[i].is_alphabetic() {
                        i += 1;
                    }
                    let command: String = content[start..i].iter().collect();
                    match SPECIAL_COMMANDS.iter().find(|(name, _)| *name == command) {
                        Some((_, expansion)) => out.push_str(expansion),
                        // Other commands keep their letters, backslash dropped.
                        None => out.push_str(&command),
                    }
                } else if i < content.len() {
                    // Accent command like \^ or \": the control character
                    // goes away with its backslash.
                    i += 1;
                }
            }
            '{' | '}' => i += 1,
            c if c.is_whitespace() => i += 1,
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
}

/// Case-fold a title: lower-case every letter except the very first
/// character of the string.
///
/// Braces stay in the output and reset depth to 0 within a group for
/// casing purposes, so letters inside a group are lower-cased too, except
/// the letters of a backslash-command token, whose casing is
/// authoritative. Commands are only recognized inside a group; at depth 0
/// a backslash is an ordinary character.
///
/// Length is preserved (no substitution happens) and unmatched braces are
/// carried through as literal characters.
pub fn change_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    let mut in_command = false;
    for (i, c) in text.chars().enumerate() {
        match c {
            '{' => {
                depth += 1;
                in_command = false;
                out.push(c);
            }
            '}' => {
                if depth == 0 {
                    tracing::warn!(
                        "unmatched '}}' in title text, treating it as a literal character"
                    );
                } else {
                    depth -= 1;
                }
                in_command = false;
                out.push(c);
            }
            '\\' if depth >= 1 => {
                in_command = true;
                out.push(c);
            }
            c if in_command && c.is_alphabetic() => out.push(c),
            c => {
                in_command = false;
                if i == 0 || !c.is_alphabetic() {
                    out.push(c);
                } else {
                    out.extend(c.to_lowercase());
                }
            }
        }
    }
    if depth > 0 {
        tracing::warn!("unmatched '{{' in title text left open at end of string");
    }
    out
}
