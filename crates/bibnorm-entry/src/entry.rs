//! Entry assembly: from raw field values to an immutable [`BibEntry`].
//!
//! Assembly resolves macros in every field, parses the author list, and
//! eagerly computes the two derived strings (sort key and normalized
//! title). Which fields get extra treatment is decided once, through
//! [`FieldSemantics`], instead of string comparisons scattered through the
//! field loop. Mandatory-field validation per entry type is an external
//! collaborator's job and does not happen here.

use crate::error::{Error, Result};
use crate::names::{Authors, parse_author_list};
use crate::normalize::{change_case, purify};
use bibnorm_field::{FieldValue, MacroTable, resolve};
use hashlink::LinkedHashMap;

/// Extra semantics a field name can carry during assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldSemantics {
    /// Parsed into structured [`Authors`].
    AuthorList,
    /// Source of the derived sort key and normalized title.
    Title,
    /// Stored resolved, nothing derived.
    General,
}

impl FieldSemantics {
    fn for_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("author") {
            FieldSemantics::AuthorList
        } else if name.eq_ignore_ascii_case("title") {
            FieldSemantics::Title
        } else {
            FieldSemantics::General
        }
    }
}

/// An assembled bibliographic entry.
///
/// Immutable after assembly: every field is macro-free, the author list is
/// structured, and the derived strings are computed. Field insertion order
/// is preserved. Citation-key uniqueness is enforced by the owning
/// collection, not here.
#[derive(Debug, Clone)]
pub struct BibEntry {
    entry_type: String,
    id: String,
    fields: LinkedHashMap<String, FieldValue>,
    authors: Option<Authors>,
    sort_key: String,
    normalized_title: String,
}

impl BibEntry {
    /// Entry type tag, e.g. `"article"`.
    pub fn entry_type(&self) -> &str {
        &self.entry_type
    }

    /// Citation key.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The resolved value of a field.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// The display form of a field (plain-flattened, numbers in decimal).
    pub fn get_as_string(&self, field: &str) -> Option<String> {
        self.get(field).map(FieldValue::as_display)
    }

    /// Structured authors, or `None` when the entry has no author field.
    ///
    /// An author field that is present but blank yields `Some` of an empty
    /// list, which is a distinct state from absence.
    pub fn authors(&self) -> Option<&Authors> {
        self.authors.as_ref()
    }

    /// The derived sort key; empty when the entry has no title.
    pub fn sort_key(&self) -> &str {
        &self.sort_key
    }

    /// The case-folded title; empty when the entry has no title.
    pub fn normalized_title(&self) -> &str {
        &self.normalized_title
    }

    /// Iterate over resolved fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of fields.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    fn empty(entry_type: String, id: String) -> Self {
        BibEntry {
            entry_type,
            id,
            fields: LinkedHashMap::new(),
            authors: None,
            sort_key: String::new(),
            normalized_title: String::new(),
        }
    }

    /// Store a resolved field and compute whatever it derives.
    fn accept(&mut self, name: String, resolved: FieldValue) {
        match FieldSemantics::for_name(&name) {
            FieldSemantics::AuthorList => {
                self.authors = Some(parse_author_list(&resolved.flatten_braced()));
            }
            FieldSemantics::Title => {
                let title = resolved.flatten_braced();
                self.normalized_title = change_case(&title);
                self.sort_key = purify(&title);
            }
            FieldSemantics::General => {}
        }
        self.fields.insert(name, resolved);
    }
}

/// Assemble an entry from raw field values and a macro table.
///
/// Every field is macro-resolved; `author` is additionally parsed into
/// [`Authors`] and `title` feeds the derived sort key and normalized
/// title. Fails on the first field whose resolution fails, with the entry
/// id and field name in the error.
pub fn assemble(
    entry_type: impl Into<String>,
    id: impl Into<String>,
    raw_fields: Vec<(String, FieldValue)>,
    macros: &MacroTable,
) -> Result<BibEntry> {
    let mut entry = BibEntry::empty(entry_type.into(), id.into());
    for (name, raw) in raw_fields {
        let resolved =
            resolve(&raw, macros).map_err(|source| Error::in_field(&entry.id, &name, source))?;
        entry.accept(name, resolved);
    }
    tracing::debug!(entry_id = %entry.id, fields = entry.fields.len(), "assembled entry");
    Ok(entry)
}

/// Assemble with per-field isolation: fields that fail to resolve are
/// skipped and reported, the rest of the entry still assembles.
pub fn assemble_lossy(
    entry_type: impl Into<String>,
    id: impl Into<String>,
    raw_fields: Vec<(String, FieldValue)>,
    macros: &MacroTable,
) -> (BibEntry, Vec<Error>) {
    let mut entry = BibEntry::empty(entry_type.into(), id.into());
    let mut errors = Vec::new();
    for (name, raw) in raw_fields {
        match resolve(&raw, macros) {
            Ok(resolved) => entry.accept(name, resolved),
            Err(source) => {
                tracing::warn!(entry_id = %entry.id, field = %name, error = %source, "skipping unresolvable field");
                errors.push(Error::in_field(&entry.id, &name, source));
            }
        }
    }
    (entry, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    fn field(name: &str, value: FieldValue) -> (String, FieldValue) {
        (name.to_string(), value)
    }

    #[test]
    fn test_assemble_computes_derived_strings() {
        let entry = assemble(
            "article",
            "lamport1986",
            vec![
                field("author", text("Leslie Lamport")),
                field(
                    "title",
                    FieldValue::Quoted(vec![
                        text("The "),
                        FieldValue::Braced(vec![text("\\LaTeX")]),
                        text(" Document Preparation System"),
                    ]),
                ),
                field("year", FieldValue::Number(1986)),
            ],
            &MacroTable::new(),
        )
        .unwrap();

        assert_eq!(entry.entry_type(), "article");
        assert_eq!(entry.id(), "lamport1986");
        assert_eq!(entry.sort_key(), "TheLaTeXDocumentPreparationSystem");
        assert_eq!(
            entry.normalized_title(),
            "The {\\LaTeX} document preparation system"
        );

        let authors = entry.authors().unwrap();
        assert_eq!(authors.len(), 1);
        assert_eq!(authors.get(0).unwrap().last, vec!["Lamport"]);
        assert_eq!(entry.get_as_string("year").as_deref(), Some("1986"));
    }

    #[test]
    fn test_assemble_resolves_macros_in_fields() {
        let mut macros = MacroTable::new();
        macros.insert("ieee", text("IEEE"));

        let entry = assemble(
            "article",
            "x1",
            vec![field(
                "journal",
                FieldValue::Concat(vec![
                    FieldValue::MacroRef("ieee".to_string()),
                    text(" Transactions on Software Engineering"),
                ]),
            )],
            &macros,
        )
        .unwrap();

        assert_eq!(
            entry.get_as_string("journal").as_deref(),
            Some("IEEE Transactions on Software Engineering")
        );
        assert!(entry.get("journal").unwrap().is_resolved());
    }

    #[test]
    fn test_missing_title_leaves_derived_strings_empty() {
        let entry = assemble(
            "misc",
            "untitled",
            vec![field("note", text("no title here"))],
            &MacroTable::new(),
        )
        .unwrap();

        assert_eq!(entry.sort_key(), "");
        assert_eq!(entry.normalized_title(), "");
        assert!(entry.authors().is_none());
    }

    #[test]
    fn test_blank_author_field_is_empty_not_absent() {
        let entry = assemble(
            "misc",
            "anon",
            vec![field("author", text("  "))],
            &MacroTable::new(),
        )
        .unwrap();

        let authors = entry.authors().expect("field present, list should exist");
        assert!(authors.is_empty());
    }

    #[test]
    fn test_assemble_error_names_entry_and_field() {
        let result = assemble(
            "article",
            "smith2020",
            vec![field("journal", FieldValue::MacroRef("acm".to_string()))],
            &MacroTable::new(),
        );

        let err = result.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("smith2020"), "got: {message}");
        assert!(message.contains("journal"), "got: {message}");
        assert!(message.contains("acm"), "got: {message}");
    }

    #[test]
    fn test_assemble_lossy_keeps_other_fields() {
        let (entry, errors) = assemble_lossy(
            "article",
            "partial",
            vec![
                field("journal", FieldValue::MacroRef("missing".to_string())),
                field("title", text("Still Here")),
            ],
            &MacroTable::new(),
        );

        assert_eq!(errors.len(), 1);
        assert!(entry.get("journal").is_none());
        assert_eq!(entry.normalized_title(), "Still here");
        assert_eq!(entry.sort_key(), "StillHere");
    }

    #[test]
    fn test_field_order_is_preserved() {
        let entry = assemble(
            "book",
            "ordered",
            vec![
                field("year", FieldValue::Number(2001)),
                field("title", text("Z")),
                field("publisher", text("P")),
            ],
            &MacroTable::new(),
        )
        .unwrap();

        let names: Vec<&str> = entry.fields().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["year", "title", "publisher"]);
    }

    #[test]
    fn test_author_field_name_is_case_insensitive() {
        let entry = assemble(
            "misc",
            "caps",
            vec![field("Author", text("John Smith"))],
            &MacroTable::new(),
        )
        .unwrap();

        assert!(entry.authors().is_some());
    }
}
