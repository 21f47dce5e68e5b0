//! Entry assembly and text normalization for bibliographic entries.
//!
//! This crate builds on [`bibnorm_field`] and produces the final,
//! immutable [`BibEntry`] record from a raw field map and a macro table:
//!
//! - [`parse_author_list`]: the `author` field's text as structured
//!   [`PersonName`]s (First / von / Last / Jr decomposition).
//! - [`purify`] and [`change_case`]: the brace-depth-aware transforms
//!   deriving an entry's sort key and case-folded title.
//! - [`assemble`] / [`assemble_lossy`]: macro resolution over every field
//!   plus the derived computations, in one pass.
//!
//! # Example
//!
//! ```rust
//! use bibnorm_entry::{FieldValue, MacroTable, assemble};
//!
//! let entry = assemble(
//!     "article",
//!     "fontaine1668",
//!     vec![
//!         ("author".to_string(), FieldValue::Text("Jean de La Fontaine".to_string())),
//!         ("title".to_string(), FieldValue::Text("Fables Choisies".to_string())),
//!     ],
//!     &MacroTable::new(),
//! )
//! .unwrap();
//!
//! assert_eq!(entry.sort_key(), "FablesChoisies");
//! assert_eq!(entry.normalized_title(), "Fables choisies");
//! assert_eq!(entry.authors().unwrap().get(0).unwrap().von, vec!["de"]);
//! ```

pub mod entry;
pub mod error;
pub mod names;
pub mod normalize;

// Re-export main types
pub use entry::{BibEntry, assemble, assemble_lossy};
pub use error::{Error, Result};
pub use names::{Authors, PersonName, parse_author_list};
pub use normalize::{change_case, purify};

// The field layer's types appear throughout this crate's API.
pub use bibnorm_field::{FieldValue, MacroTable};
