//! Field-value model and macro resolution for bibliographic entries.
//!
//! This crate is the leaf layer of bibnorm. It takes the raw, tokenized
//! field values an external lexer produces and gives them structure:
//!
//! - [`FieldValue`]: the recursive grammar of a field's content (literal
//!   text, braced groups, quoted strings, concatenations, macro
//!   references, numeric literals), with flattening back to text in both
//!   brace-preserving and plain forms.
//! - [`MacroTable`] + [`resolve`]: `@string` named-string definitions and
//!   the rewrite that replaces every macro reference with its definition.
//!
//! Author parsing, text normalization, and entry assembly build on top of
//! this crate in `bibnorm-entry`.
//!
//! # Example
//!
//! ```rust
//! use bibnorm_field::{FieldValue, MacroTable, resolve};
//!
//! let mut macros = MacroTable::new();
//! macros.insert("ieee", FieldValue::Text("IEEE".to_string()));
//!
//! let raw = FieldValue::Concat(vec![
//!     FieldValue::MacroRef("ieee".to_string()),
//!     FieldValue::Text(" Transactions".to_string()),
//! ]);
//! let resolved = resolve(&raw, &macros).unwrap();
//! assert_eq!(resolved.flatten_plain(), "IEEE Transactions");
//! ```

pub mod error;
pub mod resolve;
pub mod value;

// Re-export main types
pub use error::{Error, Result};
pub use resolve::{MacroTable, resolve};
pub use value::FieldValue;
