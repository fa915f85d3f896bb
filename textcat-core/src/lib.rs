//! Language identification by character n-gram profiles.
//!
//! This crate provides a text categorization engine including:
//! - N-gram profile extraction from raw bytes or UTF-8 text
//! - A store of language profiles with `raw` and `utf8` variants
//! - Out-of-place rank distance scoring and candidate selection
//! - A parser and writer for the plain-text profile file format
//! - A built-in library of default language profiles
//!
//! The entry point is [`model::textcat::TextCat`]:
//!
//! ```
//! use textcat_core::model::textcat::TextCat;
//!
//! let mut textcat = TextCat::new()?;
//! textcat.enable_all_utf8();
//! let result = textcat.classify("The quick brown fox jumps over the lazy dog.")?;
//! assert_eq!(result.labels(), vec!["english"]);
//! # Ok::<(), textcat_core::error::TextCatError>(())
//! ```

/// Profiles, extraction, the profile store and the classifier.
pub mod model;

/// Error type shared by every fallible operation of the crate.
pub mod error;

/// File helpers (profile loading, label derivation, directory listing).
pub mod io;
