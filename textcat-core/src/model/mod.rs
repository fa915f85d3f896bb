//! Top-level module for the text categorization engine.
//!
//! This module provides:
//! - The profile kinds (`Kind`)
//! - N-gram extraction from input text (`ngram`)
//! - Ranked n-gram profiles and their distance (`Profile`)
//! - The profile file format (`codec`)
//! - The store of language profiles (`ProfileStore`)
//! - Classification settings (`ClassifierConfig`)
//! - The classifier itself (`TextCat`)

/// Closed set of profile kinds: `raw` bytes or `utf8` code points.
pub mod kind;

/// Extraction of a ranked profile from a text buffer.
///
/// One code path for both kinds: the kind only decides how the buffer
/// is split into symbols.
pub mod ngram;

/// Immutable ranked n-gram list with rank lookup and out-of-place distance.
pub mod profile;

/// Reader and writer for the plain-text profile file format.
pub mod codec;

/// Labelled profiles with an enabled flag, keyed by (label, kind).
pub mod store;

/// Thresholds used by the candidate selection policy.
pub mod config;

/// Classifier: scoring against enabled profiles and candidate selection.
pub mod textcat;

/// Default language profiles compiled into the crate.
///
/// Not exposed: registered through `TextCat::new`.
mod defaults;
