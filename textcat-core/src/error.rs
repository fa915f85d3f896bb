use std::path::PathBuf;

use thiserror::Error;

use crate::model::kind::Kind;

/// Errors raised while loading profiles, mutating the store or classifying.
///
/// Inconclusive classifications ("short", "unknown") are not errors, see
/// [`Classification`](crate::model::textcat::Classification).
#[derive(Debug, Error)]
pub enum TextCatError {
	/// A profile file could not be read.
	#[error("cannot read {}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// A profile file is malformed. `line` is 1-based, 0 for file-level problems.
	#[error("{source_name}:{line}: {message}")]
	Parse {
		source_name: String,
		line: usize,
		message: String,
	},

	/// A profile with the same label and kind is already registered.
	#[error("language {label:?} already has a {kind} profile")]
	DuplicateKey { label: String, kind: Kind },

	/// `classify` was called before any profile was enabled.
	#[error("no language profiles are enabled")]
	NoEnabledProfiles,

	/// A profile without n-grams cannot be registered.
	#[error("{kind} profile for {label:?} has no n-grams")]
	EmptyProfile { label: String, kind: Kind },

	#[error("language label must not be empty")]
	EmptyLabel,

	#[error("invalid classifier setting: {0}")]
	InvalidConfig(String),

	#[error("unknown profile kind {0:?}, expected \"raw\" or \"utf8\"")]
	InvalidKind(String),
}

impl TextCatError {
	pub(crate) fn parse(source_name: &str, line: usize, message: impl Into<String>) -> Self {
		Self::Parse {
			source_name: source_name.to_owned(),
			line,
			message: message.into(),
		}
	}
}

pub type Result<T> = std::result::Result<T, TextCatError>;
