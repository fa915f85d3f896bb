use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TextCatError;

/// Alphabet of a profile.
///
/// - `Raw`: n-grams are byte sequences, no case folding
/// - `Utf8`: n-grams are code point sequences, input decoded lossily and lowercased
///
/// `Raw` sorts before `Utf8`; distance ties between the two variants of a
/// label resolve in that order.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
	Raw,
	Utf8,
}

impl Kind {
	pub const ALL: [Kind; 2] = [Kind::Raw, Kind::Utf8];

	pub fn as_str(&self) -> &'static str {
		match self {
			Kind::Raw => "raw",
			Kind::Utf8 => "utf8",
		}
	}
}

impl fmt::Display for Kind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Kind {
	type Err = TextCatError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim() {
			"raw" => Ok(Kind::Raw),
			"utf8" => Ok(Kind::Utf8),
			other => Err(TextCatError::InvalidKind(other.to_owned())),
		}
	}
}
