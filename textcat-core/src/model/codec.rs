//! Plain-text profile file format.
//!
//! ```text
//! # optional comments
//! kind:utf8
//! _	0
//! e	1
//! _t	2
//! ```
//!
//! The first non-blank, non-comment line is the `kind:` header. Every other
//! line is `<ngram>\t<rank>`, ranks ascending from 0 without gaps.
//! N-grams escape a backslash as `\\` and arbitrary bytes as `\xHH`; a
//! leading `#` is written `\x23` so it is not read back as a comment.

use std::collections::HashSet;
use std::io::Write;

use super::kind::Kind;
use super::ngram::{MAX_NGRAM, symbol_count};
use super::profile::{MAX_PROFILE, Profile};
use crate::error::{Result, TextCatError};

const HEADER_PREFIX: &str = "kind:";

/// Parses a profile file.
///
/// `source_name` is only used in error messages.
///
/// # Errors
/// Returns [`TextCatError::Parse`] on a missing or invalid header, a rank out
/// of sequence, a duplicate n-gram, an invalid escape, an n-gram of the wrong
/// length, a malformed line, or a file with no entries or too many.
pub fn parse_profile(source_name: &str, text: &str) -> Result<Profile> {
	let mut kind: Option<Kind> = None;
	let mut ngrams: Vec<Box<[u8]>> = Vec::new();
	let mut seen: HashSet<Box<[u8]>> = HashSet::new();

	let text = text.strip_prefix('\u{feff}').unwrap_or(text);
	for (index, line) in text.lines().enumerate() {
		let line_no = index + 1;
		let error = |message: String| TextCatError::parse(source_name, line_no, message);

		if line.trim().is_empty() || line.starts_with('#') {
			continue;
		}

		let Some(kind) = kind else {
			kind = Some(parse_header(line).ok_or_else(|| error(format!("expected `kind:raw` or `kind:utf8` header, got {line:?}")))?);
			continue;
		};

		let (field, rank) = line
			.split_once('\t')
			.ok_or_else(|| error("expected `<ngram><TAB><rank>`".to_owned()))?;
		let rank: usize = rank
			.parse()
			.map_err(|_| error(format!("invalid rank {rank:?}")))?;
		if rank != ngrams.len() {
			return Err(error(format!("rank {rank} out of sequence, expected {}", ngrams.len())));
		}
		if rank >= MAX_PROFILE {
			return Err(error(format!("profile has more than {MAX_PROFILE} entries")));
		}

		let ngram = unescape(field).map_err(&error)?;
		match symbol_count(&ngram, kind) {
			None => return Err(error(format!("n-gram {field:?} is not valid UTF-8"))),
			Some(n) if n == 0 || n > MAX_NGRAM => {
				return Err(error(format!("n-gram {field:?} has {n} symbols, expected 1 to {MAX_NGRAM}")));
			}
			Some(_) => (),
		}

		let ngram = ngram.into_boxed_slice();
		if !seen.insert(ngram.clone()) {
			return Err(error(format!("duplicate n-gram {field:?}")));
		}
		ngrams.push(ngram);
	}

	let kind = kind.ok_or_else(|| TextCatError::parse(source_name, 0, "missing `kind:` header"))?;
	if ngrams.is_empty() {
		return Err(TextCatError::parse(source_name, 0, "profile has no entries"));
	}

	Ok(Profile::from_ranked(kind, ngrams))
}

fn parse_header(line: &str) -> Option<Kind> {
	line.trim().strip_prefix(HEADER_PREFIX)?.parse().ok()
}

/// Decodes the escapes of an n-gram field.
fn unescape(field: &str) -> std::result::Result<Vec<u8>, String> {
	let bytes = field.as_bytes();
	let mut out = Vec::with_capacity(bytes.len());
	let mut i = 0;

	while i < bytes.len() {
		if bytes[i] != b'\\' {
			out.push(bytes[i]);
			i += 1;
			continue;
		}
		match bytes.get(i + 1) {
			Some(b'\\') => {
				out.push(b'\\');
				i += 2;
			}
			Some(b'x') => {
				let hex = bytes
					.get(i + 2..i + 4)
					.filter(|h| h.iter().all(u8::is_ascii_hexdigit))
					.ok_or_else(|| format!("invalid `\\x` escape in {field:?}"))?;
				// Both digits are ASCII hex
				let value = (hex_value(hex[0]) << 4) | hex_value(hex[1]);
				out.push(value);
				i += 4;
			}
			_ => return Err(format!("invalid escape in {field:?}")),
		}
	}

	if out.is_empty() {
		return Err("empty n-gram".to_owned());
	}
	Ok(out)
}

fn hex_value(digit: u8) -> u8 {
	match digit {
		b'0'..=b'9' => digit - b'0',
		b'a'..=b'f' => digit - b'a' + 10,
		_ => digit - b'A' + 10,
	}
}

/// Encodes an n-gram for the profile file.
///
/// - `raw`: every byte outside printable ASCII becomes `\xHH`
/// - `utf8`: non-ASCII code points are written as is
pub(crate) fn escape(ngram: &[u8], kind: Kind) -> String {
	let mut out = String::with_capacity(ngram.len());
	match kind {
		Kind::Raw => ngram.iter().for_each(|b| push_escaped_byte(&mut out, *b)),
		Kind::Utf8 => {
			for c in String::from_utf8_lossy(ngram).chars() {
				if c.is_ascii() {
					push_escaped_byte(&mut out, c as u8);
				} else {
					out.push(c);
				}
			}
		}
	}
	if out.starts_with('#') {
		out.replace_range(..1, "\\x23");
	}
	out
}

fn push_escaped_byte(out: &mut String, byte: u8) {
	match byte {
		b'\\' => out.push_str("\\\\"),
		0x21..=0x7e => out.push(byte as char),
		_ => out.push_str(&format!("\\x{byte:02x}")),
	}
}

impl Profile {
	/// Serializes the profile in the profile file format.
	///
	/// Each line of `comment` becomes a `# ` comment line before the header.
	/// Parsing the output and serializing again gives the same text.
	pub fn to_profile_string(&self, comment: Option<&str>) -> String {
		let mut out = String::new();
		if let Some(comment) = comment {
			for line in comment.lines() {
				out.push_str("# ");
				out.push_str(line);
				out.push('\n');
			}
		}

		out.push_str(HEADER_PREFIX);
		out.push_str(self.kind().as_str());
		out.push('\n');

		for (ngram, rank) in self.iter() {
			out.push_str(&escape(ngram, self.kind()));
			out.push('\t');
			out.push_str(&rank.to_string());
			out.push('\n');
		}
		out
	}

	/// Writes the profile file format to `writer`.
	pub fn write_to<W: Write>(&self, writer: &mut W, comment: Option<&str>) -> std::io::Result<()> {
		writer.write_all(self.to_profile_string(comment).as_bytes())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::ngram::extract;

	fn parse_err(text: &str) -> (usize, String) {
		match parse_profile("test.lm", text) {
			Err(TextCatError::Parse { line, message, .. }) => (line, message),
			other => panic!("expected parse error, got {other:?}"),
		}
	}

	#[test]
	fn parses_header_comments_and_entries() {
		let text = "# sample\n\n  kind:utf8  \n_\t0\n# inside\ne\t1\r\n\n_t\t2\n";
		let p = parse_profile("test.lm", text).unwrap();
		assert_eq!(p.kind(), Kind::Utf8);
		assert_eq!(p.len(), 3);
		assert_eq!(p.rank(b"_t"), Some(2));
		assert_eq!(p.rank(b"e"), Some(1));
	}

	#[test]
	fn leading_byte_order_mark_is_ignored() {
		let p = parse_profile("bom.lm", "\u{feff}kind:raw\n_\t0\na\t1\n").unwrap();
		assert_eq!(p.kind(), Kind::Raw);
		assert_eq!(p.len(), 2);

		let p = parse_profile("bom.lm", "\u{feff}# comment\nkind:utf8\n_\t0\n").unwrap();
		assert_eq!(p.kind(), Kind::Utf8);
	}

	#[test]
	fn missing_header() {
		assert_eq!(parse_err("# only comments\n").0, 0);
		let (line, message) = parse_err("_\t0\n");
		assert_eq!(line, 1);
		assert!(message.contains("header"));
		assert_eq!(parse_err("kind:latin1\n_\t0\n").0, 1);
	}

	#[test]
	fn no_entries() {
		let (line, message) = parse_err("kind:raw\n");
		assert_eq!(line, 0);
		assert!(message.contains("no entries"));
	}

	#[test]
	fn rank_sequence_must_start_at_zero_without_gaps() {
		assert_eq!(parse_err("kind:raw\na\t1\n").0, 2);
		assert_eq!(parse_err("kind:raw\na\t0\nb\t2\n").0, 3);
		assert_eq!(parse_err("kind:raw\na\t0\nb\t0\n").0, 3);
	}

	#[test]
	fn malformed_lines() {
		assert_eq!(parse_err("kind:raw\na 0\n").0, 2);
		assert_eq!(parse_err("kind:raw\na\t-1\n").0, 2);
		assert_eq!(parse_err("kind:raw\na\t0\t1\n").0, 2);
		assert_eq!(parse_err("kind:raw\n\t0\n").0, 2);
		assert_eq!(parse_err("kind:raw\na\\q\t0\n").0, 2);
		assert_eq!(parse_err("kind:raw\na\\x4\t0\n").0, 2);
		assert_eq!(parse_err("kind:raw\na\\x+f\t0\n").0, 2);
	}

	#[test]
	fn duplicate_ngram() {
		let (line, message) = parse_err("kind:utf8\nab\t0\nab\t1\n");
		assert_eq!(line, 3);
		assert!(message.contains("duplicate"));
		// escapes decode before the duplicate check
		assert_eq!(parse_err("kind:raw\nA\t0\n\\x41\t1\n").0, 3);
	}

	#[test]
	fn ngram_length_is_checked_in_symbols() {
		assert_eq!(parse_err("kind:raw\nabcdef\t0\n").0, 2);
		// five code points, ten bytes
		let p = parse_profile("test.lm", "kind:utf8\nßßßßß\t0\n").unwrap();
		assert_eq!(p.len(), 1);
		assert_eq!(parse_err("kind:raw\nßßß\t0\n").0, 2);
	}

	#[test]
	fn utf8_profile_rejects_invalid_bytes() {
		let (line, message) = parse_err("kind:utf8\n\\xff\t0\n");
		assert_eq!(line, 2);
		assert!(message.contains("UTF-8"));
		assert!(parse_profile("test.lm", "kind:raw\n\\xff\t0\n").is_ok());
	}

	#[test]
	fn too_many_entries() {
		let mut text = String::from("kind:raw\n");
		for rank in 0..=MAX_PROFILE {
			text.push_str(&format!("g{rank}\t{rank}\n"));
		}
		assert_eq!(parse_err(&text).0, MAX_PROFILE + 2);
	}

	#[test]
	fn escapes() {
		assert_eq!(escape(b"a\\b", Kind::Raw), "a\\\\b");
		assert_eq!(escape(&[b'_', 0xc3, 0xa9], Kind::Raw), "_\\xc3\\xa9");
		assert_eq!(escape("_é".as_bytes(), Kind::Utf8), "_é");
		assert_eq!(escape(b"#a", Kind::Utf8), "\\x23a");
		assert_eq!(escape(b"a#", Kind::Raw), "a#");
		assert_eq!(unescape("\\x23a\\\\\\xC3\\xa9").unwrap(), b"#a\\\xc3\xa9");
	}

	#[test]
	fn leading_hash_survives_round_trip() {
		let p = extract(b"#tag", Kind::Utf8);
		let text = p.to_profile_string(None);
		assert!(text.lines().any(|l| l.starts_with("\\x23")));
		assert_eq!(parse_profile("test.lm", &text).unwrap(), p);
	}

	#[test]
	fn serialization_round_trips_byte_identical() {
		let samples: [(&[u8], Kind); 3] = [
			("Un été à Paris, naïve façade\\".as_bytes(), Kind::Utf8),
			("Un été à Paris, naïve façade\\".as_bytes(), Kind::Raw),
			(b"bytes \xff\xfe and \x80 more", Kind::Raw),
		];
		for (text, kind) in samples {
			let profile = extract(text, kind);
			let written = profile.to_profile_string(Some("sample\nprofile"));
			assert!(written.starts_with("# sample\n# profile\nkind:"));

			let parsed = parse_profile("sample", &written).unwrap();
			assert_eq!(parsed, profile);
			assert_eq!(parsed.to_profile_string(Some("sample\nprofile")), written);
		}
	}

	#[test]
	fn write_to_matches_string() {
		let profile = extract(b"hello", Kind::Raw);
		let mut buf = Vec::new();
		profile.write_to(&mut buf, None).unwrap();
		assert_eq!(String::from_utf8(buf).unwrap(), profile.to_profile_string(None));
	}
}
