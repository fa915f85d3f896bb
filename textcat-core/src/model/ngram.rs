use std::collections::HashMap;

use super::kind::Kind;
use super::profile::Profile;

/// Longest n-gram extracted, in symbols (bytes for `raw`, code points for `utf8`).
pub const MAX_NGRAM: usize = 5;

/// Word boundary marker. Separator runs in the input collapse to one boundary.
pub const BOUNDARY: u8 = b'_';

/// Builds the ranked n-gram profile of a text buffer.
///
/// - Runs of whitespace, control characters and `_` separate words
/// - Every word is padded as `_word_`
/// - All windows of 1 to [`MAX_NGRAM`] symbols of every padded word are counted
/// - `utf8` decodes lossily (invalid bytes become U+FFFD) and applies simple
///   case folding
///
/// # Notes
/// - Empty input, or input made of separators only, gives an empty profile.
pub fn extract(text: &[u8], kind: Kind) -> Profile {
	let mut counter = NGramCounter::default();
	for_each_symbol(text, kind, |symbol| match symbol {
		Some(bytes) => counter.push(bytes),
		None => counter.end_word(),
	});
	counter.end_word();

	Profile::from_counts(kind, counter.counts)
}

/// Number of symbols of an n-gram in the given kind.
///
/// Returns `None` if a `utf8` n-gram is not valid UTF-8.
pub(crate) fn symbol_count(ngram: &[u8], kind: Kind) -> Option<usize> {
	match kind {
		Kind::Raw => Some(ngram.len()),
		Kind::Utf8 => std::str::from_utf8(ngram).ok().map(|s| s.chars().count()),
	}
}

/// Calls `f` with `Some(symbol bytes)` for each symbol of `text`,
/// or `None` for each separator.
fn for_each_symbol<F>(text: &[u8], kind: Kind, mut f: F)
where
	F: FnMut(Option<&[u8]>),
{
	match kind {
		Kind::Raw => {
			for byte in text {
				if is_raw_separator(*byte) {
					f(None);
				} else {
					f(Some(std::slice::from_ref(byte)));
				}
			}
		}
		Kind::Utf8 => {
			let mut buf = [0u8; 4];
			for c in String::from_utf8_lossy(text).chars() {
				if is_utf8_separator(c) {
					f(None);
				} else {
					f(Some(fold_case(c).encode_utf8(&mut buf).as_bytes()));
				}
			}
		}
	}
}

fn is_raw_separator(byte: u8) -> bool {
	byte == BOUNDARY || byte.is_ascii_whitespace() || byte.is_ascii_control()
}

fn is_utf8_separator(c: char) -> bool {
	c == BOUNDARY as char || c.is_ascii_whitespace() || c.is_control()
}

/// Simple case folds that differ from the single code point lowercase mapping
/// (the `C` and `S` entries of CaseFolding.txt), sorted by source.
const FOLD_EXCEPTIONS: &[(char, char)] = &[
	('\u{00B5}', '\u{03BC}'),
	('\u{017F}', 's'),
	('\u{0345}', '\u{03B9}'),
	('\u{03C2}', '\u{03C3}'),
	('\u{03D0}', '\u{03B2}'),
	('\u{03D1}', '\u{03B8}'),
	('\u{03D5}', '\u{03C6}'),
	('\u{03D6}', '\u{03C0}'),
	('\u{03F0}', '\u{03BA}'),
	('\u{03F1}', '\u{03C1}'),
	('\u{03F5}', '\u{03B5}'),
	('\u{1C80}', '\u{0432}'),
	('\u{1C81}', '\u{0434}'),
	('\u{1C82}', '\u{043E}'),
	('\u{1C83}', '\u{0441}'),
	('\u{1C84}', '\u{0442}'),
	('\u{1C85}', '\u{0442}'),
	('\u{1C86}', '\u{044A}'),
	('\u{1C87}', '\u{0463}'),
	('\u{1C88}', '\u{A64B}'),
	('\u{1E9B}', '\u{1E61}'),
	('\u{1FBE}', '\u{03B9}'),
	('\u{1FD3}', '\u{0390}'),
	('\u{1FE3}', '\u{03B0}'),
	('\u{FB05}', '\u{FB06}'),
];

/// Unicode simple case folding of one code point.
///
/// Cherokee folds to the capital letters, everything else to the lowercase
/// mapping when that is a single code point.
fn fold_case(c: char) -> char {
	if let Ok(index) = FOLD_EXCEPTIONS.binary_search_by_key(&c, |&(from, _)| from) {
		return FOLD_EXCEPTIONS[index].1;
	}
	match c {
		'\u{13A0}'..='\u{13F5}' => c,
		'\u{13F8}'..='\u{13FD}' => char::from_u32(c as u32 - 8).unwrap_or(c),
		'\u{AB70}'..='\u{ABBF}' => char::from_u32(c as u32 - 0xAB70 + 0x13A0).unwrap_or(c),
		_ => {
			let mut lower = c.to_lowercase();
			match (lower.next(), lower.next()) {
				(Some(l), None) => l,
				_ => c,
			}
		}
	}
}

/// Accumulates n-gram counts word by word.
///
/// The current padded word is kept as bytes plus the byte offset of each
/// symbol, so that windows are symbol-aligned for both kinds.
#[derive(Default)]
struct NGramCounter {
	word: Vec<u8>,
	offsets: Vec<usize>,
	counts: HashMap<Vec<u8>, usize>,
}

impl NGramCounter {
	fn push(&mut self, symbol: &[u8]) {
		if self.word.is_empty() {
			self.push_symbol(&[BOUNDARY]);
		}
		self.push_symbol(symbol);
	}

	fn push_symbol(&mut self, symbol: &[u8]) {
		self.offsets.push(self.word.len());
		self.word.extend_from_slice(symbol);
	}

	/// Closes the current word (if any) and counts all its n-grams.
	fn end_word(&mut self) {
		if self.word.is_empty() {
			return;
		}
		self.push_symbol(&[BOUNDARY]);
		// End offset of the last symbol
		self.offsets.push(self.word.len());

		let symbols = self.offsets.len() - 1;
		for n in 1..=MAX_NGRAM.min(symbols) {
			for start in 0..=symbols - n {
				let ngram = &self.word[self.offsets[start]..self.offsets[start + n]];
				match self.counts.get_mut(ngram) {
					Some(count) => *count += 1,
					None => {
						self.counts.insert(ngram.to_vec(), 1);
					}
				}
			}
		}

		self.word.clear();
		self.offsets.clear();
	}
}
