use std::collections::HashMap;

use super::kind::Kind;

/// Maximum number of n-grams kept in a profile.
///
/// Also the penalty charged for an input n-gram missing from a reference profile.
pub const MAX_PROFILE: usize = 400;

/// Ranked list of the most frequent n-grams of a text.
///
/// # Invariants
/// - Ranks are 0-based and contiguous: the n-gram at index `i` has rank `i`
/// - No n-gram appears twice
/// - At most [`MAX_PROFILE`] entries
///
/// Profiles are immutable once built and can be shared freely between threads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Profile {
	kind: Kind,
	/// N-grams in rank order
	ngrams: Vec<Box<[u8]>>,
	/// Reverse index: n-gram → rank
	ranks: HashMap<Box<[u8]>, usize>,
}

impl Profile {
	/// Ranks counted n-grams by descending count, ties broken by byte order,
	/// and keeps the first [`MAX_PROFILE`].
	pub(crate) fn from_counts(kind: Kind, counts: HashMap<Vec<u8>, usize>) -> Self {
		let mut entries: Vec<(Vec<u8>, usize)> = counts.into_iter().collect();
		entries.sort_unstable_by(|(a, count_a), (b, count_b)| count_b.cmp(count_a).then_with(|| a.cmp(b)));
		entries.truncate(MAX_PROFILE);

		Self::from_ranked(kind, entries.into_iter().map(|(gram, _)| gram.into_boxed_slice()).collect())
	}

	/// Builds a profile from n-grams already in rank order.
	///
	/// Callers guarantee uniqueness and the size limit.
	pub(crate) fn from_ranked(kind: Kind, ngrams: Vec<Box<[u8]>>) -> Self {
		debug_assert!(ngrams.len() <= MAX_PROFILE);
		let ranks = ngrams
			.iter()
			.enumerate()
			.map(|(rank, gram)| (gram.clone(), rank))
			.collect::<HashMap<_, _>>();
		debug_assert_eq!(ranks.len(), ngrams.len());

		Self { kind, ngrams, ranks }
	}

	pub fn kind(&self) -> Kind {
		self.kind
	}

	pub fn len(&self) -> usize {
		self.ngrams.len()
	}

	pub fn is_empty(&self) -> bool {
		self.ngrams.is_empty()
	}

	/// Returns the rank of an n-gram, or `None` if it is not in the profile.
	pub fn rank(&self, ngram: &[u8]) -> Option<usize> {
		self.ranks.get(ngram).copied()
	}

	/// Iterates over `(n-gram, rank)` pairs in rank order.
	pub fn iter(&self) -> impl Iterator<Item = (&[u8], usize)> {
		self.ngrams.iter().enumerate().map(|(rank, gram)| (&**gram, rank))
	}

	/// Out-of-place distance from this (input) profile to a reference profile.
	///
	/// Sums, over every n-gram of `self`, the absolute rank difference with
	/// `reference`, or [`MAX_PROFILE`] when the n-gram is missing there.
	/// Only n-grams of `self` contribute.
	pub fn distance(&self, reference: &Profile) -> u64 {
		self.iter()
			.map(|(gram, rank)| match reference.rank(gram) {
				Some(other) => rank.abs_diff(other) as u64,
				None => MAX_PROFILE as u64,
			})
			.sum()
	}
}
