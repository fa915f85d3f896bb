use std::fmt;
use std::path::Path;

use log::trace;
use serde::{Deserialize, Serialize};

use super::codec::parse_profile;
use super::config::ClassifierConfig;
use super::defaults::register_defaults;
use super::kind::Kind;
use super::ngram::extract;
use super::profile::Profile;
use super::store::{LanguageInfo, ProfileStore};
use crate::error::{Result, TextCatError};
use crate::io;

/// Label reported for inputs with too few n-grams.
pub const SHORT_LABEL: &str = "short";

/// Label reported when too many languages score alike.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Outcome of a classification.
///
/// `Short` and `Unknown` are successful, inconclusive results, kept apart
/// from language labels so a user profile may be called "short" or "unknown".
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "status", content = "labels", rename_all = "lowercase")]
pub enum Classification {
	/// Best matching labels, by ascending distance.
	Languages(Vec<String>),
	/// The input has fewer distinct n-grams than the configured minimum.
	Short,
	/// More candidates than the configured maximum are within the threshold.
	Unknown,
}

impl Classification {
	/// Renders the result as a label list: the languages, `["short"]` or `["unknown"]`.
	pub fn labels(&self) -> Vec<String> {
		match self {
			Classification::Languages(labels) => labels.clone(),
			Classification::Short => vec![SHORT_LABEL.to_owned()],
			Classification::Unknown => vec![UNKNOWN_LABEL.to_owned()],
		}
	}

	pub fn is_inconclusive(&self) -> bool {
		!matches!(self, Classification::Languages(_))
	}
}

impl fmt::Display for Classification {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.labels().join(","))
	}
}

/// Distance from an input to one enabled profile.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Score {
	pub label: String,
	pub kind: Kind,
	pub distance: u64,
}

/// Text classifier over a store of language profiles.
///
/// # Responsibilities
/// - Own the profile store (built-in defaults and user profiles)
/// - Bulk-enable profiles per kind
/// - Score an input against every enabled profile and select the candidates
///
/// Mutations take `&mut self` and classification takes `&self`, so the
/// borrow checker keeps them apart; a `TextCat` behind an `RwLock` or an
/// `Arc` serves parallel classifications once populated.
#[derive(Clone, Debug)]
pub struct TextCat {
	store: ProfileStore,
	config: ClassifierConfig,
}

impl TextCat {
	/// Creates a classifier with the built-in language profiles registered,
	/// all disabled.
	///
	/// # Errors
	/// Only if a built-in profile fails to parse.
	pub fn new() -> Result<Self> {
		let mut textcat = Self::empty();
		register_defaults(&mut textcat.store)?;
		Ok(textcat)
	}

	/// Creates a classifier with an empty store.
	pub fn empty() -> Self {
		Self {
			store: ProfileStore::new(),
			config: ClassifierConfig::default(),
		}
	}

	pub fn with_config(mut self, config: ClassifierConfig) -> Self {
		self.config = config;
		self
	}

	pub fn config(&self) -> &ClassifierConfig {
		&self.config
	}

	pub fn config_mut(&mut self) -> &mut ClassifierConfig {
		&mut self.config
	}

	pub fn store(&self) -> &ProfileStore {
		&self.store
	}

	/// Loads a profile file and registers it under `label`.
	///
	/// The kind comes from the file header. The profile stays disabled until
	/// the next `enable_all_*` call for its kind.
	///
	/// # Errors
	/// - [`TextCatError::Io`] if the file cannot be read
	/// - [`TextCatError::Parse`] if it is malformed (nothing is registered)
	/// - [`TextCatError::DuplicateKey`] if (label, kind) is already loaded
	pub fn add_language<P: AsRef<Path>>(&mut self, label: &str, path: P) -> Result<()> {
		let path = path.as_ref();
		let text = io::read_profile_file(path)?;
		self.add_language_str(label, &path.display().to_string(), &text)
	}

	/// Same as [`add_language`](Self::add_language) for profile text already in memory.
	pub fn add_language_str(&mut self, label: &str, source_name: &str, text: &str) -> Result<()> {
		let profile = parse_profile(source_name, text)?;
		self.add_profile(label, profile)
	}

	/// Registers an already built profile under `label`.
	pub fn add_profile(&mut self, label: &str, profile: Profile) -> Result<()> {
		self.store.add(label, profile)
	}

	/// Enables every registered `raw` profile.
	pub fn enable_all_raw(&mut self) {
		self.store.enable_kind(Kind::Raw);
	}

	/// Enables every registered `utf8` profile.
	pub fn enable_all_utf8(&mut self) {
		self.store.enable_kind(Kind::Utf8);
	}

	/// Lists every registered profile.
	pub fn languages(&self) -> Vec<LanguageInfo> {
		self.store.languages()
	}

	/// Distances from `text` to every enabled profile, best first.
	///
	/// Ties are ordered by label, then kind.
	///
	/// # Errors
	/// Returns [`TextCatError::NoEnabledProfiles`] if nothing is enabled.
	pub fn scores<T: AsRef<[u8]>>(&self, text: T) -> Result<Vec<Score>> {
		let inputs = self.extract_inputs(text.as_ref())?;
		Ok(self.score_inputs(&inputs))
	}

	/// Classifies `text`.
	///
	/// - Inputs with fewer distinct n-grams than `min_docsize` are `Short`
	/// - Candidates are the profiles within `threshold` times the best distance
	/// - More than `max_candidates` candidates is `Unknown`
	/// - Otherwise the candidate labels, by ascending distance. When both kinds
	///   are enabled and both variants of a label are candidates, they are
	///   reported as `label.raw` and `label.utf8`.
	///
	/// # Errors
	/// Returns [`TextCatError::NoEnabledProfiles`] if nothing is enabled.
	pub fn classify<T: AsRef<[u8]>>(&self, text: T) -> Result<Classification> {
		let inputs = self.extract_inputs(text.as_ref())?;

		// Too short if no extraction reaches the minimum
		if inputs.iter().all(|input| input.len() < self.config.min_docsize) {
			trace!("input too short: {:?} n-grams", inputs.iter().map(Profile::len).collect::<Vec<_>>());
			return Ok(Classification::Short);
		}

		let scores = self.score_inputs(&inputs);
		// Every enabled kind has at least one enabled profile, so there is a best score
		let Some(best) = scores.first() else {
			return Err(TextCatError::NoEnabledProfiles);
		};
		Ok(select(best.distance, &scores, &self.config, inputs.len() > 1))
	}

	/// One input profile per enabled kind, `Raw` first.
	fn extract_inputs(&self, text: &[u8]) -> Result<Vec<Profile>> {
		let kinds = self.store.enabled_kinds();
		if kinds.is_empty() {
			return Err(TextCatError::NoEnabledProfiles);
		}
		Ok(kinds.into_iter().map(|kind| extract(text, kind)).collect())
	}

	fn score_inputs(&self, inputs: &[Profile]) -> Vec<Score> {
		let mut scores: Vec<Score> = self
			.store
			.enabled()
			.filter_map(|(label, profile)| {
				// Each profile is scored against the input of its own kind
				let input = inputs.iter().find(|input| input.kind() == profile.kind())?;
				Some(Score {
					label: label.to_owned(),
					kind: profile.kind(),
					distance: input.distance(profile),
				})
			})
			.collect();

		scores.sort_by(|a, b| {
			a.distance
				.cmp(&b.distance)
				.then_with(|| a.label.cmp(&b.label))
				.then_with(|| a.kind.cmp(&b.kind))
		});
		for score in &scores {
			trace!("{} ({}): {}", score.label, score.kind, score.distance);
		}
		scores
	}
}

/// Picks the candidates from scores sorted best first, `best` being the
/// distance of the first one.
///
/// `both_kinds` tells whether raw and utf8 inputs were scored; only then do
/// labels carry a kind suffix, and only for labels with both variants selected.
fn select(best: u64, scores: &[Score], config: &ClassifierConfig, both_kinds: bool) -> Classification {
	let candidates: Vec<&Score> = scores
		.iter()
		.take_while(|score| config.within_threshold(score.distance, best))
		.collect();
	trace!("{} candidates within threshold of {best}", candidates.len());

	if candidates.len() > config.max_candidates() {
		return Classification::Unknown;
	}

	let labels = candidates
		.iter()
		.map(|candidate| {
			let twin_selected = candidates
				.iter()
				.any(|other| other.label == candidate.label && other.kind != candidate.kind);
			if both_kinds && twin_selected {
				format!("{}.{}", candidate.label, candidate.kind)
			} else {
				candidate.label.clone()
			}
		})
		.collect();

	Classification::Languages(labels)
}
