use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use super::kind::Kind;
use super::profile::Profile;
use crate::error::{Result, TextCatError};

/// A registered profile and its enabled flag.
#[derive(Clone, Debug)]
pub struct StoredProfile {
	profile: Profile,
	enabled: bool,
}

impl StoredProfile {
	pub fn profile(&self) -> &Profile {
		&self.profile
	}

	pub fn is_enabled(&self) -> bool {
		self.enabled
	}
}

/// Summary of a store entry, for listings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LanguageInfo {
	pub label: String,
	pub kind: Kind,
	pub enabled: bool,
	pub size: usize,
}

/// Language profiles keyed by (label, kind).
///
/// # Invariants
/// - Keys are unique; the `raw` and `utf8` variants of a label are two entries
/// - Every entry has a non-empty profile
/// - Entries are never removed and flags only go from disabled to enabled
///
/// Iteration order is the key order, so scoring is deterministic.
#[derive(Clone, Debug, Default)]
pub struct ProfileStore {
	entries: BTreeMap<(String, Kind), StoredProfile>,
}

impl ProfileStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a profile under `label`, disabled.
	///
	/// The kind is taken from the profile.
	///
	/// # Errors
	/// - [`TextCatError::EmptyLabel`] if `label` is empty
	/// - [`TextCatError::EmptyProfile`] if the profile has no n-grams
	/// - [`TextCatError::DuplicateKey`] if (label, kind) is already present
	pub fn add(&mut self, label: &str, profile: Profile) -> Result<()> {
		if label.is_empty() {
			return Err(TextCatError::EmptyLabel);
		}
		let key = (label.to_owned(), profile.kind());
		if profile.is_empty() {
			return Err(TextCatError::EmptyProfile { label: key.0, kind: key.1 });
		}
		if self.entries.contains_key(&key) {
			return Err(TextCatError::DuplicateKey { label: key.0, kind: key.1 });
		}

		debug!("registered {} profile {label:?} ({} n-grams)", key.1, profile.len());
		self.entries.insert(key, StoredProfile { profile, enabled: false });
		Ok(())
	}

	/// Enables every entry of the given kind. Returns how many entries are enabled for it.
	pub fn enable_kind(&mut self, kind: Kind) -> usize {
		let mut count = 0;
		for ((_, entry_kind), entry) in self.entries.iter_mut() {
			if *entry_kind == kind {
				entry.enabled = true;
				count += 1;
			}
		}
		debug!("enabled {count} {kind} profiles");
		count
	}

	pub fn get(&self, label: &str, kind: Kind) -> Option<&StoredProfile> {
		self.entries.get(&(label.to_owned(), kind))
	}

	pub fn contains(&self, label: &str, kind: Kind) -> bool {
		self.get(label, kind).is_some()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterates over enabled entries as `(label, profile)`, in key order.
	pub fn enabled(&self) -> impl Iterator<Item = (&str, &Profile)> {
		self.entries
			.iter()
			.filter(|(_, entry)| entry.enabled)
			.map(|((label, _), entry)| (label.as_str(), &entry.profile))
	}

	/// Kinds with at least one enabled entry, `Raw` first.
	pub fn enabled_kinds(&self) -> Vec<Kind> {
		Kind::ALL
			.into_iter()
			.filter(|kind| self.enabled().any(|(_, profile)| profile.kind() == *kind))
			.collect()
	}

	/// Lists every entry, in key order.
	pub fn languages(&self) -> Vec<LanguageInfo> {
		self.entries
			.iter()
			.map(|((label, kind), entry)| LanguageInfo {
				label: label.clone(),
				kind: *kind,
				enabled: entry.enabled,
				size: entry.profile.len(),
			})
			.collect()
	}
}
