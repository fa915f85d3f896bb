use crate::error::{Result, TextCatError};

/// Default maximum number of candidates before a result is "unknown".
pub const DEFAULT_MAX_CANDIDATES: usize = 5;

/// Default minimum number of distinct input n-grams before a result is "short".
pub const DEFAULT_MIN_DOCSIZE: usize = 25;

/// Default threshold factor: candidates within 3% of the best distance are kept.
pub const DEFAULT_THRESHOLD: f64 = 1.03;

/// Settings of the candidate selection policy.
///
/// # Responsibilities
/// - Track the selection limits (`max_candidates`, `min_docsize`, `threshold`)
/// - Validate values on update
///
/// # Invariants
/// - `max_candidates >= 1`
/// - `threshold >= 1.0`, stored in per-mille so that the inclusive
///   comparison `distance * 1000 <= best * permille` is exact
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassifierConfig {
	/// Inputs with fewer distinct n-grams than this are "short".
	pub min_docsize: usize,

	max_candidates: usize,

	threshold_permille: u64,
}

impl Default for ClassifierConfig {
	fn default() -> Self {
		Self {
			min_docsize: DEFAULT_MIN_DOCSIZE,
			max_candidates: DEFAULT_MAX_CANDIDATES,
			threshold_permille: 1030,
		}
	}
}

impl ClassifierConfig {
	pub fn max_candidates(&self) -> usize {
		self.max_candidates
	}

	/// Sets the maximum number of candidates.
	///
	/// # Errors
	/// Returns an error if `max_candidates` is 0.
	pub fn set_max_candidates(&mut self, max_candidates: usize) -> Result<()> {
		if max_candidates == 0 {
			return Err(TextCatError::InvalidConfig("max candidates must be at least 1".to_owned()));
		}
		self.max_candidates = max_candidates;
		Ok(())
	}

	/// Returns the threshold factor (1.03 by default).
	pub fn threshold(&self) -> f64 {
		self.threshold_permille as f64 / 1000.0
	}

	/// Sets the threshold factor, rounded to three decimals.
	///
	/// # Errors
	/// Returns an error if the value is not finite or below 1.0.
	pub fn set_threshold(&mut self, threshold: f64) -> Result<()> {
		if !threshold.is_finite() || threshold < 1.0 {
			return Err(TextCatError::InvalidConfig(format!(
				"threshold must be a finite number >= 1.0, got {threshold}"
			)));
		}
		self.threshold_permille = (threshold * 1000.0).round() as u64;
		Ok(())
	}

	/// Whether `distance` is within the threshold band above `best`. Inclusive.
	pub(crate) fn within_threshold(&self, distance: u64, best: u64) -> bool {
		u128::from(distance) * 1000 <= u128::from(best) * u128::from(self.threshold_permille)
	}
}
