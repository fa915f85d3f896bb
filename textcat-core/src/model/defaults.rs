use super::codec::parse_profile;
use super::store::ProfileStore;
use crate::error::Result;

/// `(label, raw profile file, utf8 profile file)` for each built-in language.
macro_rules! embedded_languages {
	($($label:literal),* $(,)?) => {
		&[$((
			$label,
			include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/raw/", $label, ".lm")),
			include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/utf8/", $label, ".lm")),
		)),*]
	};
}

pub(crate) const DEFAULT_LANGUAGES: &[(&str, &str, &str)] = embedded_languages!(
	"dutch",
	"english",
	"finnish",
	"french",
	"german",
	"italian",
	"polish",
	"portuguese",
	"spanish",
	"swedish",
);

/// Parses every built-in profile with the regular profile parser and
/// registers it (disabled).
pub(crate) fn register_defaults(store: &mut ProfileStore) -> Result<()> {
	for (label, raw, utf8) in DEFAULT_LANGUAGES {
		for (kind, source) in [("raw", raw), ("utf8", utf8)] {
			let profile = parse_profile(&format!("<builtin>/{kind}/{label}.lm"), source)?;
			store.add(label, profile)?;
		}
	}
	Ok(())
}
