use textcat_core::error::TextCatError;
use textcat_core::model::kind::Kind;
use textcat_core::model::ngram::extract;
use textcat_core::model::textcat::{Classification, TextCat};

const ENGLISH: &str = "The quick brown fox jumps over the lazy dog.";
const FRENCH: &str = "Le vif renard brun saute par-dessus le chien paresseux.";

fn utf8() -> TextCat {
	let mut textcat = TextCat::new().unwrap();
	textcat.enable_all_utf8();
	textcat
}

fn raw() -> TextCat {
	let mut textcat = TextCat::new().unwrap();
	textcat.enable_all_raw();
	textcat
}

fn both() -> TextCat {
	let mut textcat = TextCat::new().unwrap();
	textcat.enable_all_raw();
	textcat.enable_all_utf8();
	textcat
}

fn labels(textcat: &TextCat, text: &str) -> Vec<String> {
	textcat.classify(text).unwrap().labels()
}

#[test]
fn english_pangram() {
	assert_eq!(labels(&utf8(), ENGLISH), vec!["english"]);
}

#[test]
fn french_pangram() {
	assert_eq!(labels(&utf8(), FRENCH), vec!["french"]);
}

#[test]
fn one_sentence_per_language() {
	let samples = [
		("dutch", "Het is vandaag een mooie dag en wij gaan samen naar de markt in de stad."),
		("english", ENGLISH),
		("finnish", "Nopea ruskea kettu hyppää laiskan koiran yli ja juoksee metsään."),
		("french", FRENCH),
		("german", "Der schnelle braune Fuchs springt über den faulen Hund."),
		("italian", "La rapida volpe marrone salta sopra il cane pigro."),
		("polish", "Szybki brązowy lis przeskakuje nad leniwym psem w ogrodzie."),
		("portuguese", "A rápida raposa castanha salta por cima do cão preguiçoso."),
		("spanish", "El rápido zorro marrón salta sobre el perro perezoso."),
		("swedish", "Den snabba bruna räven hoppar över den lata hunden i parken."),
	];
	for textcat in [utf8(), raw(), both()] {
		for (language, text) in samples {
			assert_eq!(labels(&textcat, text), vec![language], "{text}");
		}
	}
}

#[test]
fn single_character_is_short() {
	assert_eq!(utf8().classify("x").unwrap(), Classification::Short);
	assert_eq!(labels(&both(), "x"), vec!["short"]);
}

#[test]
fn empty_input_is_short() {
	for textcat in [utf8(), raw(), both()] {
		assert_eq!(textcat.classify("").unwrap(), Classification::Short);
		assert_eq!(textcat.classify("   \n\t ").unwrap(), Classification::Short);
	}
}

#[test]
fn min_docsize_boundary() {
	let textcat = utf8();
	// 24 distinct n-grams
	assert_eq!(extract(b"abcde", Kind::Utf8).len(), 24);
	assert_eq!(textcat.classify("abcde").unwrap(), Classification::Short);
	// 25 distinct n-grams
	assert_eq!(extract(b"abcd ba", Kind::Utf8).len(), 25);
	assert_ne!(textcat.classify("abcd ba").unwrap(), Classification::Short);
}

#[test]
fn unmatched_script_is_unknown() {
	for textcat in [utf8(), raw(), both()] {
		assert_eq!(textcat.classify("1234 5678 9012 3456 7890").unwrap(), Classification::Unknown);
		assert_eq!(textcat.classify("αβγδε ζηθικ λμνξο").unwrap(), Classification::Unknown);
	}
	assert_eq!(labels(&utf8(), "0123456789"), vec!["unknown"]);
}

#[test]
fn close_languages_are_all_reported() {
	assert_eq!(
		labels(&utf8(), "De snelle bruine vos springt over de luie hond."),
		vec!["dutch", "french", "german"]
	);
}

#[test]
fn both_variants_get_kind_suffix() {
	let text = "I would like to know what you are thinking about when you look at the sea.";
	assert_eq!(labels(&both(), text), vec!["english.utf8", "english.raw"]);
	assert_eq!(labels(&utf8(), text), vec!["english"]);
	assert_eq!(labels(&raw(), text), vec!["english"]);
}

#[test]
fn only_winning_variant_is_bare() {
	assert_eq!(labels(&both(), ENGLISH), vec!["english"]);
}

#[test]
fn classification_is_deterministic() {
	let textcat = both();
	for text in [ENGLISH, FRENCH, "De snelle bruine vos springt over de luie hond."] {
		assert_eq!(textcat.classify(text).unwrap(), textcat.classify(text).unwrap());
		assert_eq!(textcat.scores(text).unwrap(), textcat.scores(text).unwrap());
	}
}

#[test]
fn surrounding_and_repeated_whitespace_is_ignored() {
	let textcat = both();
	assert_eq!(textcat.classify("  hello   world  ").unwrap(), textcat.classify("hello world").unwrap());
	assert_eq!(labels(&textcat, "hello world"), vec!["english.utf8", "english.raw"]);
	assert_eq!(
		textcat.scores("\n\tThe quick  brown fox\r\njumps over the lazy dog. ").unwrap(),
		textcat.scores(ENGLISH).unwrap()
	);
}

#[test]
fn invalid_utf8_input_is_classified() {
	// "Café crème et pâtisserie ..." in Latin-1
	let latin1: &[u8] = b"Le caf\xe9 cr\xe8me et la p\xe2tisserie sont servis tous les matins dans la petite rue.";
	let result = utf8().classify(latin1).unwrap();
	assert!(!result.is_inconclusive());
	assert_eq!(result.labels()[0], "french");
}

#[test]
fn scores_cover_every_enabled_profile() {
	let scores = both().scores(ENGLISH).unwrap();
	assert_eq!(scores.len(), 20);
	assert_eq!((scores[0].label.as_str(), scores[0].kind), ("english", Kind::Utf8));
	assert!(scores.windows(2).all(|w| w[0].distance <= w[1].distance));

	let scores = utf8().scores(ENGLISH).unwrap();
	assert_eq!(scores.len(), 10);
	assert!(scores.iter().all(|s| s.kind == Kind::Utf8));
}

#[test]
fn nothing_enabled() {
	let textcat = TextCat::new().unwrap();
	assert!(matches!(textcat.classify(ENGLISH), Err(TextCatError::NoEnabledProfiles)));
}

#[test]
fn default_library_listing() {
	let textcat = utf8();
	let languages = textcat.languages();
	assert_eq!(languages.len(), 20);
	for info in &languages {
		assert_eq!(info.enabled, info.kind == Kind::Utf8, "{info:?}");
		assert!(info.size > 0 && info.size <= 400);
	}
	assert_eq!(languages[0].label, "dutch");
}

#[test]
fn parallel_classification_on_a_shared_classifier() {
	let textcat = both();
	let texts = [ENGLISH, FRENCH, "x", "1234 5678 9012 3456 7890"];
	let expected: Vec<Classification> = texts.iter().map(|t| textcat.classify(t).unwrap()).collect();

	let (textcat, texts) = (&textcat, &texts);
	std::thread::scope(|scope| {
		let handles: Vec<_> = (0..4)
			.map(|_| scope.spawn(move || texts.iter().map(|t| textcat.classify(t).unwrap()).collect::<Vec<_>>()))
			.collect();
		for handle in handles {
			assert_eq!(handle.join().unwrap(), expected);
		}
	});
}
