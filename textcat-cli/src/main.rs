//! `textcat`: classify text by language.
//!
//! The text to classify is, in order of precedence:
//! 1. the file given with `-f`,
//! 2. the text given as arguments (joined with spaces),
//! 3. standard input.
//!
//! By default only utf-8 profiles are used; `-r` uses raw profiles instead
//! and `-b` uses both. Extra profiles built with `textpat` are loaded with
//! `-p`. With `-l` every line is classified on its own.

use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::debug;
use textcat_core::error::TextCatError;
use textcat_core::io::label_from_path;
use textcat_core::model::config::{ClassifierConfig, DEFAULT_MAX_CANDIDATES, DEFAULT_MIN_DOCSIZE, DEFAULT_THRESHOLD};
use textcat_core::model::textcat::{Classification, TextCat};

#[derive(Parser, Debug)]
#[command(name = "textcat", version, about = "Classify text by language")]
struct Args {
	/// Read the text from this file
	#[arg(short = 'f', long = "file")]
	file: Option<PathBuf>,

	/// Use both raw and utf-8 profiles
	#[arg(short = 'b', long = "both")]
	both: bool,

	/// Use raw profiles instead of utf-8 profiles
	#[arg(short = 'r', long = "raw")]
	raw: bool,

	/// Extra profile files, separated by commas; each is named after its file stem
	#[arg(short = 'p', long = "profiles", value_delimiter = ',')]
	profiles: Vec<PathBuf>,

	/// Classify individual lines instead of the whole document
	#[arg(short = 'l', long = "lines")]
	lines: bool,

	/// More candidates than this within the threshold gives "unknown"
	#[arg(long, default_value_t = DEFAULT_MAX_CANDIDATES)]
	max_candidates: usize,

	/// Inputs with fewer distinct n-grams than this give "short"
	#[arg(long, default_value_t = DEFAULT_MIN_DOCSIZE)]
	min_docsize: usize,

	/// Keep candidates within this factor of the best distance
	#[arg(long, default_value_t = DEFAULT_THRESHOLD)]
	threshold: f64,

	/// Print the distance to every enabled profile instead of the labels
	#[arg(long, conflicts_with = "lines")]
	scores: bool,

	/// Text to classify
	text: Vec<String>,
}

/// Where the text comes from.
#[derive(Debug, PartialEq)]
enum Source {
	File(PathBuf),
	Args(String),
	Stdin,
}

impl Args {
	fn source(&self) -> Source {
		if let Some(file) = &self.file {
			Source::File(file.clone())
		} else if !self.text.is_empty() {
			Source::Args(self.text.join(" "))
		} else {
			Source::Stdin
		}
	}

	fn config(&self) -> Result<ClassifierConfig> {
		let mut config = ClassifierConfig::default();
		config.min_docsize = self.min_docsize;
		config.set_max_candidates(self.max_candidates)?;
		config.set_threshold(self.threshold)?;
		Ok(config)
	}
}

/// Builds the classifier: defaults, extra profiles, then the enabled kinds.
fn build_textcat(args: &Args) -> Result<TextCat> {
	let mut textcat = TextCat::new()?.with_config(args.config()?);

	for path in &args.profiles {
		let label = label_from_path(path).with_context(|| format!("invalid profile path {}", path.display()))?;
		textcat.add_language(&label, path)?;
		debug!("loaded profile {label:?} from {}", path.display());
	}

	if args.raw || args.both {
		textcat.enable_all_raw();
	}
	if args.both || !args.raw {
		textcat.enable_all_utf8();
	}
	Ok(textcat)
}

fn read_source(source: &Source) -> Result<Vec<u8>> {
	match source {
		Source::File(path) => fs::read(path).with_context(|| format!("cannot read {}", path.display())),
		Source::Args(text) => Ok(text.clone().into_bytes()),
		Source::Stdin => {
			let mut buf = Vec::new();
			io::stdin().read_to_end(&mut buf).context("cannot read standard input")?;
			Ok(buf)
		}
	}
}

/// Text of a result column: the labels joined by commas, or the error.
fn describe(result: Result<Classification, TextCatError>) -> String {
	match result {
		Ok(classification) => classification.to_string(),
		Err(e) => e.to_string(),
	}
}

/// Splits on `\n`, dropping a trailing `\r` and the empty piece after a final newline.
fn split_lines(text: &[u8]) -> Vec<&[u8]> {
	let mut lines: Vec<&[u8]> = text
		.split(|b| *b == b'\n')
		.map(|line| line.strip_suffix(b"\r").unwrap_or(line))
		.collect();
	if text.ends_with(b"\n") || text.is_empty() {
		lines.pop();
	}
	lines
}

/// Classifies every line, in parallel chunks, keeping input order.
fn classify_lines(textcat: &TextCat, lines: &[&[u8]]) -> Vec<String> {
	if lines.is_empty() {
		return Vec::new();
	}
	let chunk_size = lines.len().div_ceil(num_cpus::get());

	let (tx, rx) = mpsc::channel();
	thread::scope(|scope| {
		for (index, chunk) in lines.chunks(chunk_size).enumerate() {
			let tx = tx.clone();
			scope.spawn(move || {
				let results: Vec<String> = chunk.iter().map(|line| describe(textcat.classify(line))).collect();
				// rx outlives the scope, so the send cannot fail
				let _ = tx.send((index, results));
			});
		}
	});
	drop(tx);

	let mut parts: Vec<(usize, Vec<String>)> = rx.iter().collect();
	parts.sort_by_key(|(index, _)| *index);
	parts.into_iter().flat_map(|(_, results)| results).collect()
}

fn write_lines<W: Write>(textcat: &TextCat, text: &[u8], out: &mut W) -> Result<()> {
	let lines = split_lines(text);
	for (line, result) in lines.iter().zip(classify_lines(textcat, &lines)) {
		out.write_all(result.as_bytes())?;
		out.write_all(b"\t")?;
		out.write_all(line)?;
		out.write_all(b"\n")?;
	}
	Ok(())
}

fn write_document<W: Write>(textcat: &TextCat, text: &[u8], scores: bool, out: &mut W) -> Result<()> {
	if scores {
		for score in textcat.scores(text)? {
			writeln!(out, "{}\t{}\t{}", score.label, score.kind, score.distance)?;
		}
		return Ok(());
	}

	for label in textcat.classify(text)?.labels() {
		writeln!(out, "{label}")?;
	}
	Ok(())
}

fn main() -> Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

	let args = Args::parse();
	let source = args.source();
	if source == Source::Stdin && io::stdin().is_terminal() {
		eprintln!("{}", Args::command().render_help());
		eprintln!("If both -f and text are missing, read from stdin");
		return Ok(());
	}

	let textcat = build_textcat(&args)?;
	let text = read_source(&source)?;

	let stdout = io::stdout();
	let mut out = stdout.lock();
	if args.lines {
		write_lines(&textcat, &text, &mut out)?;
	} else {
		write_document(&textcat, &text, args.scores, &mut out)?;
	}
	out.flush()?;
	Ok(())
}
