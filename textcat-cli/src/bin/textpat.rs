//! `textpat`: build a language profile from a training corpus.
//!
//! The profile is written next to the corpus with an `.lm` extension unless
//! `-o` names another file. Pass the result to `textcat -p` to classify
//! against it.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;
use textcat_core::io::build_output_path;
use textcat_core::model::kind::Kind;
use textcat_core::model::ngram::extract;

#[derive(Parser, Debug)]
#[command(name = "textpat", version, about = "Build a language profile from a training corpus")]
struct Args {
	/// Build a raw (byte) profile instead of a utf-8 profile
	#[arg(short = 'r', long = "raw")]
	raw: bool,

	/// Output file
	#[arg(short = 'o', long = "output")]
	output: Option<PathBuf>,

	/// Training corpus
	corpus: PathBuf,
}

/// Extracts the profile of `args.corpus` and writes it, returning the output path.
///
/// # Errors
/// Fails when the corpus cannot be read, holds no text, or the output would
/// overwrite the corpus itself.
fn build(args: &Args) -> Result<PathBuf> {
	let text = fs::read(&args.corpus).with_context(|| format!("cannot read {}", args.corpus.display()))?;
	let kind = if args.raw { Kind::Raw } else { Kind::Utf8 };

	let profile = extract(&text, kind);
	if profile.is_empty() {
		bail!("{} contains no text", args.corpus.display());
	}

	let output = match &args.output {
		Some(path) => path.clone(),
		None => build_output_path(&args.corpus, "lm")?,
	};
	if same_file(&output, &args.corpus) {
		bail!("refusing to overwrite the corpus {}", args.corpus.display());
	}

	let name = args.corpus.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
	let file = File::create(&output).with_context(|| format!("cannot create {}", output.display()))?;
	let mut writer = BufWriter::new(file);
	profile.write_to(&mut writer, Some(&format!("profile built from {name}")))?;
	writer.flush()?;

	info!("wrote {} {kind} n-grams to {}", profile.len(), output.display());
	Ok(output)
}

fn same_file(a: &Path, b: &Path) -> bool {
	match (a.canonicalize(), b.canonicalize()) {
		(Ok(a), Ok(b)) => a == b,
		_ => a == b,
	}
}

fn main() -> Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let args = Args::parse();
	build(&args)?;
	Ok(())
}
