use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Result, TextCatError};

/// Reads a profile file as UTF-8 text.
///
/// - Read failures map to [`TextCatError::Io`]
/// - Invalid UTF-8 maps to [`TextCatError::Parse`] (profile files are text)
pub(crate) fn read_profile_file<P: AsRef<Path>>(path: P) -> Result<String> {
	let path = path.as_ref();
	let bytes = fs::read(path).map_err(|source| TextCatError::Io {
		path: path.to_path_buf(),
		source,
	})?;
	String::from_utf8(bytes).map_err(|e| {
		TextCatError::parse(
			&path.display().to_string(),
			0,
			format!("profile file is not valid UTF-8 (byte {})", e.utf8_error().valid_up_to()),
		)
	})
}

/// Builds an output path based on an input path and a new extension.
///
/// Example:
/// `corpus/english.txt` + `"lm"` → `corpus/english.lm`
pub fn build_output_path<P: AsRef<Path>>(input_path: P, output_extension: &str) -> io::Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = input_path
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Input path has no filename"))?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(output_extension);

	Ok(output)
}

/// Derives a language label from a profile path: the file name without extension.
///
/// Examples:
/// - `"./profiles/klingon.lm"` → `"klingon"`
/// - `"klingon"` → `"klingon"`
pub fn label_from_path<P: AsRef<Path>>(path: P) -> io::Result<String> {
	let stem = path
		.as_ref()
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))?;

	Ok(stem.to_string_lossy().to_string())
}

/// Lists all files with a given extension in a directory, sorted by name.
///
/// Returns file names only (no paths).
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();

		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}
