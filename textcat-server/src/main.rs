//! HTTP facade over one shared language classifier.
//!
//! Classifications hold a read lock on the classifier and run in parallel;
//! loading and enabling profiles hold the write lock.

use std::path::PathBuf;
use std::sync::RwLock;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, post, put, web};
use anyhow::Result;
use clap::Parser;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use textcat_core::error::TextCatError;
use textcat_core::io::list_files;
use textcat_core::model::config::{ClassifierConfig, DEFAULT_MAX_CANDIDATES, DEFAULT_MIN_DOCSIZE, DEFAULT_THRESHOLD};
use textcat_core::model::kind::Kind;
use textcat_core::model::textcat::{Classification, TextCat};

/// Extension of the profile files served from the data directory.
const PROFILE_EXTENSION: &str = "lm";

#[derive(Parser, Debug)]
#[command(name = "textcat-server", version, about = "Language classification over HTTP")]
struct Args {
	/// Address to bind
	#[arg(long, default_value = "127.0.0.1")]
	host: String,

	/// Port to bind
	#[arg(long, default_value_t = 5000)]
	port: u16,

	/// Directory holding the `.lm` profiles loadable with `/v1/load_languages`
	#[arg(long, default_value = "./data")]
	data_dir: PathBuf,

	/// Enable the raw built-in profiles at startup
	#[arg(long)]
	raw: bool,

	/// Enable the utf-8 built-in profiles at startup (the default when no kind is given)
	#[arg(long)]
	utf8: bool,

	#[arg(long, default_value_t = DEFAULT_MAX_CANDIDATES)]
	max_candidates: usize,

	#[arg(long, default_value_t = DEFAULT_MIN_DOCSIZE)]
	min_docsize: usize,

	#[arg(long, default_value_t = DEFAULT_THRESHOLD)]
	threshold: f64,
}

/// Struct representing query parameters for the `/v1/load_languages` endpoint
#[derive(Deserialize)]
struct LanguagesQuery {
	names: Option<String>,
}

/// Struct representing query parameters for the `/v1/enable` endpoint
#[derive(Deserialize)]
struct EnableQuery {
	kind: Option<String>,
}

/// Body of a `/v1/classify` response.
///
/// `status` is `ok` when `labels` are languages, otherwise `short` or
/// `unknown` with the matching sentinel label.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct ClassifyResponse {
	status: String,
	labels: Vec<String>,
}

impl From<Classification> for ClassifyResponse {
	fn from(classification: Classification) -> Self {
		let status = match &classification {
			Classification::Languages(_) => "ok",
			Classification::Short => "short",
			Classification::Unknown => "unknown",
		};
		Self { status: status.to_owned(), labels: classification.labels() }
	}
}

struct SharedData {
	textcat: TextCat,
	data_dir: PathBuf,
}

type Shared = web::Data<RwLock<SharedData>>;

/// Maps a core error to the HTTP status that describes it.
fn error_response(e: &TextCatError) -> HttpResponse {
	let body = e.to_string();
	match e {
		TextCatError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
			HttpResponse::NotFound().body(body)
		}
		TextCatError::Io { .. } => HttpResponse::InternalServerError().body(body),
		TextCatError::Parse { .. } | TextCatError::EmptyProfile { .. } | TextCatError::EmptyLabel => {
			HttpResponse::UnprocessableEntity().body(body)
		}
		TextCatError::DuplicateKey { .. } | TextCatError::NoEnabledProfiles => HttpResponse::Conflict().body(body),
		TextCatError::InvalidConfig(_) | TextCatError::InvalidKind(_) => HttpResponse::BadRequest().body(body),
	}
}

/// A profile name must stay inside the data directory.
fn is_valid_name(name: &str) -> bool {
	!name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

/// HTTP POST endpoint `/v1/classify`
///
/// Classifies the request body against the enabled profiles.
#[post("/v1/classify")]
async fn post_classify(data: Shared, body: web::Bytes) -> impl Responder {
	let shared_data = match data.read() {
		Ok(d) => d,
		Err(_) => return HttpResponse::InternalServerError().body("Classifier lock failed"),
	};

	match shared_data.textcat.classify(&body) {
		Ok(classification) => HttpResponse::Ok().json(ClassifyResponse::from(classification)),
		Err(e) => error_response(&e),
	}
}

/// HTTP GET endpoint `/v1/languages`
///
/// Lists every registered profile with its kind, enabled flag and size.
#[get("/v1/languages")]
async fn get_languages(data: Shared) -> impl Responder {
	let shared_data = match data.read() {
		Ok(d) => d,
		Err(_) => return HttpResponse::InternalServerError().body("Classifier lock failed"),
	};
	HttpResponse::Ok().json(shared_data.textcat.languages())
}

/// HTTP GET endpoint `/v1/profiles`
///
/// Lists the profile names that `/v1/load_languages` can load.
#[get("/v1/profiles")]
async fn get_profiles(data: Shared) -> impl Responder {
	let data_dir = match data.read() {
		Ok(d) => d.data_dir.clone(),
		Err(_) => return HttpResponse::InternalServerError().body("Classifier lock failed"),
	};

	match list_files(&data_dir, PROFILE_EXTENSION) {
		Ok(files) => {
			let names: Vec<String> = files
				.iter()
				.filter_map(|f| f.strip_suffix(".lm"))
				.map(str::to_owned)
				.collect();
			HttpResponse::Ok().json(names)
		}
		Err(e) => {
			warn!("cannot list {}: {e}", data_dir.display());
			HttpResponse::InternalServerError().body("Failed to list profiles")
		}
	}
}

/// HTTP PUT endpoint `/v1/load_languages`
///
/// Loads `<data_dir>/<name>.lm` for every comma-separated name, each under
/// its own name. The new profiles stay disabled until the next `/v1/enable`.
///
/// # Notes
/// - Either every profile is registered or none is.
#[put("/v1/load_languages")]
async fn put_languages(data: Shared, query: web::Query<LanguagesQuery>) -> impl Responder {
	let query_names = match &query.names {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty language name"),
	};

	let names: Vec<&str> = query_names
		.split(',')
		.map(|s| s.trim())
		.filter(|s| !s.is_empty())
		.collect();
	if let Some(name) = names.iter().find(|n| !is_valid_name(n)) {
		return HttpResponse::BadRequest().body(format!("Invalid language name {name:?}"));
	}

	let mut shared_data = match data.write() {
		Ok(d) => d,
		Err(_) => return HttpResponse::InternalServerError().body("Classifier lock failed"),
	};

	let mut staged = shared_data.textcat.clone();
	for name in &names {
		let path = shared_data.data_dir.join(format!("{name}.{PROFILE_EXTENSION}"));
		if let Err(e) = staged.add_language(name, &path) {
			warn!("cannot load {}: {e}", path.display());
			return error_response(&e);
		}
	}
	shared_data.textcat = staged;

	info!("loaded languages {}", names.join(","));
	HttpResponse::Ok().json(names)
}

/// HTTP PUT endpoint `/v1/enable`
///
/// Enables every registered profile of `kind` (`raw`, `utf8` or `both`).
#[put("/v1/enable")]
async fn put_enable(data: Shared, query: web::Query<EnableQuery>) -> impl Responder {
	let kinds = match query.kind.as_deref().map(str::trim) {
		Some("both") => Kind::ALL.to_vec(),
		Some(kind) => match kind.parse::<Kind>() {
			Ok(kind) => vec![kind],
			Err(e) => return error_response(&e),
		},
		None => return HttpResponse::BadRequest().body("Missing profile kind"),
	};

	let mut shared_data = match data.write() {
		Ok(d) => d,
		Err(_) => return HttpResponse::InternalServerError().body("Classifier lock failed"),
	};

	for kind in kinds {
		match kind {
			Kind::Raw => shared_data.textcat.enable_all_raw(),
			Kind::Utf8 => shared_data.textcat.enable_all_utf8(),
		}
	}
	HttpResponse::Ok().json(shared_data.textcat.store().enabled_kinds())
}

fn configure(cfg: &mut web::ServiceConfig) {
	cfg.service(post_classify)
		.service(get_languages)
		.service(get_profiles)
		.service(put_languages)
		.service(put_enable);
}

/// Builds the classifier from the startup flags: built-in profiles, the
/// classifier settings and the kinds to enable.
fn build_textcat(args: &Args) -> Result<TextCat> {
	let mut config = ClassifierConfig::default();
	config.min_docsize = args.min_docsize;
	config.set_max_candidates(args.max_candidates)?;
	config.set_threshold(args.threshold)?;

	let mut textcat = TextCat::new()?.with_config(config);
	if args.raw {
		textcat.enable_all_raw();
	}
	if args.utf8 || !args.raw {
		textcat.enable_all_utf8();
	}
	Ok(textcat)
}

/// Main entry point for the server.
///
/// Builds the classifier, wraps it in a `RwLock` shared by every worker,
/// and starts an Actix-web HTTP server.
///
/// # Notes
/// - The server binds to `--host`:`--port` (127.0.0.1:5000 by default).
/// - Set `RUST_LOG` to change the log level (default `info`).
#[actix_web::main]
async fn main() -> Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let args = Args::parse();
	let shared_data = SharedData {
		textcat: build_textcat(&args)?,
		data_dir: args.data_dir.clone(),
	};
	let shared_data = web::Data::new(RwLock::new(shared_data));

	info!("listening on {}:{}", args.host, args.port);
	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.wrap(Cors::permissive())
			.app_data(shared_data.clone())
			.configure(configure)
	})
		.bind((args.host.as_str(), args.port))?
		.run()
		.await?;
	Ok(())
}
