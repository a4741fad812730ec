use std::path::Path;
use std::path::PathBuf;

use globset::GlobBuilder;
use globset::GlobSet;
use globset::GlobSetBuilder;
use ignore::WalkBuilder;
use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error as _;

use crate::DuplicatePolicy;
use crate::Engine;
use crate::Slots;
use crate::StencilError;
use crate::StencilResult;
use crate::Value;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["stencil.toml", ".stencil.toml", ".config/stencil.toml"];

/// Template sources loaded when no config file is present.
pub const DEFAULT_SOURCES: [&str; 1] = ["*.tpl"];

/// Configuration loaded from a `stencil.toml` file.
///
/// ```toml
/// sources = ["templates/**/*.tpl", "layout.tpl"]
/// duplicates = "overwrite"
///
/// [slots]
/// site = "example.com"
/// year = 2024
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StencilConfig {
	/// Glob patterns, relative to the project root, for files containing
	/// template blocks. `*` does not cross directory separators.
	#[serde(default = "default_sources")]
	pub sources: Vec<String>,
	/// Policy applied to repeated template names, both inside a file and
	/// across files.
	#[serde(default)]
	pub duplicates: DuplicatePolicy,
	/// Slot values available to every render. Values given at render time
	/// take precedence. Datetimes become strings; `nan` and `inf` are
	/// rejected.
	#[serde(default, deserialize_with = "deserialize_slots")]
	pub slots: Slots,
}

impl Default for StencilConfig {
	fn default() -> Self {
		Self {
			sources: default_sources(),
			duplicates: DuplicatePolicy::default(),
			slots: Slots::default(),
		}
	}
}

fn deserialize_slots<'de, D>(deserializer: D) -> Result<Slots, D::Error>
where
	D: Deserializer<'de>,
{
	let table = toml::Table::deserialize(deserializer)?;
	table
		.into_iter()
		.map(|(name, value)| {
			let value = toml_to_value(value).map_err(|reason| {
				D::Error::custom(format!("invalid slot `{name}`: {reason}"))
			})?;
			Ok::<_, D::Error>((name, value))
		})
		.collect()
}

/// Convert a `toml::Value` to a slot [`Value`].
fn toml_to_value(value: toml::Value) -> Result<Value, String> {
	let value = match value {
		toml::Value::String(s) => Value::String(s),
		toml::Value::Integer(i) => Value::Number(i as f64),
		toml::Value::Float(f) if f.is_finite() => Value::Number(f),
		toml::Value::Float(f) => return Err(format!("`{f}` is not a finite number")),
		toml::Value::Boolean(b) => Value::Bool(b),
		toml::Value::Datetime(dt) => Value::String(dt.to_string()),
		toml::Value::Array(arr) => {
			let items: Result<Vec<Value>, String> = arr.into_iter().map(toml_to_value).collect();
			Value::List(items?)
		}
		toml::Value::Table(table) => {
			let mut map = std::collections::BTreeMap::new();
			for (k, v) in table {
				map.insert(k, toml_to_value(v)?);
			}
			Value::Map(map)
		}
	};

	Ok(value)
}

fn default_sources() -> Vec<String> {
	DEFAULT_SOURCES.iter().map(ToString::to_string).collect()
}

impl StencilConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> StencilResult<Option<StencilConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::from_toml(&content)?;
		tracing::debug!(path = %config_path.display(), "loaded config");

		Ok(Some(config))
	}

	pub fn from_toml(content: &str) -> StencilResult<StencilConfig> {
		toml::from_str(content).map_err(|e| StencilError::ConfigParse(e.to_string()))
	}

	/// Files under `root` matching `sources`, sorted for deterministic load
	/// order. `.gitignore` rules are respected.
	pub fn source_files(&self, root: &Path) -> StencilResult<Vec<PathBuf>> {
		let glob_set = build_glob_set(&self.sources)?;
		let mut files = Vec::new();

		for entry in WalkBuilder::new(root).build() {
			let entry = entry.map_err(|e| StencilError::Io(std::io::Error::other(e)))?;
			if !entry.file_type().is_some_and(|kind| kind.is_file()) {
				continue;
			}

			let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
			if glob_set.is_match(relative) {
				files.push(entry.path().to_path_buf());
			}
		}

		files.sort();
		Ok(files)
	}

	/// Build an engine from every source file. Each file is parsed into its
	/// own engine and then merged into the result, so duplicates inside a
	/// file and across files follow the same policy.
	pub fn build_engine(&self, root: &Path) -> StencilResult<Engine> {
		let mut engine = Engine::new();

		for path in self.source_files(root)? {
			let relative = path
				.strip_prefix(root)
				.unwrap_or(&path)
				.display()
				.to_string();
			let content = std::fs::read_to_string(&path)?;

			let mut file_engine = Engine::new();
			file_engine
				.parse(&content, self.duplicates)
				.and_then(|()| engine.merge(&file_engine, self.duplicates))
				.map_err(|source| {
					StencilError::SourceFile {
						path: relative.clone(),
						source: Box::new(source),
					}
				})?;

			tracing::debug!(
				path = %relative,
				templates = file_engine.library().len(),
				"loaded template source"
			);
		}

		Ok(engine)
	}
}

/// Build a `GlobSet` from a list of glob pattern strings.
fn build_glob_set(patterns: &[String]) -> StencilResult<GlobSet> {
	let mut builder = GlobSetBuilder::new();
	for pattern in patterns {
		let glob = GlobBuilder::new(pattern)
			.literal_separator(true)
			.build()
			.map_err(|e| StencilError::ConfigParse(format!("invalid source pattern `{pattern}`: {e}")))?;
		builder.add(glob);
	}
	builder
		.build()
		.map_err(|e| StencilError::ConfigParse(format!("failed to build source patterns: {e}")))
}
