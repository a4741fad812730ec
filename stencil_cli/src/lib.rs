use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use stencil_core::DuplicatePolicy;
use stencil_core::Slots;
use stencil_core::StencilError;
use stencil_core::StencilResult;
use stencil_core::Value;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "List, inspect and render named template blocks.",
	long_about = "stencil extracts named template blocks delimited by `<%%STARTTEMPLATE \
	              name%%>` and `<%%ENDTEMPLATE name%%>` markers and renders them with slot \
	              values.\n\nTemplate sources are read from `stencil.toml` when present, \
	              otherwise every `*.tpl` file in the project root is loaded.\n\nQuick \
	              start:\n  stencil list                       List template names\n  \
	              stencil show greet                 Print a raw template body\n  stencil \
	              render greet --slot name=World  Render a template"
)]
pub struct StencilCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,

	/// How repeated template names are handled. Overrides the `duplicates`
	/// setting from `stencil.toml`.
	#[arg(long, value_enum, global = true)]
	pub duplicates: Option<DuplicatesArg>,
}

#[derive(Subcommand)]
pub enum Commands {
	/// List the names of every loaded template.
	///
	/// Names are printed one per line in the order their templates were
	/// first loaded.
	List,
	/// Print the raw body of a template without rendering it.
	Show {
		/// Name of the template.
		name: String,
	},
	/// Render a template with slot values.
	///
	/// Slot values are layered: default slots from `stencil.toml`, then the
	/// JSON object given with `--slots`, then each `--slot key=value` pair.
	/// Later layers replace earlier values with the same key.
	Render {
		/// Name of the template.
		name: String,

		/// A single string slot value as `key=value`. May be repeated.
		#[arg(long = "slot", value_name = "KEY=VALUE")]
		slot: Vec<String>,

		/// Slot values as a JSON object, e.g. `{"user": {"name": "Ada"}}`.
		#[arg(long, value_name = "JSON")]
		slots: Option<String>,
	},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DuplicatesArg {
	/// Fail when a template name is defined twice.
	Error,
	/// Replace the earlier template with the later one.
	Overwrite,
	/// Keep the earlier template and drop the later one.
	Ignore,
}

impl From<DuplicatesArg> for DuplicatePolicy {
	fn from(value: DuplicatesArg) -> Self {
		match value {
			DuplicatesArg::Error => DuplicatePolicy::Error,
			DuplicatesArg::Overwrite => DuplicatePolicy::Overwrite,
			DuplicatesArg::Ignore => DuplicatePolicy::Ignore,
		}
	}
}

/// Split a `key=value` argument. Only the first `=` separates the key, so
/// values may contain `=`.
pub fn parse_slot_pair(raw: &str) -> StencilResult<(String, String)> {
	let Some((key, value)) = raw.split_once('=') else {
		return Err(StencilError::InvalidSlots(format!(
			"expected `key=value`, got `{raw}`"
		)));
	};

	let key = key.trim();
	if key.is_empty() {
		return Err(StencilError::InvalidSlots(format!(
			"missing slot name in `{raw}`"
		)));
	}

	Ok((key.to_string(), value.to_string()))
}

/// Layer render slots: `defaults` first, then the `json` object, then the
/// string `pairs`.
pub fn build_slots(defaults: &Slots, json: Option<&str>, pairs: &[String]) -> StencilResult<Slots> {
	let mut slots = defaults.clone();

	if let Some(json) = json {
		slots.extend_from(&Slots::from_json(json)?);
	}

	for raw in pairs {
		let (key, value) = parse_slot_pair(raw)?;
		slots.insert(key, Value::String(value));
	}

	Ok(slots)
}
