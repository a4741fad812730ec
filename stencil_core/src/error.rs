use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum StencilError {
	#[error(transparent)]
	#[diagnostic(code(stencil::io_error))]
	Io(#[from] std::io::Error),

	#[error("no end marker found for template `{name}` (started on line {line})")]
	#[diagnostic(
		code(stencil::unterminated_template),
		help("add `<%%ENDTEMPLATE {name}%%>` to close this template")
	)]
	UnterminatedTemplate { name: String, line: usize },

	#[error(
		"template `{name}` already exists in the library{}",
		.line.map(|line| format!(" (duplicate started on line {line})")).unwrap_or_default()
	)]
	#[diagnostic(
		code(stencil::duplicate_template),
		help("choose the `overwrite` or `ignore` duplicate policy to allow repeated names")
	)]
	DuplicateTemplate { name: String, line: Option<usize> },

	#[error("template `{name}` does not exist in the library")]
	#[diagnostic(
		code(stencil::missing_template),
		help("define it with `<%%STARTTEMPLATE {name}%%>...<%%ENDTEMPLATE {name}%%>`")
	)]
	MissingTemplate { name: String },

	#[error("template `{name}` renders itself: {}", .chain.join(" -> "))]
	#[diagnostic(
		code(stencil::render_cycle),
		help("remove the nested invocation that leads back to `{name}`")
	)]
	RenderCycle { name: String, chain: Vec<String> },

	#[error("invalid template name: `{0}`")]
	#[diagnostic(
		code(stencil::invalid_template_name),
		help("template names may only contain letters, digits, `-`, `_` and `.`")
	)]
	InvalidTemplateName(String),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(stencil::config_parse),
		help("check that stencil.toml is valid TOML with `sources`, `duplicates` and `[slots]`")
	)]
	ConfigParse(String),

	#[error("failed to load templates from `{path}`")]
	#[diagnostic(code(stencil::source_file))]
	SourceFile {
		path: String,
		#[source]
		source: Box<StencilError>,
	},

	#[error("invalid slot values: {0}")]
	#[diagnostic(
		code(stencil::invalid_slots),
		help("slots are a JSON object, or `key=value` pairs on the command line")
	)]
	InvalidSlots(String),
}

pub type StencilResult<T> = Result<T, StencilError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
