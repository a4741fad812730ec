use std::fmt::Display;
use std::fmt::Write;

use crate::Renderer;
use crate::Slots;
use crate::StencilError;
use crate::StencilResult;
use crate::Value;
use crate::lexer::tokenize;
use crate::tokens::Segment;

/// Returns true when `name` is a valid template name (`[-0-9A-Za-z_.]+`).
pub fn is_valid_name(name: &str) -> bool {
	!name.is_empty()
		&& name
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// A named, immutable template body.
///
/// The body is compiled into segments once, at construction. Slot
/// placeholders use `{{ name }}` (with `.key` paths into nested maps) and
/// nested templates are invoked with `{{> other }}` or `{{> other path }}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
	name: String,
	body: String,
	segments: Vec<Segment>,
}

impl Template {
	pub fn new(name: impl Into<String>, body: impl Into<String>) -> StencilResult<Self> {
		let name = name.into();
		if !is_valid_name(&name) {
			return Err(StencilError::InvalidTemplateName(name));
		}

		let body = body.into();
		let segments = tokenize(&body);

		Ok(Self {
			name,
			body,
			segments,
		})
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn body(&self) -> &str {
		&self.body
	}

	pub fn segments(&self) -> &[Segment] {
		&self.segments
	}

	/// Names of the templates this body invokes, in order of appearance.
	pub fn dependencies(&self) -> Vec<&str> {
		self.segments
			.iter()
			.filter_map(|segment| {
				match segment {
					Segment::Include { name, .. } => Some(name.as_str()),
					_ => None,
				}
			})
			.collect()
	}

	/// Render the body with `slots`. Nested invocations go back through
	/// `renderer` so they share the engine's cache and cycle detection.
	pub fn render(&self, slots: &Slots, renderer: &mut Renderer<'_>) -> StencilResult<String> {
		let mut output = String::with_capacity(self.body.len());

		for segment in &self.segments {
			match segment {
				Segment::Text(text) => output.push_str(text),
				Segment::Slot(path) => {
					if let Some(value) = resolve_path(slots, path) {
						write!(output, "{value}").map_err(|_| {
							StencilError::InvalidSlots(format!("slot `{path}` could not be rendered"))
						})?;
					}
				}
				Segment::Include { name, scope } => {
					let nested = match scope {
						None => slots.clone(),
						Some(path) => {
							resolve_path(slots, path)
								.and_then(Value::as_map)
								.cloned()
								.map(Slots::from)
								.unwrap_or_default()
						}
					};
					output.push_str(&renderer.render(name, &nested)?);
				}
			}
		}

		Ok(output)
	}
}

impl Display for Template {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.name)
	}
}

fn resolve_path<'a>(slots: &'a Slots, path: &str) -> Option<&'a Value> {
	let mut segments = path.split('.');
	let root = slots.get(segments.next()?)?;
	root.lookup(segments)
}
