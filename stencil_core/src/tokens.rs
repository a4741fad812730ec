use std::fmt::Display;

/// A piece of a compiled template body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
	/// Literal text copied to the output unchanged.
	Text(String),
	/// `{{ path }}` where `path` is a slot name optionally followed by
	/// `.key` segments, e.g. `user.name`.
	Slot(String),
	/// `{{> name }}` or `{{> name path }}`. Without a `scope` the nested
	/// template receives the current slots, otherwise the map found at
	/// `scope`.
	Include { name: String, scope: Option<String> },
}

impl Display for Segment {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Segment::Text(text) => f.write_str(text),
			Segment::Slot(path) => write!(f, "{{{{ {path} }}}}"),
			Segment::Include { name, scope: None } => write!(f, "{{{{> {name} }}}}"),
			Segment::Include {
				name,
				scope: Some(scope),
			} => write!(f, "{{{{> {name} {scope} }}}}"),
		}
	}
}
