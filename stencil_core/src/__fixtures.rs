use crate::DuplicatePolicy;
use crate::Engine;
use crate::StencilResult;
use crate::end_marker;
use crate::start_marker;

/// A single-line template block.
pub fn block(name: &str, body: &str) -> String {
	format!("{}{body}{}", start_marker(name), end_marker(name))
}

/// A multi-line template block with the markers on their own lines.
pub fn multiline_block(name: &str, lines: &[&str]) -> String {
	let mut source = start_marker(name);
	source.push('\n');
	for line in lines {
		source.push_str(line);
		source.push('\n');
	}
	source.push_str(&end_marker(name));
	source
}

pub fn engine_from(source: &str) -> StencilResult<Engine> {
	let mut engine = Engine::new();
	engine.parse(source, DuplicatePolicy::Error)?;
	Ok(engine)
}

/// A page composed from a header, a scoped card and a footer.
pub fn composed_source() -> String {
	[
		block("header", "# {{ title }}"),
		multiline_block("card", &["Name: {{ name }}", "Role: {{ role }}"]),
		block("footer", "-- {{ site }}"),
		multiline_block("page", &["{{> header }}", "{{> card user }}", "{{> footer }}"]),
	]
	.join("\n")
}

pub fn dup_source() -> String {
	[block("dup", "A"), String::new(), block("dup", "B")].join("\n")
}
