use std::sync::LazyLock;

use regex::Regex;

use crate::DuplicatePolicy;
use crate::Library;
use crate::StencilError;
use crate::StencilResult;
use crate::Template;

/// Opening marker, capturing the template name.
static START_MARKER: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"<%%STARTTEMPLATE ([-0-9A-Za-z_.]+)%%>").expect("invalid start marker regex")
});

/// The closing marker for the template `name`.
pub fn end_marker(name: &str) -> String {
	format!("<%%ENDTEMPLATE {name}%%>")
}

/// The opening marker for the template `name`.
pub fn start_marker(name: &str) -> String {
	format!("<%%STARTTEMPLATE {name}%%>")
}

/// Scanner state between lines.
enum ScanState<'a> {
	/// No template is open.
	Searching,
	/// A template is open and its body lines are being collected.
	Accumulating {
		name: &'a str,
		line: usize,
		fragments: Vec<&'a str>,
	},
	/// A duplicate is being dropped under [`DuplicatePolicy::Ignore`]. Lines
	/// are not inspected for start markers until the end marker is consumed.
	Skipping { name: &'a str, line: usize },
}

/// Scan `input` line by line and add every template block found to
/// `library`.
///
/// Blocks finalized before an error stay in the library; nothing after the
/// failing line is added.
pub fn parse_into(
	library: &mut Library,
	input: &str,
	policy: DuplicatePolicy,
) -> StencilResult<()> {
	let mut state = ScanState::Searching;

	for (index, line) in input.split('\n').enumerate() {
		let line_number = index + 1;

		state = match state {
			ScanState::Searching => open_block(library, line, line_number, policy)?,
			ScanState::Accumulating {
				name,
				line: start_line,
				mut fragments,
			} => {
				if let Some(end) = line.find(&end_marker(name)) {
					fragments.push(&line[..end]);
					finalize(library, name, &fragments.join("\n"), start_line, policy)?;
					ScanState::Searching
				} else {
					fragments.push(line);
					ScanState::Accumulating {
						name,
						line: start_line,
						fragments,
					}
				}
			}
			ScanState::Skipping {
				name,
				line: start_line,
			} => {
				if line.contains(&end_marker(name)) {
					tracing::debug!(name, line = start_line, "skipped duplicate template");
					ScanState::Searching
				} else {
					ScanState::Skipping {
						name,
						line: start_line,
					}
				}
			}
		};
	}

	match state {
		ScanState::Searching => Ok(()),
		ScanState::Accumulating { name, line, .. } | ScanState::Skipping { name, line } => {
			Err(StencilError::UnterminatedTemplate {
				name: name.to_string(),
				line,
			})
		}
	}
}

/// Handle a line while no block is open.
fn open_block<'a>(
	library: &mut Library,
	line: &'a str,
	line_number: usize,
	policy: DuplicatePolicy,
) -> StencilResult<ScanState<'a>> {
	let Some(captures) = START_MARKER.captures(line) else {
		return Ok(ScanState::Searching);
	};
	let (Some(marker), Some(name)) = (captures.get(0), captures.get(1)) else {
		return Ok(ScanState::Searching);
	};
	let name = name.as_str();
	let rest = &line[marker.end()..];
	let end = rest.find(&end_marker(name));

	if library.contains(name) {
		match policy {
			DuplicatePolicy::Overwrite => {}
			DuplicatePolicy::Ignore => {
				if end.is_some() {
					tracing::debug!(name, line = line_number, "skipped duplicate template");
					return Ok(ScanState::Searching);
				}
				return Ok(ScanState::Skipping {
					name,
					line: line_number,
				});
			}
			DuplicatePolicy::Error => {
				return Err(StencilError::DuplicateTemplate {
					name: name.to_string(),
					line: Some(line_number),
				});
			}
		}
	}

	if let Some(end) = end {
		finalize(library, name, &rest[..end], line_number, policy)?;
		return Ok(ScanState::Searching);
	}

	let fragments = if rest.trim().is_empty() {
		vec![]
	} else {
		vec![rest]
	};

	Ok(ScanState::Accumulating {
		name,
		line: line_number,
		fragments,
	})
}

/// Build the template and hand it to the library, adding the start line to
/// duplicate errors.
fn finalize(
	library: &mut Library,
	name: &str,
	body: &str,
	line: usize,
	policy: DuplicatePolicy,
) -> StencilResult<()> {
	let template = Template::new(name, body)?;
	tracing::trace!(name, line, "found template block");

	library.add(template, policy).map_err(|error| {
		match error {
			StencilError::DuplicateTemplate { name, .. } => {
				StencilError::DuplicateTemplate {
					name,
					line: Some(line),
				}
			}
			other => other,
		}
	})
}
