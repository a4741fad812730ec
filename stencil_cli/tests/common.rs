use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn stencil_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("stencil"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("STENCIL_LOG");
	cmd
}

/// Write single-line template blocks to `path`, creating parent
/// directories as needed.
#[allow(dead_code)]
pub fn write_templates(path: &Path, blocks: &[(&str, &str)]) -> std::io::Result<()> {
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)?;
	}

	let content = blocks
		.iter()
		.map(|(name, body)| format!("<%%STARTTEMPLATE {name}%%>{body}<%%ENDTEMPLATE {name}%%>"))
		.collect::<Vec<_>>()
		.join("\n");

	std::fs::write(path, content)
}
